use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use crate::backend::{CatalogLookup, PurchaseGateway};
use crate::clients::RegisterClient;
use crate::domain::{total_of, CartLine, ProductCode, Receipt};
use crate::messages::{Acknowledgements, Completion, RegisterRequest, ServiceResponse};
use crate::session::{Command, Session, SessionEvent, SessionView, Transition};

use super::outcome::{lookup_outcome, purchase_outcome};

/// Owns the checkout session and is the only place it changes.
///
/// Operator requests and call completions are handled one at a time, so the
/// session never sees two writers. Lookups and purchases run as spawned tasks
/// and report back on an internal channel; the session stays busy until that
/// report is applied.
pub struct RegisterService {
    receiver: mpsc::Receiver<RegisterRequest>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_sender: mpsc::UnboundedSender<Completion>,
    session: Session,
    catalog: Arc<dyn CatalogLookup>,
    purchases: Arc<dyn PurchaseGateway>,
    view: watch::Sender<SessionView>,
    acknowledgements: mpsc::UnboundedSender<Receipt>,
}

impl RegisterService {
    pub fn new(
        buffer_size: usize,
        catalog: Arc<dyn CatalogLookup>,
        purchases: Arc<dyn PurchaseGateway>,
    ) -> (Self, RegisterClient, Acknowledgements) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let (ack_sender, ack_receiver) = mpsc::unbounded_channel();
        let session = Session::new();
        let (view, view_receiver) = watch::channel(session.view());

        let service = Self {
            receiver,
            completions,
            completion_sender,
            session,
            catalog,
            purchases,
            view,
            acknowledgements: ack_sender,
        };
        let client = RegisterClient::new(sender, view_receiver);
        (service, client, ack_receiver)
    }

    #[instrument(name = "register_service", skip(self))]
    pub async fn run(mut self) {
        info!("RegisterService starting");

        loop {
            tokio::select! {
                request = self.receiver.recv() => {
                    let Some(request) = request else {
                        info!("All register clients dropped");
                        break;
                    };
                    if !self.handle_request(request) {
                        break;
                    }
                }
                Some(completion) = self.completions.recv() => {
                    self.handle_completion(completion);
                }
            }
        }

        if self.session.is_busy() {
            warn!(in_flight = ?self.session.in_flight(), "Stopped with a call still outstanding");
        }
        info!("RegisterService stopped");
    }

    /// Returns false once the service should stop.
    fn handle_request(&mut self, request: RegisterRequest) -> bool {
        match request {
            RegisterRequest::SubmitCode { code, respond_to } => {
                self.handle_submit_code(code, respond_to);
            }
            RegisterRequest::AddToCart { respond_to } => {
                self.handle_add_to_cart(respond_to);
            }
            RegisterRequest::Purchase { respond_to } => {
                self.handle_purchase(respond_to);
            }
            RegisterRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.session.view());
            }
            RegisterRequest::Shutdown => {
                info!("RegisterService shutting down");
                return false;
            }
        }
        true
    }

    #[instrument(fields(code = %code), skip(self, code, respond_to))]
    fn handle_submit_code(&mut self, code: String, respond_to: ServiceResponse<SessionView>) {
        debug!("Processing submit_code request");
        let view = self.apply(SessionEvent::SubmitCode(code));
        let _ = respond_to.send(view);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_add_to_cart(&mut self, respond_to: ServiceResponse<SessionView>) {
        debug!("Processing add_to_cart request");
        let view = self.apply(SessionEvent::AddToCart);
        if view.message.as_ref().is_some_and(|m| !m.is_error()) {
            info!(line_count = view.lines.len(), total = view.total_amount, "Line added");
        }
        let _ = respond_to.send(view);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_purchase(&mut self, respond_to: ServiceResponse<SessionView>) {
        debug!("Processing purchase request");
        let view = self.apply(SessionEvent::SubmitPurchase);
        let _ = respond_to.send(view);
    }

    #[instrument(skip(self, completion))]
    fn handle_completion(&mut self, completion: Completion) {
        if !self.session.is_busy() {
            warn!(?completion, "Completion arrived with no call outstanding");
        }
        let event = match completion {
            Completion::Lookup(outcome) => SessionEvent::LookupCompleted(outcome),
            Completion::Purchase(outcome) => SessionEvent::PurchaseCompleted(outcome),
        };
        self.apply(event);
    }

    /// Runs one transition, starts whatever it asks for, and publishes the
    /// resulting view.
    fn apply(&mut self, event: SessionEvent) -> SessionView {
        let Transition {
            session,
            command,
            rejection,
        } = std::mem::take(&mut self.session).step(event);
        self.session = session;

        if let Some(rejection) = rejection {
            warn!(error = ?rejection, message = %rejection, "Session event rejected");
        }
        if let Some(command) = command {
            self.execute(command);
        }

        let view = self.session.view();
        self.view.send_replace(view.clone());
        view
    }

    fn execute(&self, command: Command) {
        match command {
            Command::Lookup(code) => self.spawn_lookup(code),
            Command::Purchase(lines) => self.spawn_purchase(lines),
            Command::Acknowledge(receipt) => self.acknowledge(receipt),
        }
    }

    fn spawn_lookup(&self, code: ProductCode) {
        let catalog = Arc::clone(&self.catalog);
        let completions = self.completion_sender.clone();
        let span = info_span!("lookup", code = %code);

        tokio::spawn(
            async move {
                debug!("Looking up product");
                let outcome = lookup_outcome(catalog.lookup(&code).await);
                if completions.send(Completion::Lookup(outcome)).is_err() {
                    debug!("Register stopped before the lookup finished");
                }
            }
            .instrument(span),
        );
    }

    fn spawn_purchase(&self, lines: Vec<CartLine>) {
        let purchases = Arc::clone(&self.purchases);
        let completions = self.completion_sender.clone();
        let total = total_of(&lines);
        let span = info_span!("purchase", line_count = lines.len(), total);

        tokio::spawn(
            async move {
                info!("Submitting purchase");
                let outcome = purchase_outcome(purchases.purchase(&lines).await);
                if completions.send(Completion::Purchase(outcome)).is_err() {
                    error!("Register stopped before the purchase finished; result dropped");
                }
            }
            .instrument(span),
        );
    }

    fn acknowledge(&self, receipt: Receipt) {
        info!(
            total = receipt.total_amount,
            transaction_id = %receipt.transaction_id,
            "Purchase completed"
        );
        if self.acknowledgements.send(receipt).is_err() {
            debug!("No one is listening for acknowledgements");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::{create_mock_catalog, create_mock_purchases};
    use crate::session::Phase;

    /// Snapshot requests read the session without changing it.
    #[tokio::test]
    async fn snapshot_reflects_rejections() -> Result<(), Box<dyn std::error::Error>> {
        let (catalog, _lookups) = create_mock_catalog();
        let (purchases, _sales) = create_mock_purchases();
        let (service, client, _acks) = RegisterService::new(4, catalog, purchases);
        let handle = tokio::spawn(service.run());

        let view = client.snapshot().await?;
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.message, None);

        client.add_to_cart().await?;
        let view = client.snapshot().await?;
        assert_eq!(view.message.unwrap().text, "商品を読み込んでください");
        assert_eq!(client.current(), client.snapshot().await?);

        client.shutdown().await?;
        handle.await?;
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_stops_the_service_while_clients_remain() {
        let (catalog, _lookups) = create_mock_catalog();
        let (purchases, _sales) = create_mock_purchases();
        let (service, client, _acks) = RegisterService::new(4, catalog, purchases);
        let handle = tokio::spawn(service.run());
        let other = client.clone();

        client.shutdown().await.unwrap();
        handle.await.unwrap();

        assert!(other.snapshot().await.is_err());
        assert!(other.submit_code("4901234567894".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn dropping_every_client_stops_the_service() {
        let (catalog, _lookups) = create_mock_catalog();
        let (purchases, _sales) = create_mock_purchases();
        let (service, client, _acks) = RegisterService::new(4, catalog, purchases);
        let handle = tokio::spawn(service.run());

        drop(client);
        handle.await.unwrap();
    }
}
