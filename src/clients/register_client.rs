use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use crate::messages::RegisterRequest;
use crate::session::SessionView;

use super::ClientError;

/// Handle to the register service. Cheap to clone; every clone drives the
/// same session.
#[derive(Clone)]
pub struct RegisterClient {
    sender: mpsc::Sender<RegisterRequest>,
    view: watch::Receiver<SessionView>,
}

impl RegisterClient {
    pub fn new(sender: mpsc::Sender<RegisterRequest>, view: watch::Receiver<SessionView>) -> Self {
        Self { sender, view }
    }

    /// Receiver that wakes up after every session transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Last published view, without a round trip to the service.
    pub fn current(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Waits until no lookup or purchase is outstanding.
    #[instrument(skip(self))]
    pub async fn settled(&self) -> Result<SessionView, ClientError> {
        let mut view = self.subscribe();
        let settled = view
            .wait_for(|view| !view.busy)
            .await
            .map_err(|_| ClientError::ActorCommunication("Actor stopped".to_string()))?;
        Ok(settled.clone())
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        debug!("Sending shutdown request");
        self.sender
            .send(RegisterRequest::Shutdown)
            .await
            .map_err(|e| ClientError::ActorCommunication(e.to_string()))
    }
}

client_method!(RegisterClient => fn submit_code(code: String) -> SessionView as RegisterRequest::SubmitCode);
client_method!(RegisterClient => fn add_to_cart() -> SessionView as RegisterRequest::AddToCart);
client_method!(RegisterClient => fn purchase() -> SessionView as RegisterRequest::Purchase);
client_method!(RegisterClient => fn snapshot() -> SessionView as RegisterRequest::Snapshot);
