use crate::domain::{yen, CartLine, Product, ProductCode, Receipt};

use super::error::SessionError;
use super::state::{InFlight, Session, StatusMessage};

/// Result of asking the catalog for a code.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Product),
    NotFound,
    TransportError(String),
}

/// Result of submitting the cart. A reply with `success: false` is a
/// `BusinessError`, not a transport failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Success(Receipt),
    BusinessError(String),
    TransportError(String),
}

/// Inputs to the session: operator actions and call completions.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SubmitCode(String),
    AddToCart,
    SubmitPurchase,
    LookupCompleted(LookupOutcome),
    PurchaseCompleted(PurchaseOutcome),
}

/// Work the owner of the session has to carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Lookup(ProductCode),
    Purchase(Vec<CartLine>),
    Acknowledge(Receipt),
}

/// What a single step produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: Session,
    pub command: Option<Command>,
    pub rejection: Option<SessionError>,
}

impl Transition {
    fn accepted(session: Session, command: Option<Command>) -> Self {
        Self {
            session,
            command,
            rejection: None,
        }
    }

    fn rejected(mut session: Session, error: SessionError) -> Self {
        session.message = Some(StatusMessage::from(&error));
        Self {
            session,
            command: None,
            rejection: Some(error),
        }
    }
}

impl Session {
    /// Applies one event. Never performs I/O; calls to make are returned as
    /// a [`Command`].
    pub fn step(self, event: SessionEvent) -> Transition {
        match event {
            SessionEvent::SubmitCode(code) => submit_code(self, code),
            SessionEvent::AddToCart => add_to_cart(self),
            SessionEvent::SubmitPurchase => submit_purchase(self),
            SessionEvent::LookupCompleted(outcome) => lookup_completed(self, outcome),
            SessionEvent::PurchaseCompleted(outcome) => purchase_completed(self, outcome),
        }
    }
}

fn submit_code(mut session: Session, raw: String) -> Transition {
    if session.is_busy() {
        return Transition::rejected(session, SessionError::Busy);
    }

    let parsed = ProductCode::parse(&raw);
    let length = raw.chars().count();
    session.code_input = raw;

    match parsed {
        Some(code) => {
            session.message = None;
            session.in_flight = Some(InFlight::Lookup(code.clone()));
            Transition::accepted(session, Some(Command::Lookup(code)))
        }
        None => Transition::rejected(session, SessionError::Validation { length }),
    }
}

fn lookup_completed(mut session: Session, outcome: LookupOutcome) -> Transition {
    if !matches!(session.in_flight, Some(InFlight::Lookup(_))) {
        return Transition::accepted(session, None);
    }
    session.in_flight = None;

    match outcome {
        LookupOutcome::Found(product) => {
            session.message = Some(StatusMessage::notice(format!(
                "商品が見つかりました: {}",
                product.name
            )));
            session.staged = Some(product);
            Transition::accepted(session, None)
        }
        LookupOutcome::NotFound => {
            session.staged = None;
            Transition::rejected(session, SessionError::NotFound)
        }
        LookupOutcome::TransportError(reason) => {
            session.staged = None;
            Transition::rejected(session, SessionError::LookupTransport { reason })
        }
    }
}

fn add_to_cart(mut session: Session) -> Transition {
    if session.is_busy() {
        return Transition::rejected(session, SessionError::Busy);
    }

    let Some(product) = session.staged.take() else {
        return Transition::rejected(session, SessionError::NothingStaged);
    };

    session.cart.push(CartLine::from(&product));
    session.code_input.clear();
    session.message = Some(StatusMessage::notice(format!(
        "{} をカートに追加しました",
        product.name
    )));
    Transition::accepted(session, None)
}

fn submit_purchase(mut session: Session) -> Transition {
    if session.is_busy() {
        return Transition::rejected(session, SessionError::Busy);
    }
    if session.cart.is_empty() {
        return Transition::rejected(session, SessionError::EmptyCart);
    }

    let lines = session.cart.lines().to_vec();
    session.message = None;
    session.in_flight = Some(InFlight::Purchase);
    Transition::accepted(session, Some(Command::Purchase(lines)))
}

fn purchase_completed(mut session: Session, outcome: PurchaseOutcome) -> Transition {
    if session.in_flight != Some(InFlight::Purchase) {
        return Transition::accepted(session, None);
    }
    session.in_flight = None;

    match outcome {
        PurchaseOutcome::Success(receipt) => {
            session.cart.clear();
            session.message = Some(StatusMessage::notice(format!(
                "購入が完了しました！合計金額: {}",
                yen(receipt.total_amount)
            )));
            Transition::accepted(session, Some(Command::Acknowledge(receipt)))
        }
        PurchaseOutcome::BusinessError(reason) => {
            Transition::rejected(session, SessionError::PurchaseRejected { reason })
        }
        PurchaseOutcome::TransportError(reason) => {
            Transition::rejected(session, SessionError::PurchaseTransport { reason })
        }
    }
}
