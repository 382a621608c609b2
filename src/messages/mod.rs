use tokio::sync::oneshot;

use crate::domain::Receipt;
use crate::session::{LookupOutcome, PurchaseOutcome, SessionView};

/// Oneshot channel a request answers on.
pub type ServiceResponse<T> = oneshot::Sender<T>;

/// Requests accepted by the register service. Every operator action answers
/// with the session as it stands right after the action was applied; network
/// results arrive later through the view watch.
#[derive(Debug)]
pub enum RegisterRequest {
    SubmitCode {
        code: String,
        respond_to: ServiceResponse<SessionView>,
    },
    AddToCart {
        respond_to: ServiceResponse<SessionView>,
    },
    Purchase {
        respond_to: ServiceResponse<SessionView>,
    },
    Snapshot {
        respond_to: ServiceResponse<SessionView>,
    },
    Shutdown,
}

/// Results of calls spawned by the register service, fed back as events.
#[derive(Debug)]
pub enum Completion {
    Lookup(LookupOutcome),
    Purchase(PurchaseOutcome),
}

/// One-shot purchase confirmations, in the order sales completed.
pub type Acknowledgements = tokio::sync::mpsc::UnboundedReceiver<Receipt>;
