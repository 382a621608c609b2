use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to a backend collaborator. Every variant counts as a
/// transport failure from the session's point of view.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {status}: {detail}")]
    Status { status: StatusCode, detail: String },
    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("base url cannot carry a path: {0}")]
    Endpoint(String),
}
