#[macro_use]
mod macros;
pub mod register_client;

pub use register_client::*;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
