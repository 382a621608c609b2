//! The actor that owns the checkout session.

mod outcome;
pub mod service;

pub use service::*;
