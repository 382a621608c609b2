//! Checkout session state and the pure transition function that drives it.

pub mod error;
pub mod state;
pub mod transition;

pub use state::*;
pub use transition::*;
