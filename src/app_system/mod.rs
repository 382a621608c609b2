//! System configuration, startup, and shutdown logic.

pub mod config;
pub mod register_system;
pub mod tracing;

pub use config::*;
pub use register_system::*;
pub use self::tracing::*;
