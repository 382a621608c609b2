use crate::domain::{Cart, CartLine, Product, ProductCode};

use super::error::SessionError;

/// Where the checkout currently stands. Derived from the session, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LookingUp,
    ReadyToAdd,
    Purchasing,
}

/// The call the session is waiting on, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum InFlight {
    Lookup(ProductCode),
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Notice,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Notice,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&SessionError> for StatusMessage {
    fn from(error: &SessionError) -> Self {
        Self {
            severity: Severity::Error,
            text: error.to_string(),
        }
    }
}

/// State of one in-progress checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub(super) code_input: String,
    pub(super) staged: Option<Product>,
    pub(super) cart: Cart,
    pub(super) message: Option<StatusMessage>,
    pub(super) in_flight: Option<InFlight>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.in_flight, &self.staged) {
            (Some(InFlight::Lookup(_)), _) => Phase::LookingUp,
            (Some(InFlight::Purchase), _) => Phase::Purchasing,
            (None, Some(_)) => Phase::ReadyToAdd,
            (None, None) => Phase::Idle,
        }
    }

    /// True exactly while a lookup or purchase call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    pub fn code_input(&self) -> &str {
        &self.code_input
    }

    pub fn staged(&self) -> Option<&Product> {
        self.staged.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn total_amount(&self) -> u64 {
        self.cart.total_amount()
    }

    /// Read-only copy for front ends and tests.
    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase(),
            busy: self.is_busy(),
            code_input: self.code_input().to_string(),
            staged: self.staged().cloned(),
            lines: self.cart().lines().to_vec(),
            total_amount: self.total_amount(),
            message: self.message().cloned(),
        }
    }
}

/// Snapshot of a [`Session`] as published to front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: Phase,
    pub busy: bool,
    pub code_input: String,
    pub staged: Option<Product>,
    pub lines: Vec<CartLine>,
    pub total_amount: u64,
    pub message: Option<StatusMessage>,
}

impl Default for SessionView {
    fn default() -> Self {
        Session::default().view()
    }
}

impl SessionView {
    pub fn can_add(&self) -> bool {
        self.staged.is_some() && !self.busy
    }

    pub fn can_purchase(&self) -> bool {
        !self.lines.is_empty() && !self.busy
    }
}
