use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of characters a scanned or typed product code must have.
pub const CODE_LENGTH: usize = 13;

/// Opaque catalog identifier.
///
/// The backend hands out numeric keys, but nothing on this side depends on
/// that. The JSON shape is kept so the id goes back exactly as it came in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl ProductId {
    pub fn is_empty(&self) -> bool {
        match self {
            ProductId::Number(_) => false,
            ProductId::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Number(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Text(value.to_string())
    }
}

/// A lookup key that has passed the length check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Accepts `raw` only when it is exactly [`CODE_LENGTH`] characters long.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.chars().count() == CODE_LENGTH {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved catalog entry. Only constructed once id, name and price are
/// known to be present and meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub code: ProductCode,
    pub name: String,
    pub unit_price: u64,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        code: ProductCode,
        name: impl Into<String>,
        unit_price: u64,
    ) -> Self {
        Self {
            id: id.into(),
            code,
            name: name.into(),
            unit_price,
        }
    }
}
