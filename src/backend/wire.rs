//! JSON shapes exchanged with the POS backend. Field names follow the
//! backend's column names.

use serde::{Deserialize, Serialize};

use crate::domain::{CartLine, Product, ProductCode, ProductId};

/// Lookup reply. A miss comes back as the same object with every field null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "PRD_ID", default)]
    pub id: Option<ProductId>,
    #[serde(rename = "CODE", default)]
    pub code: Option<String>,
    #[serde(rename = "NAME", default)]
    pub name: Option<String>,
    #[serde(rename = "PRICE", default)]
    pub price: Option<i64>,
}

impl ProductPayload {
    /// Returns a product only when id, name and a positive price are all
    /// present. `requested` stands in for a missing or malformed code.
    pub fn resolve(self, requested: Option<&ProductCode>) -> Option<Product> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let name = self.name.filter(|name| !name.trim().is_empty())?;
        let unit_price = self.price.filter(|price| *price > 0)?;
        let code = self
            .code
            .as_deref()
            .and_then(ProductCode::parse)
            .or_else(|| requested.cloned())?;

        Some(Product::new(id, code, name, u64::try_from(unit_price).ok()?))
    }
}

/// Development listing of the whole product master.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListing {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub products: Vec<ProductPayload>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseItem<'a> {
    #[serde(rename = "PRD_ID")]
    pub id: &'a ProductId,
    #[serde(rename = "PRD_CODE")]
    pub code: &'a str,
    #[serde(rename = "PRD_NAME")]
    pub name: &'a str,
    #[serde(rename = "PRD_PRICE")]
    pub price: u64,
}

impl<'a> From<&'a CartLine> for PurchaseItem<'a> {
    fn from(line: &'a CartLine) -> Self {
        Self {
            id: &line.product_id,
            code: line.code.as_str(),
            name: &line.name,
            price: line.unit_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PurchaseBody<'a> {
    #[serde(rename = "EMP_CD")]
    pub cashier_code: &'a str,
    #[serde(rename = "STORE_CD")]
    pub store_code: &'a str,
    #[serde(rename = "POS_NO")]
    pub terminal_no: &'a str,
    pub items: Vec<PurchaseItem<'a>>,
}

/// Transaction ids are numeric today; strings are accepted as well.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(i64),
    Text(String),
}

impl TransactionId {
    pub fn into_string(self) -> String {
        match self {
            TransactionId::Number(n) => n.to_string(),
            TransactionId::Text(text) => text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseReplyBody {
    pub success: bool,
    #[serde(default)]
    pub total_amount: Option<u64>,
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthBody {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Pulls `detail` out of an error body, falling back to the raw text.
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
