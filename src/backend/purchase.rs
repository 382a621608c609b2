use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::app_system::TerminalIdentity;
use crate::domain::CartLine;

use super::wire::{PurchaseBody, PurchaseItem, PurchaseReplyBody};
use super::{ApiEndpoint, ServiceError};

/// What the purchase service said, before it is judged a success or not.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReply {
    pub success: bool,
    pub total_amount: Option<u64>,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
}

impl From<PurchaseReplyBody> for PurchaseReply {
    fn from(body: PurchaseReplyBody) -> Self {
        Self {
            success: body.success,
            total_amount: body.total_amount,
            transaction_id: body.transaction_id.map(|id| id.into_string()),
            message: body.message,
        }
    }
}

/// Records a sale. Who is selling, and where, is fixed by the implementation.
#[async_trait]
pub trait PurchaseGateway: Send + Sync + 'static {
    async fn purchase(&self, lines: &[CartLine]) -> Result<PurchaseReply, ServiceError>;
}

/// `POST /api/purchase` against the POS backend.
#[derive(Debug, Clone)]
pub struct HttpPurchase {
    api: ApiEndpoint,
    terminal: TerminalIdentity,
}

impl HttpPurchase {
    pub fn new(api: ApiEndpoint, terminal: TerminalIdentity) -> Self {
        Self { api, terminal }
    }

    fn body<'a>(&'a self, lines: &'a [CartLine]) -> PurchaseBody<'a> {
        PurchaseBody {
            cashier_code: &self.terminal.cashier_code,
            store_code: &self.terminal.store_code,
            terminal_no: &self.terminal.terminal_no,
            items: lines.iter().map(PurchaseItem::from).collect(),
        }
    }
}

#[async_trait]
impl PurchaseGateway for HttpPurchase {
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn purchase(&self, lines: &[CartLine]) -> Result<PurchaseReply, ServiceError> {
        let url = self.api.url(&["api", "purchase"])?;
        let reply: PurchaseReplyBody = self.api.post_json(url, &self.body(lines)).await?;
        debug!(success = reply.success, "Purchase reply received");
        Ok(reply.into())
    }
}
