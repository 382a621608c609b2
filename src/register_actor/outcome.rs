use crate::backend::{PurchaseReply, ServiceError};
use crate::domain::{Product, Receipt};
use crate::session::{LookupOutcome, PurchaseOutcome};

/// Folds a catalog call result into the three outcomes the session knows.
pub fn lookup_outcome(result: Result<Option<Product>, ServiceError>) -> LookupOutcome {
    match result {
        Ok(Some(product)) => LookupOutcome::Found(product),
        Ok(None) => LookupOutcome::NotFound,
        Err(e) => LookupOutcome::TransportError(e.to_string()),
    }
}

/// A reply claiming success without a total or a transaction id is treated
/// as a broken reply, not as a sale.
pub fn purchase_outcome(result: Result<PurchaseReply, ServiceError>) -> PurchaseOutcome {
    match result {
        Ok(PurchaseReply {
            success: true,
            total_amount: Some(total_amount),
            transaction_id: Some(transaction_id),
            message,
        }) => PurchaseOutcome::Success(Receipt {
            total_amount,
            transaction_id,
            message,
        }),
        Ok(reply) if reply.success => {
            PurchaseOutcome::TransportError("purchase reply is missing total or transaction id".to_string())
        }
        Ok(reply) => PurchaseOutcome::BusinessError(
            reply
                .message
                .unwrap_or_else(|| "purchase declined".to_string()),
        ),
        Err(e) => PurchaseOutcome::TransportError(e.to_string()),
    }
}
