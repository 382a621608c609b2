//! # Mock Framework
//!
//! Channel-backed stand-ins for the catalog and purchase services.
//!
//! Every call a mock receives is forwarded to a receiver the test holds,
//! together with a responder. The test decides when, and with what, the call
//! completes, so busy states and failure paths can be driven step by step.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::{mpsc, oneshot};

use crate::backend::{CatalogLookup, PurchaseGateway, PurchaseReply, ServiceError};
use crate::domain::{CartLine, Product, ProductCode};

pub type LookupResponder = oneshot::Sender<Result<Option<Product>, ServiceError>>;
pub type PurchaseResponder = oneshot::Sender<Result<PurchaseReply, ServiceError>>;

#[derive(Debug)]
pub struct LookupCall {
    pub code: ProductCode,
    pub respond_to: LookupResponder,
}

#[derive(Debug)]
pub struct PurchaseCall {
    pub lines: Vec<CartLine>,
    pub respond_to: PurchaseResponder,
}

pub struct MockCatalog {
    calls: mpsc::UnboundedSender<LookupCall>,
}

pub struct MockPurchases {
    calls: mpsc::UnboundedSender<PurchaseCall>,
}

/// A failure as the HTTP layer would report it.
pub fn transport_failure() -> ServiceError {
    ServiceError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: "backend unavailable".to_string(),
    }
}

#[async_trait]
impl CatalogLookup for MockCatalog {
    async fn lookup(&self, code: &ProductCode) -> Result<Option<Product>, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.calls
            .send(LookupCall {
                code: code.clone(),
                respond_to,
            })
            .map_err(|_| transport_failure())?;
        response.await.map_err(|_| transport_failure())?
    }
}

#[async_trait]
impl PurchaseGateway for MockPurchases {
    async fn purchase(&self, lines: &[CartLine]) -> Result<PurchaseReply, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.calls
            .send(PurchaseCall {
                lines: lines.to_vec(),
                respond_to,
            })
            .map_err(|_| transport_failure())?;
        response.await.map_err(|_| transport_failure())?
    }
}

pub fn create_mock_catalog() -> (Arc<MockCatalog>, mpsc::UnboundedReceiver<LookupCall>) {
    let (calls, receiver) = mpsc::unbounded_channel();
    (Arc::new(MockCatalog { calls }), receiver)
}

pub fn create_mock_purchases() -> (Arc<MockPurchases>, mpsc::UnboundedReceiver<PurchaseCall>) {
    let (calls, receiver) = mpsc::unbounded_channel();
    (Arc::new(MockPurchases { calls }), receiver)
}

/// Waits for the next lookup the register makes.
pub async fn expect_lookup(
    receiver: &mut mpsc::UnboundedReceiver<LookupCall>,
) -> Option<(ProductCode, LookupResponder)> {
    receiver
        .recv()
        .await
        .map(|call| (call.code, call.respond_to))
}

/// Waits for the next purchase the register submits.
pub async fn expect_purchase(
    receiver: &mut mpsc::UnboundedReceiver<PurchaseCall>,
) -> Option<(Vec<CartLine>, PurchaseResponder)> {
    receiver
        .recv()
        .await
        .map(|call| (call.lines, call.respond_to))
}

/// True when the register has not made any call the test has not consumed.
/// A mock that has already been dropped cannot have pending calls either.
pub fn no_pending_calls<T>(receiver: &mut mpsc::UnboundedReceiver<T>) -> bool {
    matches!(
        receiver.try_recv(),
        Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog() {
        let (catalog, mut receiver) = create_mock_catalog();
        let code = ProductCode::parse("4901234567890").unwrap();

        let lookup = tokio::spawn({
            let code = code.clone();
            async move { catalog.lookup(&code).await }
        });

        let (requested, responder) = expect_lookup(&mut receiver).await.expect("Expected lookup");
        assert_eq!(requested, code);
        responder.send(Ok(None)).unwrap();

        let result = lookup.await.unwrap();
        assert!(matches!(result, Ok(None)));
        assert!(no_pending_calls(&mut receiver));
    }

    #[tokio::test]
    async fn dropped_mock_has_no_pending_calls() {
        let (catalog, mut lookups) = create_mock_catalog();
        let (purchases, mut sales) = create_mock_purchases();
        assert!(no_pending_calls(&mut lookups));

        drop(catalog);
        drop(purchases);
        assert!(no_pending_calls(&mut lookups));
        assert!(no_pending_calls(&mut sales));
    }

    #[tokio::test]
    async fn unconsumed_call_is_pending() {
        let (catalog, mut lookups) = create_mock_catalog();
        let code = ProductCode::parse("4901234567890").unwrap();
        let lookup = tokio::spawn(async move { catalog.lookup(&code).await });

        // The call stays queued until something drains it.
        while lookups.is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(!no_pending_calls(&mut lookups));
        assert!(lookup.await.unwrap().is_err());
    }

    #[tokio::test]
    async fn dropped_responder_reads_as_transport_failure() {
        let (purchases, mut receiver) = create_mock_purchases();
        let sale = tokio::spawn(async move { purchases.purchase(&[]).await });

        let (lines, responder) = expect_purchase(&mut receiver).await.expect("Expected purchase");
        assert!(lines.is_empty());
        drop(responder);

        assert!(matches!(sale.await.unwrap(), Err(ServiceError::Status { .. })));
    }
}
