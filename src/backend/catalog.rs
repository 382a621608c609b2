use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::domain::{Product, ProductCode};

use super::wire::{ProductListing, ProductPayload};
use super::{ApiEndpoint, ServiceError};

/// Resolves product codes. `Ok(None)` is a clean miss, distinct from a
/// failed call.
#[async_trait]
pub trait CatalogLookup: Send + Sync + 'static {
    async fn lookup(&self, code: &ProductCode) -> Result<Option<Product>, ServiceError>;
}

/// `GET /api/products/{code}` against the POS backend.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    api: ApiEndpoint,
}

impl HttpCatalog {
    pub fn new(api: ApiEndpoint) -> Self {
        Self { api }
    }

    /// Whole product master, for checking what can be scanned. Rows that do
    /// not resolve are left out.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        let url = self.api.url(&["api", "products"])?;
        let listing: ProductListing = self.api.get_json(url).await?;
        let reported = listing.count;
        let products: Vec<Product> = listing
            .products
            .into_iter()
            .filter_map(|row| row.resolve(None))
            .collect();
        info!(reported, resolved = products.len(), "Listed products");
        Ok(products)
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    #[instrument(skip(self, code), fields(code = %code))]
    async fn lookup(&self, code: &ProductCode) -> Result<Option<Product>, ServiceError> {
        let url = self.api.url(&["api", "products", code.as_str()])?;
        let payload: ProductPayload = self.api.get_json(url).await?;
        let product = payload.resolve(Some(code));
        match &product {
            Some(product) => debug!(product_name = %product.name, price = product.unit_price, "Product resolved"),
            None => debug!("Catalog returned an empty product"),
        }
        Ok(product)
    }
}
