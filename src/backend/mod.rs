//! HTTP collaborators: the catalog lookup and purchase services.
//!
//! The register only depends on the [`CatalogLookup`] and [`PurchaseGateway`]
//! traits; the `Http*` types here are the production implementations.

pub mod catalog;
pub mod error;
pub mod health;
pub mod purchase;
pub mod wire;

pub use catalog::*;
pub use error::*;
pub use health::*;
pub use purchase::*;

use reqwest::{Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

/// Shared HTTP client plus the backend base URL.
#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    http: Client,
    base: Url,
}

impl ApiEndpoint {
    pub fn new(base: Url) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Endpoint(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip(self, url), fields(url = %url))]
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        debug!("Sending GET");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    #[instrument(skip(self, url, body), fields(url = %url))]
    pub(crate) async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Sending POST");
        let response = self.http.post(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let text = response.text().await?;
    decode_body(status, &text)
}

/// Non-2xx replies and bodies that do not match `T` both come back as errors.
fn decode_body<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, ServiceError> {
    if !status.is_success() {
        return Err(ServiceError::Status {
            status,
            detail: wire::error_detail(text),
        });
    }
    Ok(serde_json::from_str(text)?)
}
