//! HTTP directory listing catalog.

use crate::error::{ErrorKind, Result};
use crate::{Catalog, parse_listing};
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;

/// Fetches a listing page with a single GET and scrapes its anchors.
///
/// There are no retries or timeouts beyond what the HTTP client does by
/// default: a listing that can't be fetched ends the run.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    url: String,
    client: reqwest::Client,
}
impl HttpCatalog {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Raw listing body. Exposed separately so callers can report its size.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .or_raise(|| ErrorKind::Request(self.url.clone()))?;
        let body = response.text().await.or_raise(|| ErrorKind::Body(self.url.clone()))?;
        tracing::info!(bytes = body.len(), "Fetched listing");
        Ok(body)
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    fn source(&self) -> &str {
        &self.url
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(parse_listing(&self.fetch().await?))
    }
}
