//! Where the list of candidate files comes from.
//!
//! The usual source is an HTML directory listing served over HTTP, where
//! every anchor's text is one file identifier. [`StaticCatalog`] skips the
//! network for identifiers known up front.

pub mod error;
mod http;
mod listing;

pub use crate::http::HttpCatalog;
pub use crate::listing::parse_listing;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type CatalogHandle = Arc<dyn Catalog + Send + Sync>;

/// Anything able to produce file identifiers, in listing order.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Human-readable origin of the identifiers (for logging only).
    fn source(&self) -> &str;

    async fn list(&self) -> Result<Vec<String>>;
}

/// A fixed list of identifiers.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    entries: Vec<String>,
}
impl StaticCatalog {
    pub fn new(entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    fn source(&self) -> &str {
        "static"
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries.clone())
    }
}
