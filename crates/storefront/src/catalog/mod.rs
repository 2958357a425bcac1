//! Product catalog: the session-immutable list of products and the source it
//! is fetched from.
//!
//! # Architecture
//!
//! - [`CatalogSource`] is the one-shot query boundary. The production source is
//!   [`SanityClient`]; tests substitute their own.
//! - [`Catalog`] is built once per session from the raw documents. Documents that
//!   cannot become a [`Product`] are skipped with a warning so one bad record
//!   does not take the grid down.
//! - No retries and no caching: a failed fetch is terminal for the session.

mod product;
mod sanity;

use std::collections::BTreeSet;

use async_trait::async_trait;
use jvapes_core::{ProductId, PuffCount};
use thiserror::Error;
use tracing::warn;

pub use product::{
    GRID_PLACEHOLDER_IMAGE, Product, ProductRecordError, RawProduct, THUMBNAIL_PLACEHOLDER_IMAGE,
};
pub use sanity::SanityClient;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured project or dataset does not form a valid URL.
    #[error("Invalid catalog endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// One-shot source of catalog documents.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every product document, in catalog order.
    async fn fetch_documents(&self) -> Result<Vec<serde_json::Value>, CatalogError>;
}

/// The full product list for a session, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from already-validated products.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Build a catalog from raw API documents, skipping unusable ones.
    #[must_use]
    pub fn from_documents(documents: Vec<serde_json::Value>) -> Self {
        let products = documents
            .into_iter()
            .enumerate()
            .filter_map(|(index, document)| {
                let id = document
                    .get("_id")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("<unknown>")
                    .to_string();
                let converted = serde_json::from_value::<RawProduct>(document)
                    .map_err(|e| e.to_string())
                    .and_then(|raw| Product::try_from(raw).map_err(|e| e.to_string()));
                match converted {
                    Ok(product) => Some(product),
                    Err(reason) => {
                        warn!(index, product_id = %id, %reason, "Skipping malformed catalog record");
                        None
                    }
                }
            })
            .collect();

        Self { products }
    }

    /// Fetch and build the catalog from a source.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the source fails. Malformed individual
    /// records are not errors.
    pub async fn fetch(source: &dyn CatalogSource) -> Result<Self, CatalogError> {
        let documents = source.fetch_documents().await?;
        Ok(Self::from_documents(documents))
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct brands, sorted alphabetically. Feeds the brand filter options.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(|p| p.brand.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct puff counts, sorted ascending. Feeds the puff filter options.
    #[must_use]
    pub fn puff_counts(&self) -> Vec<PuffCount> {
        self.products
            .iter()
            .map(|p| p.puff_count)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
