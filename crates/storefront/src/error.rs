//! Unified error handling with Sentry integration.
//!
//! Session operations return [`StorefrontError`]. Each failure is logged
//! exactly once; the Sentry tracing layer turns that log line into the event,
//! so nothing here calls the Sentry client directly except breadcrumbs.

use jvapes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Session-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The catalog could not be loaded. Terminal for the session.
    #[error("Catalog unavailable: {0}")]
    CatalogFetchFailed(#[from] CatalogError),

    /// No product with this id in the loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product does not come in the requested flavor.
    #[error("Flavor '{flavor}' is not available for product {product_id}")]
    FlavorUnavailable {
        product_id: ProductId,
        flavor: String,
    },

    /// Local storage failed; the session continues in memory.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,
}

impl StorefrontError {
    /// Log the error, at error level when it indicates a fault rather than a
    /// visitor mistake.
    pub fn report(&self) {
        if matches!(self, Self::CatalogFetchFailed(_)) {
            tracing::error!(error = %self, "Storefront error");
        } else {
            tracing::warn!(error = %self, "Storefront action rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for visitor actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "abc123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
