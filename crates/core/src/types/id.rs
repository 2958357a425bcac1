//! Newtype IDs for type-safe entity references.
//!
//! Catalog documents are identified by opaque string IDs assigned by the
//! content API (e.g. `"9f1c2a7e-..."` or `"drafts.abc"`). The storefront never
//! interprets them; it only compares and stores them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a catalog product.
///
/// # Example
///
/// ```rust
/// use jvapes_core::ProductId;
///
/// let id = ProductId::new("abc-123");
/// assert_eq!(id.as_str(), "abc-123");
/// assert_eq!(id, ProductId::from("abc-123"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the ID is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_transparently() {
        let id = ProductId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let parsed: ProductId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_product_id_blank() {
        assert!(ProductId::new("   ").is_blank());
        assert!(!ProductId::new("a").is_blank());
    }
}
