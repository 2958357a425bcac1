//! Best-effort local persistence.
//!
//! Two independent records live in a [`KeyValueStore`]:
//!
//! | Key | Value |
//! |-----|-------|
//! | `jvapes_cart` | JSON array of cart lines |
//! | `age_verified` | `"true"` once the visitor confirmed their age |
//!
//! A missing or unreadable record means an empty cart or an unverified
//! visitor. Callers decide what to do when the store itself is unavailable.

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::cart::Cart;

/// Key of the serialized cart.
pub const CART_KEY: &str = "jvapes_cart";

/// Key of the age confirmation flag.
pub const AGE_VERIFIED_KEY: &str = "age_verified";

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// String key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a record. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a record, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a record. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load the saved cart.
///
/// A missing or malformed record yields an empty cart.
///
/// # Errors
///
/// Returns `StorageError` only when the store itself cannot be read.
pub async fn load_cart(store: &dyn KeyValueStore) -> Result<Cart, StorageError> {
    let Some(raw) = store.get(CART_KEY).await? else {
        debug!("No saved cart");
        return Ok(Cart::new());
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            debug!(lines = cart.len(), "Loaded saved cart");
            Ok(cart)
        }
        Err(e) => {
            warn!(error = %e, "Saved cart is malformed, starting with an empty cart");
            Ok(Cart::new())
        }
    }
}

/// Persist the full cart.
///
/// # Errors
///
/// Returns `StorageError` if the cart cannot be written.
pub async fn save_cart(store: &dyn KeyValueStore, cart: &Cart) -> Result<(), StorageError> {
    let json = serde_json::to_string(cart)?;
    store.set(CART_KEY, &json).await
}

/// Whether the visitor has confirmed their age.
///
/// # Errors
///
/// Returns `StorageError` only when the store itself cannot be read.
pub async fn load_age_verified(store: &dyn KeyValueStore) -> Result<bool, StorageError> {
    Ok(store
        .get(AGE_VERIFIED_KEY)
        .await?
        .is_some_and(|value| !value.trim().is_empty()))
}

/// Record the visitor's age confirmation.
///
/// # Errors
///
/// Returns `StorageError` if the flag cannot be written.
pub async fn save_age_verified(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.set(AGE_VERIFIED_KEY, "true").await
}

/// Keys become file names, so they are restricted to a safe alphabet.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_cart_is_empty() {
        let store = MemoryStore::new();
        assert!(load_cart(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_cart_is_empty() {
        let store = MemoryStore::new();
        store.set(CART_KEY, "{not json").await.unwrap();
        assert!(load_cart(&store).await.unwrap().is_empty());

        store.set(CART_KEY, r#"{"cart": []}"#).await.unwrap();
        assert!(load_cart(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_round_trips_through_store() {
        let store = MemoryStore::new();
        let raw = r#"[{"cartId":"A-Mint","productId":"A","name":"Elf Bar","brand":"Elf Bar","flavor":"Mint","price":1600,"qty":2,"image":"https://placehold.co/100x100"}]"#;
        store.set(CART_KEY, raw).await.unwrap();

        let cart = load_cart(&store).await.unwrap();
        assert_eq!(cart.totals().total_quantity, 2);

        save_cart(&store, &cart).await.unwrap();
        assert_eq!(store.get(CART_KEY).await.unwrap().unwrap(), raw);
    }

    #[tokio::test]
    async fn test_age_flag() {
        let store = MemoryStore::new();
        assert!(!load_age_verified(&store).await.unwrap());

        save_age_verified(&store).await.unwrap();
        assert!(load_age_verified(&store).await.unwrap());
        assert_eq!(
            store.get(AGE_VERIFIED_KEY).await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key(CART_KEY).is_ok());
        assert!(validate_key(AGE_VERIFIED_KEY).is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
