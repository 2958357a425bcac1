//! Command implementations.
//!
//! Every command runs against a freshly started [`Session`] and prints the
//! view state it leaves behind.

pub mod age;
pub mod browse;
pub mod cart;
pub mod checkout;

use jvapes_storefront::Session;
use jvapes_storefront::catalog::{CatalogError, SanityClient};
use jvapes_storefront::config::StorefrontConfig;
use jvapes_storefront::render::HtmlRenderer;
use jvapes_storefront::storage::FileStore;
use thiserror::Error;

/// Errors that stop a command.
///
/// Rejected visitor actions (unknown product, empty cart) are not errors here;
/// they are printed and the command still succeeds.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog client could not be built from the configuration.
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    /// The HTML page could not be rendered.
    #[error("Failed to render page: {0}")]
    Render(String),

    /// The HTML page could not be written.
    #[error("Failed to write page: {0}")]
    Export(#[from] std::io::Error),
}

/// Start a session backed by the configured catalog and storage directory.
pub async fn open_session(
    config: &StorefrontConfig,
) -> Result<Session<HtmlRenderer>, CommandError> {
    let source = SanityClient::new(&config.sanity)?;
    let store = FileStore::new(&config.storage_dir);
    let renderer = HtmlRenderer::new(config.checkout.store_name.clone());

    Ok(Session::start(&source, Box::new(store), renderer, config.checkout.clone()).await)
}
