//! Integration tests for the `J_VAPES` storefront.
//!
//! Sessions run end to end against a mock content API (`wiremock`) and a
//! temporary storage directory (`tempfile`).
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jvapes-integration-tests
//! ```

use jvapes_storefront::Session;
use jvapes_storefront::catalog::{CatalogError, SanityClient};
use jvapes_storefront::config::{CheckoutConfig, DEFAULT_DELIVERY_NOTE, SanityConfig};
use jvapes_storefront::render::HtmlRenderer;
use jvapes_storefront::storage::FileStore;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the client queries for the test project.
pub const QUERY_PATH: &str = "/v2023-01-01/data/query/production";

/// Catalog used across the tests.
#[must_use]
pub fn catalog_documents() -> Vec<serde_json::Value> {
    vec![
        json!({
            "_id": "elf-bc5000",
            "name": "Elf Bar BC5000",
            "brand": "Elf Bar",
            "puffCount": 5000,
            "nicotine": "5%",
            "flavors": ["Mint", "Mango Ice"],
            "price": 2000,
            "discount": 20,
            "imageUrl": "https://cdn.sanity.io/images/2aveaa71/production/elf.png"
        }),
        json!({
            "_id": "geek-pulse",
            "name": "Geek Bar Pulse",
            "brand": "Geek Bar",
            "puffCount": "15000",
            "flavors": ["Watermelon Ice"],
            "price": 3200,
            "discount": 0
        }),
        json!({
            "_id": "solo-600",
            "name": "Solo 600",
            "brand": "Solo",
            "puffCount": 600,
            "price": 900
        }),
        // Missing price: skipped.
        json!({
            "_id": "broken",
            "name": "Broken",
            "brand": "Solo",
            "puffCount": 600
        }),
    ]
}

/// Start a mock content API serving `documents`.
pub async fn mock_catalog(documents: Vec<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": documents })))
        .mount(&server)
        .await;
    server
}

/// Start a mock content API that always fails.
pub async fn failing_catalog() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;
    server
}

#[must_use]
pub fn sanity_config() -> SanityConfig {
    SanityConfig {
        project_id: "2aveaa71".to_string(),
        dataset: "production".to_string(),
        api_version: "2023-01-01".to_string(),
        use_cdn: true,
        token: None,
        document_type: "disposable".to_string(),
    }
}

#[must_use]
pub fn checkout_config() -> CheckoutConfig {
    CheckoutConfig {
        whatsapp_number: "254741658556".to_string(),
        store_name: "J_VAPES.KE".to_string(),
        delivery_note: DEFAULT_DELIVERY_NOTE.to_string(),
    }
}

/// Start a session against `server`, persisting into `storage`.
///
/// # Errors
///
/// Returns `CatalogError` if the client cannot be built for the server URL.
pub async fn start_session(
    server: &MockServer,
    storage: &TempDir,
) -> Result<Session<HtmlRenderer>, CatalogError> {
    let source = SanityClient::with_base_url(&sanity_config(), &server.uri())?;
    let store = FileStore::new(storage.path());
    Ok(Session::start(
        &source,
        Box::new(store),
        HtmlRenderer::new("J_VAPES.KE"),
        checkout_config(),
    )
    .await)
}
