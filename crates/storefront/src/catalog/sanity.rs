//! Sanity content API client.
//!
//! Runs a single GROQ query against the HTTP query endpoint:
//!
//! ```text
//! GET https://{project}.apicdn.sanity.io/v{version}/data/query/{dataset}?query=...
//! ```
//!
//! and returns the documents from the `result` array.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogError, CatalogSource};
use crate::config::SanityConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Query response envelope.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Option<Vec<serde_json::Value>>,
}

/// Client for the Sanity HTTP query API.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
}

impl SanityClient {
    /// Create a client for the project and dataset in `config`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the endpoint URL cannot be built or the HTTP
    /// client cannot be initialized.
    pub fn new(config: &SanityConfig) -> Result<Self, CatalogError> {
        let host = if config.use_cdn { "apicdn" } else { "api" };
        let base = format!("https://{}.{host}.sanity.io", config.project_id);
        Self::with_base_url(config, &base)
    }

    /// Create a client that sends queries to `base_url` instead of Sanity's hosts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the endpoint URL cannot be built or the HTTP
    /// client cannot be initialized.
    pub fn with_base_url(config: &SanityConfig, base_url: &str) -> Result<Self, CatalogError> {
        let version = config.api_version.trim_start_matches('v');
        let mut endpoint = Url::parse(base_url)?.join(&format!(
            "v{version}/data/query/{}",
            config.dataset
        ))?;
        endpoint
            .query_pairs_mut()
            .append_pair("query", &products_query(&config.document_type));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client,
                endpoint,
                token: config.token.clone(),
            }),
        })
    }

    /// The full query URL, including the GROQ query.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

#[async_trait]
impl CatalogSource for SanityClient {
    #[instrument(skip(self))]
    async fn fetch_documents(&self) -> Result<Vec<serde_json::Value>, CatalogError> {
        let mut request = self.inner.client.get(self.inner.endpoint.clone());
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Logged once by the caller when the error is reported.
            debug!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: QueryResponse = serde_json::from_str(&body)?;
        let documents = parsed.result.unwrap_or_default();
        debug!(count = documents.len(), "Fetched catalog documents");
        Ok(documents)
    }
}

/// GROQ projection of catalog products.
fn products_query(document_type: &str) -> String {
    format!(
        r#"*[_type == "{document_type}"] {{
    _id,
    name,
    brand,
    puffCount,
    nicotine,
    flavors,
    price,
    discount,
    "imageUrl": image.asset->url
}}"#
    )
}
