//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SANITY_PROJECT_ID` - Sanity project hosting the catalog
//! - `CHECKOUT_WHATSAPP_NUMBER` - Phone number orders are sent to (digits only, with country code)
//!
//! ## Optional
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - API version date (default: 2023-01-01)
//! - `SANITY_USE_CDN` - Query the API CDN (default: true)
//! - `SANITY_TOKEN` - Read token for private datasets
//! - `SANITY_DOCUMENT_TYPE` - Document type holding products (default: disposable)
//! - `STORE_NAME` - Name in the order message header (default: `J_VAPES.KE`)
//! - `CHECKOUT_DELIVERY_NOTE` - Footer of the order message
//! - `STOREFRONT_STORAGE_DIR` - Local storage directory (default: .jvapes)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Delivery note appended to every order message unless overridden.
pub const DEFAULT_DELIVERY_NOTE: &str =
    "Delivery is approx 100-400 KES depending on location.";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Sanity content API configuration
    pub sanity: SanityConfig,
    /// Checkout handoff configuration
    pub checkout: CheckoutConfig,
    /// Directory holding the local key-value store
    pub storage_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Sanity content API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project ID (e.g., 2aveaa71)
    pub project_id: String,
    /// Dataset name (e.g., production)
    pub dataset: String,
    /// API version date (e.g., 2023-01-01)
    pub api_version: String,
    /// Query the CDN edge instead of the live API
    pub use_cdn: bool,
    /// Read token for private datasets
    pub token: Option<SecretString>,
    /// Document `_type` holding catalog products
    pub document_type: String,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("document_type", &self.document_type)
            .finish()
    }
}

/// Checkout handoff configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Phone number in international format, digits only (e.g., 254741658556)
    pub whatsapp_number: String,
    /// Store name printed in the order header
    pub store_name: String,
    /// Footer line describing delivery costs
    pub delivery_note: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the Sanity token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let sanity = SanityConfig::from_env()?;
        let checkout = CheckoutConfig::from_env()?;
        let storage_dir = PathBuf::from(get_env_or_default("STOREFRONT_STORAGE_DIR", ".jvapes"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            sanity,
            checkout,
            storage_dir,
            sentry_dsn,
        })
    }
}

impl SanityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let use_cdn = parse_bool("SANITY_USE_CDN", &get_env_or_default("SANITY_USE_CDN", "true"))?;
        let token = get_optional_env("SANITY_TOKEN")
            .map(|value| {
                validate_secret_strength(&value, "SANITY_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        Ok(Self {
            project_id: get_required_env("SANITY_PROJECT_ID")?,
            dataset: get_env_or_default("SANITY_DATASET", "production"),
            api_version: get_env_or_default("SANITY_API_VERSION", "2023-01-01"),
            use_cdn,
            token,
            document_type: get_env_or_default("SANITY_DOCUMENT_TYPE", "disposable"),
        })
    }
}

impl CheckoutConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let whatsapp_number = get_required_env("CHECKOUT_WHATSAPP_NUMBER")?;
        validate_phone_number(&whatsapp_number, "CHECKOUT_WHATSAPP_NUMBER")?;

        Ok(Self {
            whatsapp_number,
            store_name: get_env_or_default("STORE_NAME", "J_VAPES.KE"),
            delivery_note: get_env_or_default("CHECKOUT_DELIVERY_NOTE", DEFAULT_DELIVERY_NOTE),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Validate that a phone number is digits only, as `wa.me` links require.
fn validate_phone_number(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must contain digits only, including the country code (e.g. 254700000000)"
                .to_string(),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token generated by Sanity."
            ),
        ));
    }

    Ok(())
}
