// # Regery Zone Record Store
//
// This crate provides a zonesync store backed by the Regery domains API.
//
// ## Behaviour
//
// - One HTTP request per store call
// - Success is strictly HTTP 200; any other status is returned as
//   `Error::Api` with the raw body, without trying to parse partial results
// - No retry, backoff or caching (callers own those decisions)
// - Append and delete echo their input; the API does not report what it
//   actually created or removed
// - Dry-run mode performs reads but only logs writes
//
// ## Security Requirements
//
// - API token and secret NEVER appear in logs or Debug output
// - Construction fails if either credential is empty
//
// ## API Reference
//
// - List records:   GET    `{base}/{zone}/records`
// - Append records: POST   `{base}/{zone}/records` with `{"records": [...]}`
// - Delete records: DELETE `{base}/{zone}/records` with `{"records": [...]}`
// - Auth header:    `Authorization: {token}:{secret}`
//
// The zone is sent as one percent-encoded path segment, so `/`, `?` or `#`
// in a zone name can never address another resource.

pub mod wire;

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use zonesync_core::config::{ProviderConfig, default_ttl_secs};
use zonesync_core::traits::{StoreFactory, ZoneRecordStore};
use zonesync_core::{Error, Record, Result};

use wire::{RecordsEnvelope, RegeryRecord};

/// Regery API base URL
pub const REGERY_API_BASE: &str = "https://api.regery.com/v1/domains";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Regery zone record store
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the store will:
/// - Perform GET requests (listing)
/// - Log the body it would POST or DELETE
/// - **NOT** change any record
pub struct RegeryProvider {
    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API secret
    /// ⚠️ NEVER log this value
    secret: String,

    /// Base URL of the domains API, without trailing slash
    base_url: String,

    /// TTL substituted for outgoing records without one
    default_ttl_secs: u64,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list for real but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for RegeryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegeryProvider")
            .field("api_token", &"<REDACTED>")
            .field("secret", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RegeryProvider {
    /// Create a store with its own HTTP client (30 second timeout)
    pub fn new(api_token: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let client = build_client(DEFAULT_HTTP_TIMEOUT)?;
        Self::with_client(client, api_token, secret)
    }

    /// Create a store on top of a caller-provided HTTP client
    ///
    /// The client carries transport concerns (timeouts, TLS, pooling);
    /// sharing one client between stores is fine.
    pub fn with_client(
        client: reqwest::Client,
        api_token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self> {
        let api_token = api_token.into();
        let secret = secret.into();

        if api_token.is_empty() {
            return Err(Error::config("Regery API token cannot be empty"));
        }
        if secret.is_empty() {
            return Err(Error::config("Regery API secret cannot be empty"));
        }

        Ok(Self {
            api_token,
            secret,
            base_url: REGERY_API_BASE.to_string(),
            default_ttl_secs: default_ttl_secs(),
            client,
            dry_run: false,
        })
    }

    /// Point the store at another API base URL (staging, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// TTL in seconds sent for records without one
    pub fn with_default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether writes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone: &str) -> Result<reqwest::Url> {
        if zone.is_empty() || zone == "." || zone == ".." {
            return Err(Error::invalid_input(format!("Invalid zone name: {:?}", zone)));
        }

        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            Error::invalid_input(format!("Invalid Regery base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                Error::invalid_input(format!(
                    "Regery base URL {} cannot take path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(zone)
            .push("records");

        Ok(url)
    }

    fn authorization(&self) -> String {
        format!("{}:{}", self.api_token, self.secret)
    }

    /// Send a request and return the body of a 200 response
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e)))?;

        if status != StatusCode::OK {
            tracing::debug!("Regery answered {}: {}", status, body);
            return Err(Error::api(status.as_u16(), body));
        }

        Ok(body)
    }

    /// Send `records` to the records endpoint with a write method
    async fn write(
        &self,
        method: reqwest::Method,
        zone: &str,
        records: &[Record],
    ) -> Result<Vec<Record>> {
        let url = self.records_url(zone)?;
        let envelope = RecordsEnvelope::from_records(records, self.default_ttl_secs);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {} request to {} with payload: {}",
                method,
                url,
                serde_json::to_string(&envelope)?
            );
            return Ok(records.to_vec());
        }

        tracing::debug!("{} {} ({} record(s))", method, url, records.len());
        self.execute(self.client.request(method, url).json(&envelope))
            .await?;

        Ok(records.to_vec())
    }
}

#[async_trait]
impl ZoneRecordStore for RegeryProvider {
    /// List every record in the zone
    ///
    /// ```http
    /// GET /{zone}/records
    /// Authorization: <token>:<secret>
    /// ```
    async fn list(&self, zone: &str) -> Result<Vec<Record>> {
        let url = self.records_url(zone)?;
        tracing::debug!("GET {}", url);

        let body = self.execute(self.client.get(url)).await?;
        let envelope: RecordsEnvelope = serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Failed to parse records response: {}", e)))?;

        Ok(envelope
            .records
            .into_iter()
            .map(RegeryRecord::into_record)
            .collect())
    }

    /// Append records; unset TTLs are sent as the default TTL
    ///
    /// ```http
    /// POST /{zone}/records
    /// {"records": [{"address": "...", "type": "A", "ttl": 3600, "name": "www"}]}
    /// ```
    async fn append(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.write(reqwest::Method::POST, zone, records).await
    }

    /// Delete records; the API matches them itself
    ///
    /// ```http
    /// DELETE /{zone}/records
    /// {"records": [...]}
    /// ```
    async fn delete(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.write(reqwest::Method::DELETE, zone, records).await
    }

    fn store_name(&self) -> &'static str {
        "regery"
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

/// Factory for creating Regery stores
pub struct RegeryFactory;

impl StoreFactory for RegeryFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneRecordStore>> {
        match config {
            ProviderConfig::Regery {
                api_token,
                secret,
                base_url,
                default_ttl_secs,
                timeout_secs,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!("Regery store running in DRY-RUN mode - no changes will be made");
                }

                let client = build_client(Duration::from_secs(*timeout_secs))?;
                let mut provider = RegeryProvider::with_client(client, api_token, secret)?
                    .with_default_ttl(*default_ttl_secs)
                    .with_dry_run(*dry_run);
                if let Some(url) = base_url {
                    provider = provider.with_base_url(url);
                }

                Ok(Box::new(provider))
            }
            _ => Err(Error::config("Invalid config for Regery store")),
        }
    }
}

/// Register the Regery store with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::StoreRegistry;
///
/// let registry = StoreRegistry::new();
/// zonesync_provider_regery::register(&registry);
/// assert!(registry.has_store("regery"));
/// ```
pub fn register(registry: &zonesync_core::StoreRegistry) {
    registry.register_store("regery", Box::new(RegeryFactory));
}
