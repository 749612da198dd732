//! Configuration types for zonesync
//!
//! This module defines the configuration structures shared by the stores
//! and the command-line harness.

use serde::{Deserialize, Serialize};

/// Top-level zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSyncConfig {
    /// Zone to operate on (e.g., "example.com")
    pub zone: String,

    /// Store provider configuration
    pub provider: ProviderConfig,
}

impl ZoneSyncConfig {
    /// Create a configuration for `zone`
    pub fn new(zone: impl Into<String>, provider: ProviderConfig) -> Self {
        Self {
            zone: zone.into(),
            provider,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone.trim().is_empty() {
            return Err(crate::Error::config("Zone cannot be empty"));
        }

        self.provider.validate()
    }
}

/// Store provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Regery domains API
    Regery {
        /// API token, sent as the first half of the Authorization header
        api_token: String,

        /// API secret, sent as the second half of the Authorization header
        secret: String,

        /// Override for the API base URL
        #[serde(default)]
        base_url: Option<String>,

        /// TTL in seconds substituted for records without one
        #[serde(default = "default_ttl_secs")]
        default_ttl_secs: u64,

        /// Per-request HTTP timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,

        /// Log writes instead of sending them
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom store
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Regery configuration with default TTL, timeout and live mode
    pub fn regery(api_token: impl Into<String>, secret: impl Into<String>) -> Self {
        ProviderConfig::Regery {
            api_token: api_token.into(),
            secret: secret.into(),
            base_url: None,
            default_ttl_secs: default_ttl_secs(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Regery {
                api_token,
                secret,
                base_url,
                default_ttl_secs,
                timeout_secs,
                ..
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Regery API token cannot be empty"));
                }
                if secret.is_empty() {
                    return Err(crate::Error::config("Regery API secret cannot be empty"));
                }
                if let Some(url) = base_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Regery base URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                if *default_ttl_secs == 0 {
                    return Err(crate::Error::config("Default TTL must be > 0"));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Request timeout must be > 0"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom store factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom store config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Regery { .. } => "regery",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

// Credentials stay out of Debug output.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Regery {
                base_url,
                default_ttl_secs,
                timeout_secs,
                dry_run,
                ..
            } => f
                .debug_struct("Regery")
                .field("api_token", &"<REDACTED>")
                .field("secret", &"<REDACTED>")
                .field("base_url", base_url)
                .field("default_ttl_secs", default_ttl_secs)
                .field("timeout_secs", timeout_secs)
                .field("dry_run", dry_run)
                .finish(),
            ProviderConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

/// TTL used when a record has none: one hour
pub fn default_ttl_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regery_defaults_from_json() {
        let config: ProviderConfig = serde_json::from_value(serde_json::json!({
            "type": "regery",
            "api_token": "token",
            "secret": "secret",
        }))
        .unwrap();

        match config {
            ProviderConfig::Regery {
                base_url,
                default_ttl_secs,
                timeout_secs,
                dry_run,
                ..
            } => {
                assert_eq!(base_url, None);
                assert_eq!(default_ttl_secs, 3600);
                assert_eq!(timeout_secs, 30);
                assert!(!dry_run);
            }
            other => panic!("unexpected config: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        assert!(ProviderConfig::regery("", "secret").validate().is_err());
        assert!(ProviderConfig::regery("token", "").validate().is_err());
        assert!(ProviderConfig::regery("token", "secret").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = ProviderConfig::regery("token", "secret");
        if let ProviderConfig::Regery { base_url, .. } = &mut config {
            *base_url = Some("ftp://api.example.com".to_string());
        }
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_zone() {
        let config = ZoneSyncConfig::new("  ", ProviderConfig::regery("token", "secret"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(ProviderConfig::regery("t", "s").type_name(), "regery");
        let custom = ProviderConfig::Custom {
            factory: "memory".to_string(),
            config: serde_json::json!({}),
        };
        assert_eq!(custom.type_name(), "memory");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ProviderConfig::regery("tok_12345", "sec_67890");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("tok_12345"));
        assert!(!debug_str.contains("sec_67890"));
        assert!(debug_str.contains("Regery"));
    }
}
