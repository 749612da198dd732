//! DNS record model
//!
//! [`Record`] is the canonical, provider-independent representation used by
//! callers. Records are transient values built per call; the authoritative
//! set always lives in the remote store.
//!
//! TTLs are held as a [`Duration`] and always exchanged as a whole number of
//! seconds. A zero TTL means "unset" and is left for the store to replace
//! with its own default.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One DNS entry within a zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Owning host/subdomain label within the zone (the matching key)
    pub name: String,

    /// DNS record type (A, AAAA, CNAME, TXT, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record data (address, target, text)
    pub value: String,

    /// Time-to-live, exchanged as whole seconds
    #[serde(with = "ttl_seconds", default)]
    pub ttl: Duration,

    /// Provider-assigned identity, empty when the provider has none
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

impl Record {
    /// Create a record with an unset TTL
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl: Duration::ZERO,
            id: String::new(),
        }
    }

    /// Set the TTL in seconds
    pub fn with_ttl(mut self, secs: u64) -> Self {
        self.ttl = Duration::from_secs(secs);
        self
    }

    /// Set the provider identity
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// TTL as whole seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs()
    }

    /// TTL in seconds, substituting `default_secs` when unset
    pub fn ttl_or(&self, default_secs: u64) -> u64 {
        match self.ttl_secs() {
            0 => default_secs,
            secs => secs,
        }
    }

    /// Whether `other` names the same host as this record.
    ///
    /// Type and value are ignored: a desired record supersedes every
    /// existing record that shares its name.
    pub fn same_name(&self, other: &Record) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} (ttl {}s)",
            self.name,
            self.record_type,
            self.value,
            self.ttl_secs()
        )
    }
}

mod ttl_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ttl.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
