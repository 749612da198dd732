//! Regery wire format
//!
//! Every records endpoint uses the same envelope:
//!
//! ```json
//! {"records": [{"address": "10.0.0.1", "type": "A", "ttl": 300, "name": "www"}]}
//! ```
//!
//! TTLs are whole seconds on the wire. The API stores them as signed
//! integers, so negative or null TTLs are read as zero rather than failing
//! the whole listing.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use zonesync_core::Record;

/// One record as the Regery API exchanges it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegeryRecord {
    /// Record data; some responses call this `value`
    #[serde(alias = "value")]
    pub address: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(default, deserialize_with = "signed_ttl")]
    pub ttl: u64,

    pub name: String,
}

impl RegeryRecord {
    /// Translate an outgoing record, replacing an unset TTL with `default_ttl_secs`
    pub fn from_record(record: &Record, default_ttl_secs: u64) -> Self {
        Self {
            address: record.value.clone(),
            record_type: record.record_type.clone(),
            ttl: record.ttl_or(default_ttl_secs),
            name: record.name.clone(),
        }
    }

    /// Translate an incoming record.
    ///
    /// The API returns no record identity, so the name stands in for it.
    /// The TTL is taken as stored, zero included.
    pub fn into_record(self) -> Record {
        Record {
            id: self.name.clone(),
            name: self.name,
            record_type: self.record_type,
            value: self.address,
            ttl: Duration::from_secs(self.ttl),
        }
    }
}

/// Request and response body of the records endpoints
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordsEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub records: Vec<RegeryRecord>,
}

impl RecordsEnvelope {
    pub fn from_records(records: &[Record], default_ttl_secs: u64) -> Self {
        Self {
            records: records
                .iter()
                .map(|r| RegeryRecord::from_record(r, default_ttl_secs))
                .collect(),
        }
    }
}

fn signed_ttl<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let ttl = Option::<i128>::deserialize(deserializer)?.unwrap_or(0);
    Ok(u64::try_from(ttl.max(0)).unwrap_or(u64::MAX))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RegeryRecord>, D::Error> {
    Option::<Vec<RegeryRecord>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_is_sent_as_default() {
        let record = Record::new("www", "A", "10.0.0.1");
        let wire = RegeryRecord::from_record(&record, 3600);

        assert_eq!(wire.ttl, 3600);
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            serde_json::json!({"address": "10.0.0.1", "type": "A", "ttl": 3600, "name": "www"})
        );
    }

    #[test]
    fn test_explicit_ttl_is_sent_as_seconds() {
        let record = Record::new("www", "A", "10.0.0.2").with_ttl(600);
        assert_eq!(RegeryRecord::from_record(&record, 3600).ttl, 600);
    }

    #[test]
    fn test_incoming_record_uses_name_as_id() {
        let wire = RegeryRecord {
            address: "example.net".to_string(),
            record_type: "CNAME".to_string(),
            ttl: 300,
            name: "shop".to_string(),
        };

        let record = wire.into_record();
        assert_eq!(record.id, "shop");
        assert_eq!(record.name, "shop");
        assert_eq!(record.value, "example.net");
        assert_eq!(record.ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_incoming_zero_ttl_is_kept() {
        let envelope: RecordsEnvelope = serde_json::from_str(
            r#"{"records": [{"address": "10.0.0.1", "type": "A", "ttl": 0, "name": "www"}]}"#,
        )
        .unwrap();

        let record = envelope.records[0].clone().into_record();
        assert_eq!(record.ttl, Duration::ZERO);
    }

    #[test]
    fn test_negative_or_null_ttl_reads_as_zero() {
        let envelope: RecordsEnvelope = serde_json::from_str(
            r#"{"records": [
                {"address": "10.0.0.1", "type": "A", "ttl": -1, "name": "neg"},
                {"address": "10.0.0.2", "type": "A", "ttl": null, "name": "null"},
                {"address": "10.0.0.3", "type": "A", "name": "missing"},
                {"address": "10.0.0.4", "type": "A", "ttl": 300, "name": "ok"}
            ]}"#,
        )
        .unwrap();

        let ttls: Vec<u64> = envelope.records.iter().map(|r| r.ttl).collect();
        assert_eq!(ttls, vec![0, 0, 0, 300]);
    }

    #[test]
    fn test_oversized_ttl_saturates() {
        let envelope: RecordsEnvelope = serde_json::from_str(
            r#"{"records": [{"address": "10.0.0.1", "type": "A", "ttl": 18446744073709551616, "name": "big"}]}"#,
        )
        .unwrap();

        assert_eq!(envelope.records[0].ttl, u64::MAX);
    }

    #[test]
    fn test_value_is_accepted_for_address() {
        let envelope: RecordsEnvelope = serde_json::from_str(
            r#"{"records": [{"value": "hello", "type": "TXT", "ttl": 60, "name": "txt"}]}"#,
        )
        .unwrap();

        assert_eq!(envelope.records[0].address, "hello");
    }

    #[test]
    fn test_null_or_missing_records_read_as_empty() {
        let null: RecordsEnvelope = serde_json::from_str(r#"{"records": null}"#).unwrap();
        let missing: RecordsEnvelope = serde_json::from_str("{}").unwrap();

        assert!(null.records.is_empty());
        assert!(missing.records.is_empty());
    }
}
