// # zonesync-core
//
// Core library for synchronizing DNS zone records against a remote store.
//
// ## Architecture Overview
//
// - **Record**: provider-independent DNS record (name, type, value, TTL)
// - **ZoneRecordStore**: trait for remote stores exposing list/append/delete
// - **Reconciler**: upsert semantics (`set`) built from those three calls
// - **StoreRegistry**: plugin-based registry creating stores from config
//
// ## Design Principles
//
// 1. **Stores are dumb**: one request per call, no retries, no caching
// 2. **Availability first**: `set` appends before it deletes, and a failed
//    cleanup delete is reported rather than raised
// 3. **Library-First**: nothing here logs to stdout, panics or exits

pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{ProviderConfig, ZoneSyncConfig};
pub use error::{Error, Result};
pub use reconciler::{Reconciler, SetReport, superseded_by};
pub use record::Record;
pub use registry::StoreRegistry;
pub use traits::{StoreFactory, ZoneRecordStore};
