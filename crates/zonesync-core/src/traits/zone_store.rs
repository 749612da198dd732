// # Zone Record Store Trait
//
// Defines the interface to a remote, authoritative zone record store.
//
// ## Implementations
//
// - Regery: `zonesync-provider-regery` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{Record, ZoneRecordStore};
//
// async fn show(store: &dyn ZoneRecordStore) -> zonesync_core::Result<()> {
//     for record in store.list("example.com").await? {
//         println!("{record}");
//     }
//     Ok(())
// }
// ```

use crate::error::{Error, Result};
use crate::record::Record;
use async_trait::async_trait;

/// Trait for remote zone record stores
///
/// A store exposes three primitives only: list, append and delete. There is
/// no native upsert; [`Reconciler::set`](crate::Reconciler::set) builds one
/// on top of these.
///
/// # Contract
///
/// - Every call is a single, independent request. Stores keep no record
///   state between calls.
/// - No retries. A failure is returned to the caller as-is.
/// - `append` and `delete` echo their input on success. The remote API is
///   not a source of truth for what was actually created or removed.
///
/// A store that only supports reading may implement `list` alone; the
/// default write methods report [`Error::NotImplemented`].
#[async_trait]
pub trait ZoneRecordStore: Send + Sync {
    /// List every record currently in `zone`, in store order
    ///
    /// The result is a point-in-time snapshot with no consistency guarantee
    /// across later calls.
    async fn list(&self, zone: &str) -> Result<Vec<Record>>;

    /// Add `records` to `zone`
    ///
    /// Records that already exist are not detected; an append-only store
    /// will hold duplicates afterwards.
    async fn append(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let _ = (zone, records);
        Err(Error::not_implemented(format!(
            "append for {} store",
            self.store_name()
        )))
    }

    /// Remove `records` from `zone`
    ///
    /// How records are matched for removal is defined by the store.
    async fn delete(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let _ = (zone, records);
        Err(Error::not_implemented(format!(
            "delete for {} store",
            self.store_name()
        )))
    }

    /// Store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing stores from configuration
pub trait StoreFactory: Send + Sync {
    /// Create a store instance from its provider configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn ZoneRecordStore>>;
}
