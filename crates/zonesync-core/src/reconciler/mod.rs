//! Zone reconciler
//!
//! The [`Reconciler`] turns an idempotent-looking "set these records"
//! request into the append and delete calls a [`ZoneRecordStore`]
//! understands.
//!
//! ## Set Flow
//!
//! ```text
//!          list(zone)                append(zone, desired)      delete(zone, superseded)
//! set ──▶ ┌──────────┐  superseded  ┌──────────────────┐        ┌──────────────────────┐
//!         │ snapshot │─────────────▶│ all desired, new │───────▶│ same-named, old only │
//!         └──────────┘              └──────────────────┘        └──────────────────────┘
//!            fatal                        fatal                  logged, never raised
//! ```
//!
//! 1. Snapshot the zone. A failure here stops everything.
//! 2. Select every existing record whose name matches a desired record.
//! 3. Append the whole desired set, before anything is removed, so a name
//!    never resolves to nothing. Old and new records coexist briefly.
//! 4. Delete the selected records from the snapshot. Failure is reported in
//!    the [`SetReport`] and logged, but `set` still succeeds.
//! 5. Return what `append` echoed back.
//!
//! ## Known Limitations
//!
//! - `set` is not idempotent: appending is unconditional, so setting records
//!   whose names are not yet in the zone twice leaves duplicates behind.
//! - A successful `set` can leave stale records in the zone when the cleanup
//!   delete fails or the call is cancelled after the append. Another `set`
//!   or manual cleanup is needed to converge.
//! - Concurrent `set` calls against the same zone are not coordinated.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::traits::ZoneRecordStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a full reconciliation
#[derive(Debug)]
pub struct SetReport {
    /// Records echoed by the append call
    pub applied: Vec<Record>,

    /// Existing records selected for removal
    pub superseded: Vec<Record>,

    /// Why removing `superseded` failed, if it did
    pub cleanup_error: Option<Error>,
}

impl SetReport {
    /// Whether superseded records were left behind in the zone
    pub fn left_stale_records(&self) -> bool {
        self.cleanup_error.is_some() && !self.superseded.is_empty()
    }
}

/// Select the existing records that `desired` replaces.
///
/// An existing record is selected when any desired record shares its name.
/// Every same-named existing record is selected, whatever its type or value,
/// and each at most once, in snapshot order.
pub fn superseded_by(existing: &[Record], desired: &[Record]) -> Vec<Record> {
    existing
        .iter()
        .filter(|e| desired.iter().any(|d| d.same_name(e)))
        .cloned()
        .collect()
}

/// Upsert semantics on top of an append/delete-only store
///
/// The reconciler is stateless: it holds no records between calls and every
/// invocation runs its store calls strictly one after another.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ZoneRecordStore>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store.store_name())
            .finish()
    }
}

impl Reconciler {
    /// Create a reconciler over `store`
    pub fn new(store: Arc<dyn ZoneRecordStore>) -> Self {
        Self { store }
    }

    /// Name of the underlying store
    pub fn store_name(&self) -> &'static str {
        self.store.store_name()
    }

    /// List every record in `zone`
    pub async fn list(&self, zone: &str) -> Result<Vec<Record>> {
        check_zone(zone)?;
        let records = self.store.list(zone).await?;
        debug!("Listed {} record(s) in {}", records.len(), zone);
        Ok(records)
    }

    /// Append `records` to `zone`, returning them as echoed by the store
    pub async fn append(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        check_zone(zone)?;
        let appended = self.store.append(zone, records).await?;
        info!("Appended {} record(s) to {}", appended.len(), zone);
        Ok(appended)
    }

    /// Delete `records` from `zone`, returning them as echoed by the store
    pub async fn delete(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        check_zone(zone)?;
        let deleted = self.store.delete(zone, records).await?;
        info!("Deleted {} record(s) from {}", deleted.len(), zone);
        Ok(deleted)
    }

    /// Make `desired` the records for their names in `zone`
    ///
    /// Returns the records echoed by the append. A failed cleanup delete is
    /// logged and otherwise ignored; use [`Reconciler::reconcile`] to observe
    /// it.
    pub async fn set(&self, zone: &str, desired: &[Record]) -> Result<Vec<Record>> {
        self.reconcile(zone, desired).await.map(|report| report.applied)
    }

    /// Run the full set flow and report what happened
    ///
    /// Listing and appending failures are returned as errors. A deletion
    /// failure is carried in [`SetReport::cleanup_error`] instead.
    pub async fn reconcile(&self, zone: &str, desired: &[Record]) -> Result<SetReport> {
        let existing = self.list(zone).await?;
        let superseded = superseded_by(&existing, desired);

        debug!(
            "Setting {} record(s) in {}: {} existing, {} superseded",
            desired.len(),
            zone,
            existing.len(),
            superseded.len()
        );

        let applied = self.append(zone, desired).await?;

        if superseded.is_empty() {
            return Ok(SetReport {
                applied,
                superseded,
                cleanup_error: None,
            });
        }

        let cleanup_error = match self.delete(zone, &superseded).await {
            Ok(_) => None,
            Err(e) => {
                warn!(
                    "Failed to delete {} superseded record(s) in {}, stale records remain: {}",
                    superseded.len(),
                    zone,
                    e
                );
                Some(e)
            }
        };

        Ok(SetReport {
            applied,
            superseded,
            cleanup_error,
        })
    }
}

fn check_zone(zone: &str) -> Result<()> {
    if zone.trim().is_empty() {
        return Err(Error::invalid_input("zone cannot be empty"));
    }
    Ok(())
}
