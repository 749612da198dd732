//! Test doubles shared by the reconciler contract tests
//!
//! [`FakeZoneStore`] keeps a single zone in memory, records every call made
//! against it and can be told to fail any of its three operations.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use zonesync_core::error::{Error, Result};
use zonesync_core::{Record, ZoneRecordStore};

/// A store call as observed by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(String),
    Append(String, Vec<Record>),
    Delete(String, Vec<Record>),
}

/// In-memory zone with call tracking and failure injection
///
/// Deletion removes one matching record (name, type and value) per
/// requested record, so identical duplicates are removed one at a time.
#[derive(Default)]
pub struct FakeZoneStore {
    records: Mutex<Vec<Record>>,
    calls: Mutex<Vec<StoreCall>>,
    snapshots: Mutex<Vec<Vec<Record>>>,
    fail_list: AtomicBool,
    fail_append: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        let store = Self::new();
        *store.records.lock().unwrap() = records;
        store
    }

    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub fn fail_append(&self) {
        self.fail_append.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// Current zone contents
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Zone contents after each successful mutation
    pub fn snapshots(&self) -> Vec<Vec<Record>> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn append_calls(&self) -> Vec<Vec<Record>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Append(_, records) => Some(records),
                _ => None,
            })
            .collect()
    }

    pub fn delete_calls(&self) -> Vec<Vec<Record>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete(_, records) => Some(records),
                _ => None,
            })
            .collect()
    }

    fn snapshot(&self, records: &[Record]) {
        self.snapshots.lock().unwrap().push(records.to_vec());
    }
}

#[async_trait]
impl ZoneRecordStore for FakeZoneStore {
    async fn list(&self, zone: &str) -> Result<Vec<Record>> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::List(zone.to_string()));

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::transport("connection refused"));
        }
        Ok(self.records())
    }

    async fn append(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Append(zone.to_string(), records.to_vec()));

        if self.fail_append.load(Ordering::SeqCst) {
            return Err(Error::api(500, "internal error"));
        }

        let mut zone_records = self.records.lock().unwrap();
        zone_records.extend_from_slice(records);
        self.snapshot(&zone_records);
        Ok(records.to_vec())
    }

    async fn delete(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Delete(zone.to_string(), records.to_vec()));

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::api(503, "service unavailable"));
        }

        let mut zone_records = self.records.lock().unwrap();
        for target in records {
            if let Some(pos) = zone_records.iter().position(|r| {
                r.name == target.name
                    && r.record_type == target.record_type
                    && r.value == target.value
            }) {
                zone_records.remove(pos);
            }
        }
        self.snapshot(&zone_records);
        Ok(records.to_vec())
    }

    fn store_name(&self) -> &'static str {
        "fake"
    }
}

/// A store that can only list, like a provider whose writes are not wired up
pub struct ListOnlyStore {
    pub records: Vec<Record>,
}

#[async_trait]
impl ZoneRecordStore for ListOnlyStore {
    async fn list(&self, _zone: &str) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn store_name(&self) -> &'static str {
        "list-only"
    }
}

pub fn a_record(name: &str, value: &str) -> Record {
    Record::new(name, "A", value)
}
