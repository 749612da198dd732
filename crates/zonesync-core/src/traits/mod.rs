//! Core traits for zonesync
//!
//! - [`ZoneRecordStore`]: list, append and delete records in a remote zone
//! - [`StoreFactory`]: build a store from configuration

pub mod zone_store;

pub use zone_store::{StoreFactory, ZoneRecordStore};
