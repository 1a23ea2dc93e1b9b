//! Tests for the WidgetStore module.
//!
//! Tests are organized into categories:
//! - `basic`: add, remove, toggle and field updates
//! - `layout`: layout replacement and pending placement
//! - `persistence`: saved state, fallbacks and user scoping

mod basic;
mod layout;

use super::{MemoryBlobStore, WidgetRecord, WidgetStore};
use crate::WidgetKind;
use std::sync::Arc;

/// Store for `tester` holding exactly `records`.
pub(super) fn store_with(records: Vec<WidgetRecord>) -> WidgetStore {
    WidgetStore::with_widgets("tester", records, Arc::new(MemoryBlobStore::new()))
}

/// Placed table record.
pub(super) fn table(id: &str, x: u32, y: u32, w: u32, h: u32) -> WidgetRecord {
    WidgetRecord::new(id, WidgetKind::Table, id).at(x, y, w, h)
}

/// Sorted ids of the store.
pub(super) fn id_set(store: &WidgetStore) -> Vec<String> {
    let mut ids: Vec<String> = store.ids().into_iter().map(String::from).collect();
    ids.sort();
    ids
}
