//! Widget record store for the dashboard.
//!
//! The [`WidgetStore`] is the single source of truth for one user's
//! dashboard. Grid layouts are derived from it and folded back into it; they
//! are never stored on their own. Every mutation persists the full widget
//! list through the store's [`BlobStore`] under the user's storage key.
//!
//! Operations referencing a widget id that does not exist are silent no-ops.

use crate::layout::{self, LayoutEntry};
use crate::WidgetKind;
use std::collections::HashSet;
use std::sync::Arc;

pub mod error;
pub mod persist;
pub mod record;

pub use error::StorageError;
pub use persist::{
    storage_key, BackgroundWriter, BlobStore, JsonFileBlobStore, MemoryBlobStore,
    PersistedDashboard,
};
pub use record::{
    default_widgets, ChartType, TableSort, TypeConfig, WidgetPatch, WidgetRecord,
    ADDED_WIDGET_MIN_H, DEFAULT_WIDGET_SIZE,
};

#[cfg(test)]
mod tests;

/// Prefix of generated widget ids.
const WIDGET_ID_PREFIX: &str = "widget";

/// Highest `N` among ids of the form `widget<N>`.
fn highest_generated_seq(widgets: &[WidgetRecord]) -> u64 {
    widgets
        .iter()
        .filter_map(|w| w.id.strip_prefix(WIDGET_ID_PREFIX)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

fn has_duplicate_ids(widgets: &[WidgetRecord]) -> bool {
    let mut seen = HashSet::with_capacity(widgets.len());
    !widgets.iter().all(|w| seen.insert(w.id.as_str()))
}

/// Widget records of one user, persisted on every mutation.
pub struct WidgetStore {
    /// Owner of this dashboard.
    user_id: String,
    /// Records in insertion order.
    widgets: Vec<WidgetRecord>,
    /// Last sequence number used for a generated id.
    next_seq: u64,
    /// Persistence backend.
    blobs: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for WidgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetStore")
            .field("user_id", &self.user_id)
            .field("widgets", &self.widgets)
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl WidgetStore {
    /// Opens the dashboard of `user_id`, loading saved state from `blobs`.
    ///
    /// Falls back to the default widget set when nothing is saved or the
    /// saved blob cannot be read or repeats an id; the failure is logged,
    /// never returned. Loaded sizes are raised to their minimums.
    pub fn open(user_id: impl Into<String>, blobs: Arc<dyn BlobStore>) -> Self {
        let user_id = user_id.into();
        let key = storage_key(&user_id);
        let loaded = match blobs.read(&key) {
            Ok(Some(blob)) => match PersistedDashboard::decode(&blob) {
                Ok(saved) => Some(saved),
                Err(e) => {
                    tracing::warn!("ignoring saved dashboard for {}: {}", user_id, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("failed to read dashboard for {}: {}", user_id, e);
                None
            }
        };

        let loaded = loaded.and_then(|saved| {
            if has_duplicate_ids(&saved.widgets) {
                tracing::warn!("ignoring saved dashboard for {}: duplicate widget ids", user_id);
                return None;
            }
            Some(saved)
        });

        let (widgets, next_seq) = match loaded {
            Some(mut saved) => {
                tracing::debug!(
                    "loaded {} widgets for {}",
                    saved.widgets.len(),
                    user_id
                );
                saved
                    .widgets
                    .iter_mut()
                    .for_each(WidgetRecord::enforce_minimums);
                (saved.widgets, saved.next_seq)
            }
            None => (default_widgets(), 0),
        };
        Self::from_parts(user_id, widgets, next_seq, blobs)
    }

    /// Creates a store holding exactly `widgets`, without reading saved state.
    pub fn with_widgets(
        user_id: impl Into<String>,
        widgets: Vec<WidgetRecord>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self::from_parts(user_id.into(), widgets, 0, blobs)
    }

    /// Creates a store for `user_id` backed by a fresh in-memory blob store.
    pub fn in_memory(user_id: impl Into<String>) -> Self {
        Self::open(user_id, Arc::new(MemoryBlobStore::new()))
    }

    fn from_parts(
        user_id: String,
        widgets: Vec<WidgetRecord>,
        next_seq: u64,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let next_seq = next_seq.max(highest_generated_seq(&widgets));
        Self {
            user_id,
            widgets,
            next_seq,
            blobs,
        }
    }

    /// Owner of this dashboard.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// All records in insertion order.
    pub fn widgets(&self) -> &[WidgetRecord] {
        &self.widgets
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &str) -> Option<&WidgetRecord> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Returns `true` if a record with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids of all records in insertion order.
    pub fn ids(&self) -> Vec<&str> {
        self.widgets.iter().map(|w| w.id.as_str()).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if the store has no records.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Adds a widget and returns its id.
    ///
    /// The new widget is visible, 6x2 with 2x2 minimums, and unplaced: its
    /// row is resolved below every existing widget on the next layout pass.
    /// A blank `title` is rejected and returns `None`.
    pub fn add_widget(&mut self, kind: WidgetKind, title: &str) -> Option<String> {
        if title.trim().is_empty() {
            tracing::debug!("rejected {} widget with blank title", kind);
            return None;
        }
        let id = self.generate_id();
        let mut record =
            WidgetRecord::new(id.clone(), kind, title).with_min(2, ADDED_WIDGET_MIN_H);
        record.unplaced = true;
        self.widgets.push(record);
        tracing::debug!("added {} widget {}", kind, id);
        self.persist();
        Some(id)
    }

    /// Next unused `widget<N>` id. Sequence numbers are never handed out twice.
    fn generate_id(&mut self) -> String {
        loop {
            self.next_seq += 1;
            let id = format!("{WIDGET_ID_PREFIX}{}", self.next_seq);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Removes a widget. Removing a missing id is a no-op.
    pub fn remove_widget(&mut self, id: &str) -> Option<WidgetRecord> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        let removed = self.widgets.remove(index);
        tracing::debug!("removed widget {}", id);
        self.persist();
        Some(removed)
    }

    /// Flips a widget's visibility and returns the new value.
    pub fn toggle_visibility(&mut self, id: &str) -> Option<bool> {
        let record = self.widgets.iter_mut().find(|w| w.id == id)?;
        record.visible = !record.visible;
        let visible = record.visible;
        tracing::debug!("widget {} visible={}", id, visible);
        self.persist();
        Some(visible)
    }

    /// Shallow-merges `patch` into a widget. Returns `false` if it is missing.
    pub fn update_widget_fields(&mut self, id: &str, patch: WidgetPatch) -> bool {
        let Some(record) = self.widgets.iter_mut().find(|w| w.id == id) else {
            return false;
        };
        patch.apply(record);
        self.persist();
        true
    }

    /// Applies several patches as one logical update with a single persist.
    ///
    /// Patches for missing ids are skipped. Returns the number applied.
    pub fn apply_patches(&mut self, patches: Vec<(String, WidgetPatch)>) -> usize {
        let mut applied = 0;
        for (id, patch) in patches {
            if let Some(record) = self.widgets.iter_mut().find(|w| w.id == id) {
                patch.apply(record);
                applied += 1;
            }
        }
        if applied > 0 {
            self.persist();
        }
        applied
    }

    /// Folds a full or partial grid layout back into the records.
    ///
    /// Entries without a matching record are ignored; records without an
    /// entry keep their position.
    pub fn replace_layout(&mut self, entries: &[LayoutEntry]) {
        self.widgets = layout::from_layout(entries, &self.widgets);
        self.persist();
    }

    /// Resolves the row of every unplaced widget to the first free row.
    ///
    /// Returns the number of widgets placed.
    pub fn place_pending(&mut self) -> usize {
        let placed = layout::place_unplaced(&mut self.widgets);
        if placed > 0 {
            tracing::debug!("placed {} pending widgets", placed);
            self.persist();
        }
        placed
    }

    /// Deletes the saved state of this user and reloads the default widgets.
    pub fn reset(&mut self) {
        if let Err(e) = self.blobs.remove(&storage_key(&self.user_id)) {
            tracing::warn!("failed to clear dashboard for {}: {}", self.user_id, e);
        }
        self.widgets = default_widgets();
        self.next_seq = highest_generated_seq(&self.widgets);
        tracing::debug!("reset dashboard for {}", self.user_id);
    }

    /// Writes the full widget list. Failures are logged, never surfaced.
    fn persist(&self) {
        let key = storage_key(&self.user_id);
        let result = PersistedDashboard::new(self.widgets.clone(), self.next_seq)
            .encode()
            .and_then(|blob| self.blobs.write(&key, &blob));
        if let Err(e) = result {
            tracing::warn!("failed to persist dashboard for {}: {}", self.user_id, e);
        }
    }
}
