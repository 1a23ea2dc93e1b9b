//! Projection between widget records and grid layout entries.

use crate::store::WidgetRecord;
use serde::{Deserialize, Serialize};

/// Grid-coordinate projection of one visible widget.
///
/// Regenerated from the store on every render and never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Widget id.
    #[serde(rename = "i")]
    pub id: String,
    /// Column of the top-left cell.
    pub x: u32,
    /// Row of the top-left cell.
    pub y: u32,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
    /// Minimum width.
    #[serde(rename = "minW")]
    pub min_w: u32,
    /// Minimum height.
    #[serde(rename = "minH")]
    pub min_h: u32,
    /// Pinned in place by an ongoing interaction; compaction skips it.
    #[serde(rename = "static", default)]
    pub locked: bool,
}

impl LayoutEntry {
    /// Creates an unlocked entry.
    pub fn new(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            min_w: 1,
            min_h: 1,
            locked: false,
        }
    }

    fn from_record(record: &WidgetRecord, y: u32) -> Self {
        Self {
            id: record.id.clone(),
            x: record.x,
            y,
            w: record.w,
            h: record.h,
            min_w: record.min_w,
            min_h: record.min_h,
            locked: false,
        }
    }

    /// Row just below the entry.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Column just right of the entry.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Returns `true` if the rectangles of two different entries intersect.
    pub fn collides(&self, other: &LayoutEntry) -> bool {
        self.id != other.id
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns `true` if position and size equal the record's.
    pub fn matches(&self, record: &WidgetRecord) -> bool {
        self.id == record.id
            && !record.unplaced
            && (self.x, self.y, self.w, self.h) == (record.x, record.y, record.w, record.h)
    }
}

/// First row below every placed, visible record.
pub fn first_free_row(records: &[WidgetRecord]) -> u32 {
    records
        .iter()
        .filter(|r| r.visible && !r.unplaced)
        .map(WidgetRecord::bottom)
        .max()
        .unwrap_or(0)
}

/// Rows for unplaced records, stacked in insertion order below the placed ones.
fn pending_rows(records: &[WidgetRecord]) -> Vec<Option<u32>> {
    let mut next = first_free_row(records);
    records
        .iter()
        .map(|r| {
            r.unplaced.then(|| {
                let row = next;
                next = next.saturating_add(r.h);
                row
            })
        })
        .collect()
}

/// Projects the visible records onto layout entries, in insertion order.
///
/// Unplaced records are shown at the row [`place_unplaced`] would give them,
/// so the projection is stable across the placement pass.
pub fn to_layout(records: &[WidgetRecord]) -> Vec<LayoutEntry> {
    records
        .iter()
        .zip(pending_rows(records))
        .filter(|(record, _)| record.visible)
        .map(|(record, pending)| LayoutEntry::from_record(record, pending.unwrap_or(record.y)))
        .collect()
}

/// Copies `x, y, w, h` of each entry onto the record with the same id.
///
/// Records without an entry are returned unchanged; entries without a record
/// are ignored.
pub fn from_layout(entries: &[LayoutEntry], records: &[WidgetRecord]) -> Vec<WidgetRecord> {
    records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if let Some(entry) = entries.iter().find(|e| e.id == record.id) {
                record.x = entry.x;
                record.y = entry.y;
                record.w = entry.w;
                record.h = entry.h;
                record.unplaced = false;
            }
            record
        })
        .collect()
}

/// Gives every unplaced record its first-free-row position.
///
/// Returns the number of records placed.
pub fn place_unplaced(records: &mut [WidgetRecord]) -> usize {
    let rows = pending_rows(records);
    let mut placed = 0;
    for (record, row) in records.iter_mut().zip(rows) {
        if let Some(row) = row {
            record.y = row;
            record.unplaced = false;
            placed += 1;
        }
    }
    placed
}
