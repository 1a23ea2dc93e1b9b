//! Row-band overlap resolution shared by manual resize and resize-stop.
//!
//! Both paths resolve conflicts the same way: every other widget whose
//! vertical extent overlaps the resized widget's band moves, as a block,
//! to the row just below it. There is no horizontal check, so widgets in
//! unrelated columns of the same band move too.

use super::LayoutEntry;
use crate::store::WidgetRecord;

/// Returns `true` if `[other_y, other_y + other_h)` overlaps the target band.
///
/// Same row, target starting inside the other widget, or the other widget
/// starting inside the target.
pub fn overlaps_vertically(other_y: u32, other_h: u32, target_y: u32, target_h: u32) -> bool {
    other_y == target_y
        || (other_y < target_y && target_y < other_y.saturating_add(other_h))
        || (target_y < other_y && other_y < target_y.saturating_add(target_h))
}

/// Ids of the visible records, other than `target`, in `target`'s row band.
pub fn siblings_in_band(records: &[WidgetRecord], target: &WidgetRecord) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.visible && r.id != target.id)
        .filter(|r| overlaps_vertically(r.y, r.h, target.y, target.h))
        .map(|r| r.id.clone())
        .collect()
}

/// Pushes every entry overlapping `id`'s band to the row below it.
///
/// Returns the layout unchanged if `id` is not in it.
pub fn push_overlapping_below(layout: &[LayoutEntry], id: &str) -> Vec<LayoutEntry> {
    let Some(item) = layout.iter().find(|e| e.id == id) else {
        return layout.to_vec();
    };
    let (band_y, band_h, below) = (item.y, item.h, item.bottom());
    layout
        .iter()
        .map(|entry| {
            let mut entry = entry.clone();
            if entry.id != id && overlaps_vertically(entry.y, entry.h, band_y, band_h) {
                entry.y = below;
            }
            entry
        })
        .collect()
}
