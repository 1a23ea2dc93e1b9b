//! Grid engine: compaction, collision push, bounding and breakpoints.
//!
//! The engine works on layout entries only and never touches the store. It
//! mirrors the behavior of a responsive grid library configured with
//! vertical compaction and `prevent_collision = false`:
//!
//! - moving an item lets it overlap, then pushes whatever it hits out of the
//!   way (up into free space if possible, otherwise down);
//! - compaction closes vertical gaps, top to bottom;
//! - narrower breakpoints are produced by squeezing the `lg` layout into
//!   fewer columns.

use super::LayoutEntry;
use crate::GRID_COLUMNS;

/// Responsive breakpoint of the grid surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// Widest; the only authoritative layout.
    Lg,
    /// Medium.
    Md,
    /// Small.
    Sm,
    /// Extra small.
    Xs,
    /// Narrowest.
    Xxs,
}

impl Breakpoint {
    /// Grid columns available at this breakpoint.
    pub fn columns(self) -> u32 {
        match self {
            Breakpoint::Lg => GRID_COLUMNS,
            Breakpoint::Md => 10,
            Breakpoint::Sm => 6,
            Breakpoint::Xs => 4,
            Breakpoint::Xxs => 2,
        }
    }

    /// Short name (`lg`, `md`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
            Breakpoint::Xs => "xs",
            Breakpoint::Xxs => "xxs",
        }
    }

    /// Returns `true` for the breakpoint whose layout is persisted.
    pub fn is_authoritative(self) -> bool {
        self == Breakpoint::Lg
    }
}

/// Minimum surface widths, in terminal columns, of each breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    /// Minimum width for `lg`.
    pub lg: u16,
    /// Minimum width for `md`.
    pub md: u16,
    /// Minimum width for `sm`.
    pub sm: u16,
    /// Minimum width for `xs`. Anything narrower is `xxs`.
    pub xs: u16,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            lg: 120,
            md: 100,
            sm: 77,
            xs: 48,
        }
    }
}

impl Breakpoints {
    /// Breakpoint for a surface `width` columns wide.
    pub fn for_width(&self, width: u16) -> Breakpoint {
        if width >= self.lg {
            Breakpoint::Lg
        } else if width >= self.md {
            Breakpoint::Md
        } else if width >= self.sm {
            Breakpoint::Sm
        } else if width >= self.xs {
            Breakpoint::Xs
        } else {
            Breakpoint::Xxs
        }
    }
}

/// Layout operations for a grid with a fixed column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEngine {
    cols: u32,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new(GRID_COLUMNS)
    }
}

impl GridEngine {
    /// Creates an engine for `cols` columns (at least one).
    pub fn new(cols: u32) -> Self {
        Self { cols: cols.max(1) }
    }

    /// Engine for the column count of `breakpoint`.
    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        Self::new(breakpoint.columns())
    }

    /// Column count.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Keeps every entry inside the grid horizontally.
    pub fn bound(&self, layout: &mut [LayoutEntry]) {
        for entry in layout.iter_mut() {
            entry.w = entry.w.min(self.cols).max(entry.min_w.min(self.cols));
            entry.x = entry.x.min(self.cols - entry.w);
        }
    }

    /// Closes vertical gaps, keeping the input order of entries.
    ///
    /// Entries are settled top to bottom (then left to right); each moves up
    /// until it would hit an already settled entry, then down past anything
    /// it still overlaps. Locked entries never move.
    pub fn compact(&self, layout: &[LayoutEntry]) -> Vec<LayoutEntry> {
        let mut settled: Vec<LayoutEntry> = layout.iter().filter(|e| e.locked).cloned().collect();
        let mut order: Vec<usize> = (0..layout.len()).collect();
        order.sort_by_key(|&i| (layout[i].y, layout[i].x));

        let mut out = layout.to_vec();
        for i in order {
            if layout[i].locked {
                continue;
            }
            let item = compact_item(&settled, layout[i].clone());
            settled.push(item.clone());
            out[i] = item;
        }
        out
    }

    /// Moves `id` to `(x, y)` and pushes colliding entries out of the way.
    ///
    /// The result is bounded and compacted. Unknown or locked ids leave the
    /// layout unchanged.
    pub fn move_item(&self, layout: &[LayoutEntry], id: &str, x: u32, y: u32) -> Vec<LayoutEntry> {
        let mut out = layout.to_vec();
        let Some(idx) = out.iter().position(|e| e.id == id) else {
            return out;
        };
        if out[idx].locked {
            return out;
        }
        self.bound(&mut out);
        out[idx].x = x.min(self.cols - out[idx].w);
        out[idx].y = y;
        push_colliders(&mut out, idx, true);
        self.compact(&out)
    }

    /// Sets the size of `id`, leaving every other entry where it is.
    ///
    /// The size is clamped to the entry's minimums and the grid's right edge.
    pub fn resize_item(&self, layout: &[LayoutEntry], id: &str, w: u32, h: u32) -> Vec<LayoutEntry> {
        let mut out = layout.to_vec();
        if let Some(entry) = out.iter_mut().find(|e| e.id == id) {
            let max_w = self.cols.saturating_sub(entry.x).max(1);
            entry.w = w.min(max_w).max(entry.min_w.min(max_w));
            entry.h = h.max(entry.min_h);
        }
        out
    }

    /// Fits a layout into this engine's columns: bound, then compact.
    pub fn squeeze(&self, layout: &[LayoutEntry]) -> Vec<LayoutEntry> {
        let mut out = layout.to_vec();
        self.bound(&mut out);
        self.compact(&out)
    }
}

/// Settles one entry against the already settled ones.
fn compact_item(settled: &[LayoutEntry], mut item: LayoutEntry) -> LayoutEntry {
    // Nothing settled reaches past the lowest bottom, so jump straight there.
    let floor = settled.iter().map(LayoutEntry::bottom).max().unwrap_or(0);
    item.y = item.y.min(floor);
    while item.y > 0 && !settled.iter().any(|s| s.collides(&item)) {
        item.y -= 1;
    }
    while let Some(bottom) = settled
        .iter()
        .find(|s| s.collides(&item))
        .map(LayoutEntry::bottom)
    {
        item.y = bottom;
    }
    item
}

/// Resolves collisions caused by the entry at `idx`.
///
/// For the entry the user moved, a collider first tries the free space just
/// above it; otherwise colliders are pushed below and cascade.
fn push_colliders(layout: &mut [LayoutEntry], idx: usize, user_action: bool) {
    let mover = layout[idx].clone();
    let mut hits: Vec<usize> = (0..layout.len())
        .filter(|&j| j != idx && !layout[j].locked && layout[j].collides(&mover))
        .collect();
    hits.sort_by_key(|&j| layout[j].y);

    for j in hits {
        if !layout[j].collides(&mover) {
            continue;
        }
        if user_action {
            if let Some(above) = mover.y.checked_sub(layout[j].h) {
                let mut candidate = layout[j].clone();
                candidate.y = above;
                if !layout.iter().any(|e| e.collides(&candidate)) {
                    layout[j].y = above;
                    continue;
                }
            }
        }
        layout[j].y = mover.bottom();
        push_colliders(layout, j, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, x: u32, y: u32, w: u32, h: u32) -> LayoutEntry {
        LayoutEntry::new(id, x, y, w, h)
    }

    fn ys(layout: &[LayoutEntry]) -> Vec<u32> {
        layout.iter().map(|e| e.y).collect()
    }

    #[test]
    fn breakpoints_pick_by_width() {
        let bps = Breakpoints::default();
        assert_eq!(bps.for_width(200), Breakpoint::Lg);
        assert_eq!(bps.for_width(120), Breakpoint::Lg);
        assert_eq!(bps.for_width(110), Breakpoint::Md);
        assert_eq!(bps.for_width(80), Breakpoint::Sm);
        assert_eq!(bps.for_width(50), Breakpoint::Xs);
        assert_eq!(bps.for_width(10), Breakpoint::Xxs);
    }

    #[test]
    fn only_lg_is_authoritative() {
        assert!(Breakpoint::Lg.is_authoritative());
        assert!(!Breakpoint::Sm.is_authoritative());
        assert_eq!(Breakpoint::Lg.columns(), GRID_COLUMNS);
    }

    #[test]
    fn compact_closes_vertical_gaps() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 3, 6, 2), entry("b", 6, 5, 6, 2), entry("c", 0, 9, 6, 1)];
        let compacted = engine.compact(&layout);
        assert_eq!(ys(&compacted), vec![0, 0, 2]);
    }

    #[test]
    fn compact_handles_rows_near_the_integer_limit() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 2), entry("far", 0, u32::MAX, 6, 2)];
        let compacted = engine.squeeze(&layout);
        assert_eq!(ys(&compacted), vec![0, 2]);
        assert_eq!(compacted[1].bottom(), 4);
    }

    #[test]
    fn compact_keeps_input_order() {
        let engine = GridEngine::default();
        let layout = vec![entry("low", 0, 8, 6, 2), entry("high", 0, 0, 6, 2)];
        let compacted = engine.compact(&layout);
        assert_eq!(compacted[0].id, "low");
        assert_eq!(ys(&compacted), vec![2, 0]);
    }

    #[test]
    fn compact_resolves_overlaps_downward() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 3), entry("b", 0, 1, 6, 2)];
        assert_eq!(ys(&engine.compact(&layout)), vec![0, 3]);
    }

    #[test]
    fn compact_never_moves_locked_entries() {
        let engine = GridEngine::default();
        let mut pinned = entry("pinned", 0, 4, 6, 2);
        pinned.locked = true;
        let layout = vec![pinned, entry("free", 0, 2, 6, 3)];
        let compacted = engine.compact(&layout);
        assert_eq!(compacted[0].y, 4);
        assert_eq!(compacted[1].y, 0);
    }

    #[test]
    fn move_item_swaps_with_widget_below_when_dragged_past_it() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 2), entry("b", 0, 2, 6, 2)];
        let moved = engine.move_item(&layout, "a", 0, 3);
        assert_eq!(ys(&moved), vec![2, 0]);
    }

    #[test]
    fn move_item_small_nudge_snaps_back() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 2), entry("b", 0, 2, 6, 2)];
        let moved = engine.move_item(&layout, "a", 0, 1);
        assert_eq!(ys(&moved), vec![0, 2]);
    }

    #[test]
    fn move_item_clamps_to_right_edge() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 2)];
        let moved = engine.move_item(&layout, "a", 11, 0);
        assert_eq!(moved[0].x, 6);
    }

    #[test]
    fn move_item_into_occupied_cell_pushes_down() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 2), entry("b", 6, 0, 6, 2)];
        let moved = engine.move_item(&layout, "b", 0, 0);
        assert_eq!((moved[1].x, moved[1].y), (0, 0));
        assert_eq!(moved[0].y, 2);
    }

    #[test]
    fn resize_item_touches_only_the_item() {
        let engine = GridEngine::default();
        let layout = vec![entry("a", 0, 0, 6, 2), entry("b", 6, 0, 6, 2)];
        let resized = engine.resize_item(&layout, "a", 9, 4);
        assert_eq!((resized[0].w, resized[0].h), (9, 4));
        assert_eq!(resized[1], layout[1]);
    }

    #[test]
    fn resize_item_clamps_to_minimums_and_edge() {
        let engine = GridEngine::default();
        let mut a = entry("a", 8, 0, 2, 2);
        a.min_w = 2;
        a.min_h = 2;
        let resized = engine.resize_item(&[a], "a", 20, 0);
        assert_eq!((resized[0].w, resized[0].h), (4, 2));
    }

    #[test]
    fn squeeze_fits_layout_into_fewer_columns() {
        let engine = GridEngine::for_breakpoint(Breakpoint::Sm);
        let layout = vec![entry("a", 0, 0, 6, 2), entry("b", 6, 0, 6, 2), entry("c", 8, 2, 4, 2)];
        let squeezed = engine.squeeze(&layout);
        for e in &squeezed {
            assert!(e.x + e.w <= 6, "{} exceeds grid: {:?}", e.id, e);
        }
        for (i, a) in squeezed.iter().enumerate() {
            for b in &squeezed[i + 1..] {
                assert!(!a.collides(b), "{} overlaps {}", a.id, b.id);
            }
        }
    }
}
