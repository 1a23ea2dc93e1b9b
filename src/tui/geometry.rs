//! Mapping between grid cells and terminal cells.
//!
//! The grid area is split into `cols` columns of (nearly) equal width and
//! rows of `row_height` lines. Rows scroll vertically by `scroll` lines.
//! A widget's top border line is its drag bar and its bottom-right corner
//! cell is its resize handle.

use crate::grid::Handle;
use crate::layout::LayoutEntry;
use ratatui::layout::Rect;

/// Placement of the grid on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Screen area the grid is drawn in.
    pub area: Rect,
    /// Column count of the current breakpoint.
    pub cols: u32,
    /// Terminal lines per grid row.
    pub row_height: u16,
    /// Lines scrolled off the top.
    pub scroll: u16,
}

/// Cell span of an entry in grid-relative terminal coordinates, unclipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl GridGeometry {
    /// Creates a geometry for `area`.
    pub fn new(area: Rect, cols: u32, row_height: u16, scroll: u16) -> Self {
        Self {
            area,
            cols: cols.max(1),
            row_height: row_height.max(1),
            scroll,
        }
    }

    /// Left edge of grid column `x`, relative to the area.
    fn col_left(&self, x: u32) -> u32 {
        let x = u64::from(x.min(self.cols));
        let width = u64::from(self.area.width);
        let cols = u64::from(self.cols);
        ((x * width + cols - 1) / cols) as u32
    }

    fn span(&self, entry: &LayoutEntry) -> Span {
        let row_height = u32::from(self.row_height);
        Span {
            left: self.col_left(entry.x),
            top: entry.y.saturating_mul(row_height),
            right: self.col_left(entry.right()),
            bottom: entry.bottom().saturating_mul(row_height),
        }
    }

    /// Screen rectangle of `entry`, clipped to the area.
    ///
    /// `None` when nothing of it is visible.
    pub fn cell_rect(&self, entry: &LayoutEntry) -> Option<Rect> {
        let span = self.span(entry);
        let scroll = u32::from(self.scroll);
        let view_bottom = scroll + u32::from(self.area.height);
        let top = span.top.max(scroll);
        let bottom = span.bottom.min(view_bottom);
        if span.right <= span.left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: self.area.x + span.left as u16,
            y: self.area.y + (top - scroll) as u16,
            width: (span.right - span.left) as u16,
            height: (bottom - top) as u16,
        })
    }

    /// Grid cell under a terminal position. Positions outside the area are
    /// clamped to its edge, so drags that leave the grid keep tracking.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(u32, u32)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let rel_col = column
            .saturating_sub(self.area.x)
            .min(self.area.width - 1);
        let rel_row = row
            .saturating_sub(self.area.y)
            .min(self.area.height - 1);
        let x = u32::from(rel_col) * self.cols / u32::from(self.area.width);
        let y = (u32::from(rel_row) + u32::from(self.scroll)) / u32::from(self.row_height);
        Some((x, y))
    }

    /// Returns `true` if the terminal position lies inside the grid area.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Widget and handle under a terminal position.
    pub fn hit_test(
        &self,
        layout: &[LayoutEntry],
        column: u16,
        row: u16,
    ) -> Option<(String, Handle)> {
        if !self.contains(column, row) {
            return None;
        }
        let col = u32::from(column - self.area.x);
        let line = u32::from(row - self.area.y) + u32::from(self.scroll);
        layout.iter().rev().find_map(|entry| {
            let span = self.span(entry);
            if col < span.left || col >= span.right || line < span.top || line >= span.bottom {
                return None;
            }
            let handle = if line == span.top {
                Handle::DragBar
            } else if col == span.right - 1 && line == span.bottom - 1 {
                Handle::ResizeCorner
            } else {
                Handle::Body
            };
            Some((entry.id.clone(), handle))
        })
    }

    /// Lines needed to show every entry.
    pub fn content_height(&self, layout: &[LayoutEntry]) -> u32 {
        layout
            .iter()
            .map(|e| e.bottom().saturating_mul(u32::from(self.row_height)))
            .max()
            .unwrap_or(0)
    }

    /// Largest useful scroll offset for `layout`.
    pub fn max_scroll(&self, layout: &[LayoutEntry]) -> u16 {
        let excess = self
            .content_height(layout)
            .saturating_sub(u32::from(self.area.height));
        excess.min(u32::from(u16::MAX)) as u16
    }
}
