//! Widget record types and partial updates.

use crate::{Size, SizeState, WidgetKind, GRID_COLUMNS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default size for newly added widgets.
pub const DEFAULT_WIDGET_SIZE: Size = Size::new(6, 2);

/// Minimum width of a record when none is stored.
pub const DEFAULT_MIN_W: u32 = 2;

/// Minimum height of a record when none is stored.
pub const DEFAULT_MIN_H: u32 = 1;

/// Minimum height applied by the add-widget action.
pub const ADDED_WIDGET_MIN_H: u32 = 2;

fn default_true() -> bool {
    true
}

fn default_min_w() -> u32 {
    DEFAULT_MIN_W
}

fn default_min_h() -> u32 {
    DEFAULT_MIN_H
}

/// Visual encoding used by a chart widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Vertical bars (monthly revenue).
    #[default]
    Bar,
    /// Line over time (sales trends).
    Line,
    /// Share of a whole (customer distribution).
    Pie,
}

impl ChartType {
    /// Returns the next chart type in the selector cycle.
    pub fn next(self) -> Self {
        match self {
            ChartType::Bar => ChartType::Line,
            ChartType::Line => ChartType::Pie,
            ChartType::Pie => ChartType::Bar,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            _ => Err(format!("invalid chart type: {s}")),
        }
    }
}

/// Sort order applied to a table widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSort {
    /// Zero-based column index.
    pub column: usize,
    /// Sort descending instead of ascending.
    #[serde(default)]
    pub descending: bool,
}

/// Per-kind settings of a widget.
///
/// Opaque to the layout subsystem; only the views read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Chart variant, for chart widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    /// Active sort, for table widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<TableSort>,
}

impl TypeConfig {
    /// Default settings for a freshly created widget of `kind`.
    pub fn for_kind(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Chart => Self {
                chart_type: Some(ChartType::Bar),
                sort: None,
            },
            WidgetKind::Table | WidgetKind::Stats => Self::default(),
        }
    }
}

/// One dashboard widget: identity, placement, size and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRecord {
    /// Stable unique identity.
    pub id: String,
    /// Widget kind, immutable after creation.
    pub kind: WidgetKind,
    /// Display title.
    pub title: String,
    /// Whether the widget is shown on the grid.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Grid column of the top-left cell.
    pub x: u32,
    /// Grid row of the top-left cell. Meaningless while `unplaced` is set.
    pub y: u32,
    /// Width in grid columns.
    pub w: u32,
    /// Height in grid rows.
    pub h: u32,
    /// Lower bound for `w`.
    #[serde(default = "default_min_w")]
    pub min_w: u32,
    /// Lower bound for `h`.
    #[serde(default = "default_min_h")]
    pub min_h: u32,
    /// Set until the first layout pass picks a row below existing widgets.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unplaced: bool,
    /// Manual expand state.
    #[serde(default)]
    pub size_state: SizeState,
    /// Per-kind settings.
    #[serde(default)]
    pub type_config: TypeConfig,
}

impl WidgetRecord {
    /// Creates a visible record at the origin with the default size and minimums.
    pub fn new(id: impl Into<String>, kind: WidgetKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            visible: true,
            x: 0,
            y: 0,
            w: DEFAULT_WIDGET_SIZE.w,
            h: DEFAULT_WIDGET_SIZE.h,
            min_w: DEFAULT_MIN_W,
            min_h: DEFAULT_MIN_H,
            unplaced: false,
            size_state: SizeState::Normal,
            type_config: TypeConfig::for_kind(kind),
        }
    }

    /// Places the record at the given cell with the given size.
    pub fn at(mut self, x: u32, y: u32, w: u32, h: u32) -> Self {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self.unplaced = false;
        self
    }

    /// Sets the minimum size.
    pub fn with_min(mut self, min_w: u32, min_h: u32) -> Self {
        self.min_w = min_w;
        self.min_h = min_h;
        self
    }

    /// Sets the chart variant.
    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.type_config.chart_type = Some(chart_type);
        self
    }

    /// Current size.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Row just below the widget.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Chart variant, falling back to bar when unset.
    pub fn chart_type(&self) -> ChartType {
        self.type_config.chart_type.unwrap_or_default()
    }

    /// Clamps a requested size to the record's minimums and the grid width.
    pub fn clamp_size(&self, requested: Size) -> Size {
        let max_w = GRID_COLUMNS.max(self.min_w);
        Size::new(
            requested.w.clamp(self.min_w, max_w),
            requested.h.max(self.min_h),
        )
    }

    /// Raises `w` and `h` to the minimums if a write left them below.
    pub(crate) fn enforce_minimums(&mut self) {
        self.w = self.w.max(self.min_w);
        self.h = self.h.max(self.min_h);
    }
}

/// Partial update merged into a [`WidgetRecord`].
///
/// Every `Some` field overwrites the record's value; `None` fields are left
/// untouched. `id` and `kind` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetPatch {
    /// New title.
    pub title: Option<String>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New column.
    pub x: Option<u32>,
    /// New row. Setting it also marks the record as placed.
    pub y: Option<u32>,
    /// New width.
    pub w: Option<u32>,
    /// New height.
    pub h: Option<u32>,
    /// New minimum width.
    pub min_w: Option<u32>,
    /// New minimum height.
    pub min_h: Option<u32>,
    /// New manual expand state.
    pub size_state: Option<SizeState>,
    /// Replacement per-kind settings.
    pub type_config: Option<TypeConfig>,
}

impl WidgetPatch {
    /// Patch that moves the widget to `(x, y)`.
    pub fn position(x: u32, y: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that only changes the row.
    pub fn row(y: u32) -> Self {
        Self {
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes the widget.
    pub fn size(size: Size) -> Self {
        Self {
            w: Some(size.w),
            h: Some(size.h),
            ..Self::default()
        }
    }

    /// Patch that renames the widget.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that replaces the per-kind settings.
    pub fn type_config(config: TypeConfig) -> Self {
        Self {
            type_config: Some(config),
            ..Self::default()
        }
    }

    /// Adds a manual expand state to the patch.
    pub fn with_size_state(mut self, state: SizeState) -> Self {
        self.size_state = Some(state);
        self
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merges the patch into `record`.
    pub(crate) fn apply(self, record: &mut WidgetRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(visible) = self.visible {
            record.visible = visible;
        }
        if let Some(x) = self.x {
            record.x = x;
        }
        if let Some(y) = self.y {
            record.y = y;
            record.unplaced = false;
        }
        if let Some(w) = self.w {
            record.w = w;
        }
        if let Some(h) = self.h {
            record.h = h;
        }
        if let Some(min_w) = self.min_w {
            record.min_w = min_w;
        }
        if let Some(min_h) = self.min_h {
            record.min_h = min_h;
        }
        if let Some(state) = self.size_state {
            record.size_state = state;
        }
        if let Some(config) = self.type_config {
            record.type_config = config;
        }
        record.enforce_minimums();
    }
}

/// Widgets a store starts with when no saved state exists for the user.
pub fn default_widgets() -> Vec<WidgetRecord> {
    vec![
        WidgetRecord::new("widget1", WidgetKind::Table, "Recent Customers")
            .at(0, 0, 6, 2)
            .with_min(2, 2),
        WidgetRecord::new("widget2", WidgetKind::Chart, "Monthly Revenue")
            .at(6, 0, 6, 2)
            .with_min(2, 2)
            .with_chart_type(ChartType::Bar),
        WidgetRecord::new("widget3", WidgetKind::Chart, "Sales Trends")
            .at(0, 2, 4, 2)
            .with_min(2, 2)
            .with_chart_type(ChartType::Line),
        WidgetRecord::new("widget4", WidgetKind::Chart, "Customer Distribution")
            .at(4, 2, 4, 2)
            .with_min(2, 2)
            .with_chart_type(ChartType::Pie),
        WidgetRecord::new("widget5", WidgetKind::Stats, "Key Metrics")
            .at(8, 2, 4, 2)
            .with_min(2, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_uses_record_defaults() {
        let record = WidgetRecord::new("w", WidgetKind::Table, "T");
        assert!(record.visible);
        assert_eq!(record.size(), DEFAULT_WIDGET_SIZE);
        assert_eq!((record.min_w, record.min_h), (2, 1));
        assert_eq!(record.size_state, SizeState::Normal);
    }

    #[test]
    fn chart_records_default_to_bar() {
        let record = WidgetRecord::new("w", WidgetKind::Chart, "C");
        assert_eq!(record.type_config.chart_type, Some(ChartType::Bar));
        assert_eq!(record.chart_type(), ChartType::Bar);
    }

    #[test]
    fn clamp_size_respects_minimums_and_grid_width() {
        let record = WidgetRecord::new("w", WidgetKind::Stats, "S").with_min(2, 2);
        assert_eq!(record.clamp_size(Size::new(1, 1)), Size::new(2, 2));
        assert_eq!(record.clamp_size(Size::new(40, 9)), Size::new(12, 9));
    }

    #[test]
    fn patch_sets_only_given_fields() {
        let mut record = WidgetRecord::new("w", WidgetKind::Table, "Old").at(1, 2, 6, 2);
        WidgetPatch::title("New").apply(&mut record);
        assert_eq!(record.title, "New");
        assert_eq!((record.x, record.y, record.w, record.h), (1, 2, 6, 2));
    }

    #[test]
    fn patch_with_row_marks_record_placed() {
        let mut record = WidgetRecord::new("w", WidgetKind::Table, "T");
        record.unplaced = true;
        WidgetPatch::row(7).apply(&mut record);
        assert!(!record.unplaced);
        assert_eq!(record.y, 7);
    }

    #[test]
    fn patch_cannot_shrink_below_minimums() {
        let mut record = WidgetRecord::new("w", WidgetKind::Table, "T").with_min(3, 2);
        WidgetPatch::size(Size::new(1, 1)).apply(&mut record);
        assert_eq!(record.size(), Size::new(3, 2));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(WidgetPatch::default().is_empty());
        assert!(!WidgetPatch::row(0).is_empty());
    }

    #[test]
    fn default_widgets_have_unique_ids() {
        let widgets = default_widgets();
        let mut ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn record_deserializes_with_missing_optional_fields() {
        let json = r#"{"id":"a","kind":"stats","title":"S","x":0,"y":0,"w":4,"h":2}"#;
        let record: WidgetRecord = serde_json::from_str(json).expect("should parse");
        assert!(record.visible);
        assert_eq!((record.min_w, record.min_h), (2, 1));
        assert!(!record.unplaced);
        assert_eq!(record.size_state, SizeState::Normal);
    }
}
