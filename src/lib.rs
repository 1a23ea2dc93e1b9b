//! Widget Dashboard library
//!
//! This crate provides the core of a grid-based widget dashboard: the widget
//! record store, the layout projector, the manual resize/expand coordinator
//! and the grid interaction adapter, plus the terminal front end that hosts
//! them.
//!
//! # Data flow
//!
//! A user action (drag handle, resize corner, widget chrome key) reaches
//! either the [`grid::GridAdapter`] or the [`resize::ResizeCoordinator`].
//! Both fold their result back into the [`store::WidgetStore`] in a single
//! write. Rendering then projects the store into a fresh grid layout with
//! [`layout::to_layout`].

use std::fmt;
use std::str::FromStr;

/// Configuration loading, schema and XDG path resolution.
pub mod config;

/// Simulated asynchronous data source feeding widget views.
pub mod data;

/// Grid interaction adapter: drag/resize state machine over the grid engine.
pub mod grid;

/// Layout projection, overlap resolution and the grid engine.
pub mod layout;

/// Logging initialization.
pub mod logging;

/// Notification center for transient user-facing messages.
pub mod notify;

/// Manual resize/expand/fullscreen coordination.
pub mod resize;

/// Widget record store and its persistence.
pub mod store;

/// Terminal user interface.
pub mod tui;

/// User context and per-user dashboard sessions.
pub mod user;

/// Column count of the authoritative (`lg`) grid layout.
pub const GRID_COLUMNS: u32 = 12;

/// Kind of a dashboard widget.
///
/// The kind is fixed when a widget is created and decides which view renders
/// it and which dataset feeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Tabular data view.
    Table,
    /// Bar, line or pie chart.
    Chart,
    /// Key metric tiles.
    Stats,
}

impl WidgetKind {
    /// All widget kinds, in the order offered by the add-widget form.
    pub const ALL: [WidgetKind; 3] = [WidgetKind::Table, WidgetKind::Chart, WidgetKind::Stats];

    /// Human-readable label used in forms and lists.
    pub fn label(self) -> &'static str {
        match self {
            WidgetKind::Table => "Data Table",
            WidgetKind::Chart => "Chart",
            WidgetKind::Stats => "Stats",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WidgetKind::Table => "table",
            WidgetKind::Chart => "chart",
            WidgetKind::Stats => "stats",
        };
        write!(f, "{}", s)
    }
}

/// Error type for parsing WidgetKind from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWidgetKindError(pub String);

impl fmt::Display for ParseWidgetKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid widget kind: {}", self.0)
    }
}

impl std::error::Error for ParseWidgetKindError {}

impl FromStr for WidgetKind {
    type Err = ParseWidgetKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(WidgetKind::Table),
            "chart" => Ok(WidgetKind::Chart),
            "stats" => Ok(WidgetKind::Stats),
            _ => Err(ParseWidgetKindError(s.to_string())),
        }
    }
}

/// Width and height of a widget in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in grid columns.
    pub w: u32,
    /// Height in grid rows.
    pub h: u32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Manual sizing state of a widget.
///
/// Tracks whether a widget's chrome has expanded it and, if so, the size it
/// had before the first expand. Every variant except `Normal` carries the
/// original size, so a widget can never be marked as expanded without a size
/// to restore to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SizeState {
    /// Never touched by a manual expand.
    #[default]
    Normal,
    /// Expanded through the widget chrome.
    Expanded {
        /// Size captured before the first manual expand.
        original: Size,
    },
    /// Resized to the fullscreen footprint.
    Fullscreen {
        /// Size captured before the first manual expand.
        original: Size,
    },
    /// Restored after an expand; the original stays anchored.
    Restored {
        /// Size captured before the first manual expand.
        original: Size,
    },
}

impl SizeState {
    /// Returns the size captured before the first manual expand, if any.
    pub fn original_size(self) -> Option<Size> {
        match self {
            SizeState::Normal => None,
            SizeState::Expanded { original }
            | SizeState::Fullscreen { original }
            | SizeState::Restored { original } => Some(original),
        }
    }

    /// Returns `true` once a manual expand or fullscreen has touched the widget.
    pub fn was_expanded(self) -> bool {
        !matches!(self, SizeState::Normal)
    }

    /// Returns `true` while the widget is shown in its expanded footprint.
    ///
    /// This is the "expanded" visual flag; restoring clears it.
    pub fn is_expanded(self) -> bool {
        matches!(
            self,
            SizeState::Expanded { .. } | SizeState::Fullscreen { .. }
        )
    }
}
