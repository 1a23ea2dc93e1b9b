//! Grid layout for the dashboard.
//!
//! Widget records are projected onto ephemeral [`LayoutEntry`] values that
//! the grid engine and the interaction adapter work on. Layout changes are
//! folded back into records with [`from_layout`]; nothing here owns state.

mod engine;
mod overlap;
mod projector;

pub use engine::{Breakpoint, Breakpoints, GridEngine};
pub use overlap::{overlaps_vertically, push_overlapping_below, siblings_in_band};
pub use projector::{first_free_row, from_layout, place_unplaced, to_layout, LayoutEntry};
