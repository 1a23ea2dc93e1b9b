//! Grid interaction adapter.
//!
//! Translates pointer interactions on the grid surface into layout changes.
//! An interaction is a small state machine:
//!
//! ```text
//! Idle --drag_start(DragBar)--> Dragging --drag_move--> Dragging --drag_stop--> Idle
//! Idle --resize_start---------> Resizing --resize-----> Resizing --resize_stop-> Idle
//! ```
//!
//! While an interaction runs, the adapter shows its own proposal layout.
//! Commits go through [`WidgetStore::replace_layout`] and only happen at the
//! authoritative `lg` breakpoint; narrower layouts are derived on the fly.

use crate::layout::{push_overlapping_below, to_layout, Breakpoint, GridEngine, LayoutEntry};
use crate::store::{WidgetPatch, WidgetStore};
use crate::Size;


/// Part of a widget a pointer interaction started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Title bar; the only part that starts a drag.
    DragBar,
    /// Bottom-right corner; starts a resize.
    ResizeCorner,
    /// Widget content.
    Body,
}

/// Current pointer interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Interaction {
    /// No interaction.
    #[default]
    Idle,
    /// Moving a widget.
    Dragging {
        /// Widget being moved.
        item: String,
        /// Cell the widget started from.
        origin: (u32, u32),
        /// Proposed layout.
        layout: Vec<LayoutEntry>,
    },
    /// Resizing a widget.
    Resizing {
        /// Widget being resized.
        item: String,
        /// Layout with every other entry locked.
        layout: Vec<LayoutEntry>,
    },
}

impl Interaction {
    /// Widget the interaction is about.
    pub fn item(&self) -> Option<&str> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging { item, .. } | Interaction::Resizing { item, .. } => Some(item),
        }
    }

    /// Returns `true` when no interaction runs.
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// Drives drag and resize interactions against a store.
#[derive(Debug, Clone)]
pub struct GridAdapter {
    breakpoint: Breakpoint,
    engine: GridEngine,
    state: Interaction,
}

impl Default for GridAdapter {
    fn default() -> Self {
        Self::new(Breakpoint::Lg)
    }
}

impl GridAdapter {
    /// Creates an idle adapter for `breakpoint`.
    pub fn new(breakpoint: Breakpoint) -> Self {
        Self {
            breakpoint,
            engine: GridEngine::for_breakpoint(breakpoint),
            state: Interaction::Idle,
        }
    }

    /// Current interaction.
    pub fn state(&self) -> &Interaction {
        &self.state
    }

    /// Current breakpoint.
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Engine for the current breakpoint.
    pub fn engine(&self) -> GridEngine {
        self.engine
    }

    /// Switches breakpoint. A running interaction is dropped.
    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        if breakpoint == self.breakpoint {
            return;
        }
        tracing::debug!("breakpoint {} -> {}", self.breakpoint.name(), breakpoint.name());
        self.breakpoint = breakpoint;
        self.engine = GridEngine::for_breakpoint(breakpoint);
        self.cancel();
    }

    /// Returns `true` if layout changes at this breakpoint are persisted.
    pub fn is_authoritative(&self) -> bool {
        self.breakpoint.is_authoritative()
    }

    /// Layout to show: the interaction's proposal, or the store's layout
    /// bounded to the current columns and compacted.
    pub fn display_layout(&self, store: &WidgetStore) -> Vec<LayoutEntry> {
        match &self.state {
            Interaction::Dragging { layout, .. } | Interaction::Resizing { layout, .. } => {
                layout.clone()
            }
            Interaction::Idle => self.engine.squeeze(&to_layout(store.widgets())),
        }
    }

    /// Starts dragging `id`. Only the drag bar starts a drag.
    ///
    /// Returns `false` if the drag was refused.
    pub fn drag_start(&mut self, store: &WidgetStore, id: &str, handle: Handle) -> bool {
        if handle != Handle::DragBar || !self.state.is_idle() {
            return false;
        }
        let layout = self.display_layout(store);
        let Some(entry) = layout.iter().find(|e| e.id == id) else {
            return false;
        };
        let origin = (entry.x, entry.y);
        tracing::debug!("drag start {} at {:?}", id, origin);
        self.state = Interaction::Dragging {
            item: id.to_string(),
            origin,
            layout,
        };
        true
    }

    /// Moves the dragged widget to cell `(x, y)`, pushing colliders away.
    ///
    /// The proposal is shown but not committed.
    pub fn drag_move(&mut self, x: u32, y: u32) -> bool {
        let engine = self.engine;
        let Interaction::Dragging { item, layout, .. } = &mut self.state else {
            return false;
        };
        *layout = engine.move_item(layout, item, x, y);
        true
    }

    /// Ends the drag and commits the proposal as is.
    pub fn drag_stop(&mut self, store: &mut WidgetStore) -> bool {
        let Interaction::Dragging {
            item,
            origin,
            mut layout,
        } = std::mem::take(&mut self.state)
        else {
            return false;
        };
        unlock(&mut layout);
        tracing::debug!("drag stop {} (from {:?})", item, origin);
        self.commit(store, &layout)
    }

    /// Starts resizing `id`; every other widget is locked in place.
    pub fn resize_start(&mut self, store: &WidgetStore, id: &str) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        let mut layout = self.display_layout(store);
        if !layout.iter().any(|e| e.id == id) {
            return false;
        }
        for entry in layout.iter_mut() {
            entry.locked = entry.id != id;
        }
        tracing::debug!("resize start {}", id);
        self.state = Interaction::Resizing {
            item: id.to_string(),
            layout,
        };
        true
    }

    /// Resizes the widget being resized. Only its `w, h` change and only
    /// they are committed.
    pub fn resize(&mut self, store: &mut WidgetStore, w: u32, h: u32) -> bool {
        let engine = self.engine;
        let Interaction::Resizing { item, layout } = &mut self.state else {
            return false;
        };
        *layout = engine.resize_item(layout, item, w, h);
        let Some(entry) = layout.iter().find(|e| e.id == *item) else {
            return false;
        };
        if !self.breakpoint.is_authoritative() {
            return false;
        }
        store.update_widget_fields(item, WidgetPatch::size(Size::new(entry.w, entry.h)))
    }

    /// Ends the resize: pushes the resized widget's row band below it,
    /// unlocks everything and commits once.
    pub fn resize_stop(&mut self, store: &mut WidgetStore) -> bool {
        let Interaction::Resizing { item, layout } = std::mem::take(&mut self.state) else {
            return false;
        };
        let mut layout = push_overlapping_below(&layout, &item);
        unlock(&mut layout);
        tracing::debug!("resize stop {}", item);
        self.commit(store, &layout)
    }

    /// Drops the running interaction without committing.
    pub fn cancel(&mut self) {
        if let Some(item) = self.state.item() {
            tracing::debug!("interaction on {} cancelled", item);
        }
        self.state = Interaction::Idle;
    }

    /// Writes the compacted layout back when it differs from the store.
    ///
    /// This also completes placement of freshly added widgets. Does nothing
    /// during an interaction or below `lg`.
    pub fn reconcile(&self, store: &mut WidgetStore) -> bool {
        if !self.state.is_idle() || !self.is_authoritative() {
            return false;
        }
        let layout = self.display_layout(store);
        let stale = layout
            .iter()
            .any(|entry| store.get(&entry.id).is_some_and(|r| !entry.matches(r)));
        if !stale {
            return false;
        }
        self.commit(store, &layout)
    }

    fn commit(&self, store: &mut WidgetStore, layout: &[LayoutEntry]) -> bool {
        if !self.is_authoritative() {
            tracing::debug!(
                "not persisting layout at {} breakpoint",
                self.breakpoint.name()
            );
            return false;
        }
        store.replace_layout(layout);
        true
    }
}

fn unlock(layout: &mut [LayoutEntry]) {
    for entry in layout.iter_mut() {
        entry.locked = false;
    }
}
