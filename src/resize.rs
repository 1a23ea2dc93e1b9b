//! Manual resize, expand, fullscreen and restore.
//!
//! These requests come from a widget's own chrome rather than from the grid
//! handles. Each one resizes the target, pushes every visible sibling in the
//! target's current row band to the row just below the new height, and
//! commits target and siblings to the store in one write.

use crate::layout::siblings_in_band;
use crate::notify::{Notification, Notifier};
use crate::store::{WidgetPatch, WidgetRecord, WidgetStore, DEFAULT_WIDGET_SIZE};
use crate::{Size, SizeState, GRID_COLUMNS};

/// Footprint of a fullscreen widget.
pub const FULLSCREEN_SIZE: Size = Size::new(GRID_COLUMNS, 4);

/// Size used by restore when no original was ever captured.
pub const RESTORE_FALLBACK_SIZE: Size = DEFAULT_WIDGET_SIZE;

/// Result of a committed resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// Size the target ended up with, after clamping.
    pub size: Size,
    /// Ids of the siblings moved below the target.
    pub moved: Vec<String>,
}

/// Which widget, if any, covers the whole viewport.
///
/// Presentation state only; it is never stored on a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullscreenOverlay {
    widget: Option<String>,
}

impl FullscreenOverlay {
    /// Id of the fullscreen widget.
    pub fn widget(&self) -> Option<&str> {
        self.widget.as_deref()
    }

    /// Returns `true` if some widget is fullscreen.
    pub fn is_active(&self) -> bool {
        self.widget.is_some()
    }

    /// Clears the overlay if it shows `id`.
    pub fn forget(&mut self, id: &str) {
        if self.widget.as_deref() == Some(id) {
            self.widget = None;
        }
    }
}

/// Applies chrome-triggered size changes to a store.
pub struct ResizeCoordinator<'a> {
    store: &'a mut WidgetStore,
    notifier: &'a mut dyn Notifier,
}

impl<'a> ResizeCoordinator<'a> {
    /// Creates a coordinator working on `store`.
    pub fn new(store: &'a mut WidgetStore, notifier: &'a mut dyn Notifier) -> Self {
        Self { store, notifier }
    }

    /// Resizes a widget to `w x h` and pushes its row band below it.
    ///
    /// The size before the first manual resize is kept as the original.
    /// With `preserve_original == false` the current size replaces it.
    /// Unknown and hidden ids are a no-op and return `None`.
    pub fn request_resize(
        &mut self,
        id: &str,
        w: u32,
        h: u32,
        preserve_original: bool,
    ) -> Option<ResizeOutcome> {
        let target = self.target(id)?;
        let original = snapshot(&target, preserve_original);
        self.commit(
            &target,
            Size::new(w, h),
            SizeState::Expanded { original },
            "resized",
        )
    }

    /// Expands a widget to the full row width at its current height.
    pub fn expand(&mut self, id: &str) -> Option<ResizeOutcome> {
        let h = self.store.get(id)?.h;
        self.request_resize(id, GRID_COLUMNS, h, true)
    }

    /// Resizes a widget to the fullscreen footprint and shows it in `overlay`.
    pub fn enter_fullscreen(
        &mut self,
        overlay: &mut FullscreenOverlay,
        id: &str,
    ) -> Option<ResizeOutcome> {
        let target = self.target(id)?;
        let original = snapshot(&target, true);
        let outcome = self.commit(
            &target,
            FULLSCREEN_SIZE,
            SizeState::Fullscreen { original },
            "opened fullscreen",
        )?;
        overlay.widget = Some(target.id);
        Some(outcome)
    }

    /// Leaves fullscreen. The widget keeps its fullscreen size until restored.
    pub fn exit_fullscreen(&mut self, overlay: &mut FullscreenOverlay) {
        if let Some(id) = overlay.widget.take() {
            tracing::debug!("widget {} left fullscreen", id);
        }
    }

    /// Resizes a widget back to its original size.
    ///
    /// Falls back to the default widget size when no original was captured.
    /// The original stays recorded so later cycles return to the same size.
    pub fn request_restore(&mut self, id: &str) -> Option<ResizeOutcome> {
        let target = self.target(id)?;
        match target.size_state.original_size() {
            Some(original) => self.commit(
                &target,
                original,
                SizeState::Restored { original },
                "restored",
            ),
            None => self.commit(&target, RESTORE_FALLBACK_SIZE, SizeState::Normal, "restored"),
        }
    }

    /// Current record of `id`, after resolving pending placements.
    ///
    /// The push-down needs a real row for every widget.
    /// Hidden widgets are off the grid, so they cannot be resized.
    fn target(&mut self, id: &str) -> Option<WidgetRecord> {
        self.store.place_pending();
        let target = self.store.get(id)?;
        if !target.visible {
            tracing::debug!("ignoring resize of hidden widget {}", id);
            return None;
        }
        Some(target.clone())
    }

    fn commit(
        &mut self,
        target: &WidgetRecord,
        requested: Size,
        state: SizeState,
        verb: &str,
    ) -> Option<ResizeOutcome> {
        let size = target.clamp_size(requested);
        let moved = siblings_in_band(self.store.widgets(), target);
        let below = target.y.saturating_add(size.h);

        let mut patches = Vec::with_capacity(moved.len() + 1);
        patches.push((
            target.id.clone(),
            WidgetPatch::size(size).with_size_state(state),
        ));
        patches.extend(moved.iter().map(|id| (id.clone(), WidgetPatch::row(below))));
        if self.store.apply_patches(patches) == 0 {
            return None;
        }

        tracing::debug!(
            "widget {} {} to {}, moved {:?} to row {}",
            target.id,
            verb,
            size,
            moved,
            below
        );
        self.notifier
            .show(Notification::info(format!("{} {} to {}", target.title, verb, size)));
        Some(ResizeOutcome { size, moved })
    }
}

/// Original size to record for a new manual resize of `target`.
fn snapshot(target: &WidgetRecord, preserve_original: bool) -> Size {
    match target.size_state.original_size() {
        Some(original) if preserve_original => original,
        _ => target.size(),
    }
}
