use super::*;
use crate::grid::{Handle, Interaction};
use crate::tui::event::Action;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Lines scrolled per wheel notch.
const WHEEL_LINES: i32 = 3;

impl App {
    /// Handles a mouse event on the grid.
    ///
    /// Pressing on a widget's top border starts a drag, pressing on its
    /// bottom-right corner starts a resize, and releasing commits. Mouse
    /// input is ignored while a panel or the fullscreen overlay is open.
    pub(crate) fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        if self.mode != Mode::Dashboard || self.overlay.is_active() {
            return Action::None;
        }
        let Some(geometry) = self.geometry() else {
            return Action::None;
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_down(geometry, mouse.column, mouse.row)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pointer_drag(geometry, mouse.column, mouse.row)
            }
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(),
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_LINES),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_LINES),
            _ => {}
        }
        Action::None
    }

    fn pointer_down(&mut self, geometry: GridGeometry, column: u16, row: u16) {
        let layout = self.adapter.display_layout(self.store());
        let Some((id, handle)) = geometry.hit_test(&layout, column, row) else {
            self.focused = None;
            return;
        };
        self.focused = Some(id.clone());
        let (Some(cell), Some(entry)) = (
            geometry.cell_at(column, row),
            layout.iter().find(|e| e.id == id),
        ) else {
            return;
        };
        let started = match handle {
            Handle::DragBar => self.adapter.drag_start(self.session.store(), &id, handle),
            Handle::ResizeCorner => self.adapter.resize_start(self.session.store(), &id),
            Handle::Body => false,
        };
        if started {
            self.pointer = Some(Pointer {
                grab: (cell.0.saturating_sub(entry.x), cell.1.saturating_sub(entry.y)),
                last: cell,
            });
        }
    }

    fn pointer_drag(&mut self, geometry: GridGeometry, column: u16, row: u16) {
        let (Some(pointer), Some(cell)) = (self.pointer.as_mut(), geometry.cell_at(column, row))
        else {
            return;
        };
        if pointer.last == cell {
            return;
        }
        pointer.last = cell;
        let grab = pointer.grab;

        let origin = match self.adapter.state() {
            Interaction::Resizing { item, layout } => layout
                .iter()
                .find(|e| e.id == *item)
                .map(|e| (e.x, e.y)),
            Interaction::Dragging { .. } | Interaction::Idle => None,
        };
        match origin {
            Some((x, y)) => {
                let w = (cell.0 + 1).saturating_sub(x).max(1);
                let h = (cell.1 + 1).saturating_sub(y).max(1);
                self.adapter.resize(self.session.store_mut(), w, h);
            }
            None => {
                self.adapter
                    .drag_move(cell.0.saturating_sub(grab.0), cell.1.saturating_sub(grab.1));
            }
        }
    }

    fn pointer_up(&mut self) {
        if self.pointer.take().is_none() {
            return;
        }
        match self.adapter.state() {
            Interaction::Dragging { .. } => {
                self.adapter.drag_stop(self.session.store_mut());
            }
            Interaction::Resizing { .. } => {
                self.adapter.resize_stop(self.session.store_mut());
            }
            Interaction::Idle => {}
        }
        self.sync();
    }
}
