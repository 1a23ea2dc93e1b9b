//! Terminal input for the dashboard.
//!
//! [`EventHandler`] yields crossterm input interleaved with ticks, and
//! [`handle_key_event`] turns keys into [`Action`]s. Keys that only move
//! the selection or edit the form change the app in place.

use crate::tui::app::{App, Mode};
use crate::user::USERS;
use crate::WidgetKind;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;

/// Input seen by the main loop.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    Key(KeyEvent),
    /// Clicks, drags and scrolls over the grid.
    Mouse(MouseEvent),
    /// New terminal size in columns and rows.
    Resize(u16, u16),
    /// Expires notifications and wakes the loop to drain fetch results.
    Tick,
}

/// Merges the crossterm stream with a fixed-rate tick.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Next input, or [`Event::Tick`] once `tick_rate` passes without any.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        // interval fires immediately on first poll
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                            return Ok(Event::Key(key))
                        }
                        Some(Ok(CrosstermEvent::Mouse(mouse))) => return Ok(Event::Mouse(mouse)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // Ignore focus, paste and key release events
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// What a key asks the app to do beyond updating selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Submit the add-widget form.
    SubmitForm,
    /// Remove the widget.
    Remove(String),
    /// Show or hide the widget.
    ToggleVisibility(String),
    /// Expand the widget to full row width.
    Expand(String),
    /// Show the widget fullscreen.
    Fullscreen(String),
    /// Leave fullscreen.
    ExitFullscreen,
    /// Restore the widget's original size.
    Restore(String),
    /// Switch a chart to its next chart type.
    CycleChartType(String),
    /// Advance a table to its next sort.
    CycleSort(String),
    /// Fetch the widget's data again.
    Refresh(String),
    /// Move the widget by whole grid cells.
    Move {
        /// Widget to move.
        id: String,
        /// Columns to the right (negative: left).
        dx: i32,
        /// Rows down (negative: up).
        dy: i32,
    },
    /// Grow or shrink the widget by whole grid cells.
    Resize {
        /// Widget to resize.
        id: String,
        /// Width change.
        dw: i32,
        /// Height change.
        dh: i32,
    },
    /// Switch to the user with the given id.
    SwitchUser(String),
}

/// Routes `key` by the open panel: the add-widget form captures text,
/// the widget list and user picker capture navigation, and the fullscreen
/// overlay limits actions to its widget.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    // Global: Ctrl-C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.mode {
        Mode::AddWidget(_) => return handle_form_key(app, key),
        Mode::WidgetList { selected } => return handle_widget_list_key(app, key, selected),
        Mode::UserPicker { selected } => return handle_user_picker_key(app, key, selected),
        Mode::Dashboard => {}
    }

    if should_quit(key) {
        return Action::Quit;
    }

    if let Some(id) = app.overlay.widget().map(str::to_string) {
        return handle_fullscreen_key(app, key, id);
    }

    match key.code {
        KeyCode::Tab => {
            app.focus_next();
            Action::None
        }
        KeyCode::BackTab => {
            app.focus_previous();
            Action::None
        }
        KeyCode::Down => {
            app.scroll_by(1);
            Action::None
        }
        KeyCode::Up => {
            app.scroll_by(-1);
            Action::None
        }
        KeyCode::PageDown => {
            app.scroll_by(i32::from(app.settings().row_height) * 2);
            Action::None
        }
        KeyCode::PageUp => {
            app.scroll_by(-i32::from(app.settings().row_height) * 2);
            Action::None
        }
        KeyCode::Char('a') => {
            app.open_add_form();
            Action::None
        }
        KeyCode::Char('w') => {
            app.open_widget_list();
            Action::None
        }
        KeyCode::Char('u') => {
            app.open_user_picker();
            Action::None
        }
        KeyCode::Esc => {
            // Esc clears focus
            app.focused = None;
            Action::None
        }
        _ => match app.focused.clone() {
            Some(id) => handle_focused_key(app, key, id),
            None => Action::None,
        },
    }
}

/// Keys acting on the focused widget.
fn handle_focused_key(app: &App, key: KeyEvent, id: String) -> Action {
    match key.code {
        KeyCode::Char('e') => Action::Expand(id),
        KeyCode::Char('f') => Action::Fullscreen(id),
        KeyCode::Char('r') => Action::Restore(id),
        KeyCode::Char('h') => Action::ToggleVisibility(id),
        KeyCode::Char('x') => Action::Remove(id),
        KeyCode::Char('H') => Action::Move { id, dx: -1, dy: 0 },
        KeyCode::Char('L') => Action::Move { id, dx: 1, dy: 0 },
        KeyCode::Char('K') => Action::Move { id, dx: 0, dy: -1 },
        KeyCode::Char('J') => Action::Move { id, dx: 0, dy: 1 },
        KeyCode::Char('[') => Action::Resize { id, dw: -1, dh: 0 },
        KeyCode::Char(']') => Action::Resize { id, dw: 1, dh: 0 },
        KeyCode::Char('-') => Action::Resize { id, dw: 0, dh: -1 },
        KeyCode::Char('=') | KeyCode::Char('+') => Action::Resize { id, dw: 0, dh: 1 },
        _ => handle_content_key(app, key, id),
    }
}

/// Keys acting on a widget's content; shared with the fullscreen overlay.
fn handle_content_key(app: &App, key: KeyEvent, id: String) -> Action {
    let kind = app.store().get(&id).map(|r| r.kind);
    match (key.code, kind) {
        (KeyCode::Char('c'), Some(WidgetKind::Chart)) => Action::CycleChartType(id),
        (KeyCode::Char('s'), Some(WidgetKind::Table)) => Action::CycleSort(id),
        (KeyCode::Char('R'), Some(_)) => Action::Refresh(id),
        _ => Action::None,
    }
}

/// Keys while a widget is fullscreen.
fn handle_fullscreen_key(app: &App, key: KeyEvent, id: String) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') => Action::ExitFullscreen,
        KeyCode::Char('r') => Action::Restore(id),
        _ => handle_content_key(app, key, id),
    }
}

/// Keys while the add-widget form is open.
fn handle_form_key(app: &mut App, key: KeyEvent) -> Action {
    let Mode::AddWidget(form) = &mut app.mode else {
        return Action::None;
    };
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Dashboard;
            Action::None
        }
        KeyCode::Enter => Action::SubmitForm,
        KeyCode::Tab => {
            form.cycle_kind();
            Action::None
        }
        KeyCode::Backspace => {
            form.backspace();
            Action::None
        }
        KeyCode::Char(c) => {
            form.push(c);
            Action::None
        }
        _ => Action::None,
    }
}

/// Keys while the widget list panel is open.
fn handle_widget_list_key(app: &mut App, key: KeyEvent, selected: usize) -> Action {
    let count = app.store().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('w') => {
            app.mode = Mode::Dashboard;
            Action::None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.mode = Mode::WidgetList {
                selected: (selected + 1).min(count.saturating_sub(1)),
            };
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.mode = Mode::WidgetList {
                selected: selected.saturating_sub(1),
            };
            Action::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => match app.store().widgets().get(selected) {
            Some(record) => Action::ToggleVisibility(record.id.clone()),
            None => Action::None,
        },
        _ => Action::None,
    }
}

/// Keys while the user picker is open.
fn handle_user_picker_key(app: &mut App, key: KeyEvent, selected: usize) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('u') => {
            app.mode = Mode::Dashboard;
            Action::None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.mode = Mode::UserPicker {
                selected: (selected + 1).min(USERS.len() - 1),
            };
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.mode = Mode::UserPicker {
                selected: selected.saturating_sub(1),
            };
            Action::None
        }
        KeyCode::Enter => match USERS.get(selected) {
            Some(user) => Action::SwitchUser(user.id.to_string()),
            None => Action::None,
        },
        _ => Action::None,
    }
}

/// `q` or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
        || (key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')))
}
