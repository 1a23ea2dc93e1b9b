//! Application state and main event loop for the TUI.
//!
//! Manages terminal setup/teardown, panic hooks, and the core render loop.
//! Widget data is fetched on spawned tasks and drained back into the app
//! before each render.

mod mouse;
mod update;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::data::{DataSource, Dataset, FetchError, Records};
use crate::grid::GridAdapter;
use crate::layout::{Breakpoint, Breakpoints};
use crate::notify::NotificationCenter;
use crate::resize::FullscreenOverlay;
use crate::store::{WidgetRecord, WidgetStore};
use crate::tui::event::{handle_key_event, Event, EventHandler};
use crate::tui::form::AddWidgetForm;
use crate::tui::geometry::GridGeometry;
use crate::tui::ui::render_dashboard;
use crate::tui::views::WidgetData;
use crate::user::{DashboardSession, USERS};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::Rect;
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Runtime settings resolved from the configuration file.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    /// Interval between passive ticks.
    pub tick_rate: Duration,
    /// Terminal lines per grid row.
    pub row_height: u16,
    /// Terminal widths at which the column count changes.
    pub breakpoints: Breakpoints,
    /// How long notifications stay on screen.
    pub notification_duration: Duration,
    /// Where widget data comes from.
    pub source: DataSource,
}

impl AppSettings {
    /// Resolves settings from `config`, failing on the first invalid value.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            tick_rate: config.tui.tick_rate()?,
            row_height: config.tui.row_height()?,
            breakpoints: config.grid.breakpoints()?,
            notification_duration: config.notifications.duration()?,
            source: DataSource::new(config.data.latency()?),
        })
    }
}

/// Which panel has the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// The grid itself.
    Dashboard,
    /// The add-widget form.
    AddWidget(AddWidgetForm),
    /// The widget list used to show and hide widgets.
    WidgetList {
        /// Highlighted row, in store order.
        selected: usize,
    },
    /// The user picker.
    UserPicker {
        /// Highlighted row in the user directory.
        selected: usize,
    },
}

/// A fetch the event loop should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    /// Widget waiting for the data.
    pub widget: String,
    /// Dataset to fetch.
    pub dataset: Dataset,
}

/// A finished fetch.
#[derive(Debug)]
pub struct FetchResult {
    /// Widget that asked for the data.
    pub widget: String,
    /// Dataset that was fetched.
    pub dataset: Dataset,
    /// Records or the fetch failure.
    pub result: Result<Records, FetchError>,
}

/// Pointer interaction in progress on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pointer {
    /// Offset of the grabbed cell from the widget's top-left cell.
    grab: (u32, u32),
    /// Last cell the pointer was seen over.
    last: (u32, u32),
}

/// Core application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Count of ticks processed (useful for testing/diagnostics).
    pub tick_count: u64,
    /// Current user and their widget store.
    pub session: DashboardSession,
    /// Drag and resize state machine for the grid.
    pub adapter: GridAdapter,
    /// Widget shown fullscreen, if any.
    pub overlay: FullscreenOverlay,
    /// Notifications on screen.
    pub notifications: NotificationCenter,
    /// Widget that keyboard actions apply to.
    pub focused: Option<String>,
    /// Panel that has the keyboard.
    pub mode: Mode,
    /// Fetched data per widget id.
    pub data: HashMap<String, WidgetData>,
    /// Lines of the grid scrolled off the top.
    pub scroll: u16,
    /// Screen area of the grid, updated during each render pass.
    ///
    /// Used by mouse handling to map terminal cells to grid cells. `None`
    /// until the first render.
    pub grid_area: Option<Rect>,
    /// Terminal width (updated during each render pass).
    pub terminal_width: u16,
    pointer: Option<Pointer>,
    settings: AppSettings,
}

impl App {
    /// Creates the app for an open session and settles its layout.
    pub fn new(session: DashboardSession, settings: AppSettings) -> Self {
        let mut app = Self {
            should_quit: false,
            tick_count: 0,
            session,
            adapter: GridAdapter::new(Breakpoint::Lg),
            overlay: FullscreenOverlay::default(),
            notifications: NotificationCenter::new(settings.notification_duration),
            focused: None,
            mode: Mode::Dashboard,
            data: HashMap::new(),
            scroll: 0,
            grid_area: None,
            terminal_width: 0,
            pointer: None,
            settings,
        };
        app.sync();
        app
    }

    /// Resolved settings.
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Store of the current user.
    pub fn store(&self) -> &WidgetStore {
        self.session.store()
    }

    /// Record of the focused widget.
    pub fn focused_record(&self) -> Option<&WidgetRecord> {
        self.focused.as_deref().and_then(|id| self.store().get(id))
    }

    /// Grid geometry of the last render, `None` before the first render.
    pub fn geometry(&self) -> Option<GridGeometry> {
        self.grid_area.map(|area| {
            GridGeometry::new(
                area,
                self.adapter.engine().cols(),
                self.settings.row_height,
                self.scroll,
            )
        })
    }

    /// Picks the breakpoint for a terminal `width`.
    ///
    /// Crossing a breakpoint drops any running interaction.
    pub fn set_terminal_width(&mut self, width: u16) {
        self.terminal_width = width;
        let breakpoint = self.settings.breakpoints.for_width(width);
        if breakpoint != self.adapter.breakpoint() {
            self.adapter.set_breakpoint(breakpoint);
            self.pointer = None;
            self.sync();
        }
    }

    /// Visible widget ids in reading order: top to bottom, left to right.
    pub fn visible_order(&self) -> Vec<String> {
        let mut layout = self.adapter.display_layout(self.store());
        layout.sort_by_key(|e| (e.y, e.x));
        layout.into_iter().map(|e| e.id).collect()
    }

    /// Moves focus to the next widget, wrapping around.
    pub fn focus_next(&mut self) {
        let order = self.visible_order();
        if order.is_empty() {
            self.focused = None;
            return;
        }
        let next = match self.focused_index(&order) {
            Some(i) => (i + 1) % order.len(),
            None => 0,
        };
        self.focused = Some(order[next].clone());
    }

    /// Moves focus to the previous widget, wrapping around.
    pub fn focus_previous(&mut self) {
        let order = self.visible_order();
        if order.is_empty() {
            self.focused = None;
            return;
        }
        let prev = match self.focused_index(&order) {
            Some(0) | None => order.len() - 1,
            Some(i) => i - 1,
        };
        self.focused = Some(order[prev].clone());
    }

    fn focused_index(&self, order: &[String]) -> Option<usize> {
        let focused = self.focused.as_deref()?;
        order.iter().position(|id| id == focused)
    }

    /// Scrolls the grid by `delta` lines, clamped to the content.
    pub fn scroll_by(&mut self, delta: i32) {
        let max = match self.geometry() {
            Some(geometry) => geometry.max_scroll(&self.adapter.display_layout(self.store())),
            None => 0,
        };
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(max));
        self.scroll = next as u16;
    }

    /// Opens an empty add-widget form.
    pub fn open_add_form(&mut self) {
        self.mode = Mode::AddWidget(AddWidgetForm::new());
    }

    /// Opens the widget list with the first widget highlighted.
    pub fn open_widget_list(&mut self) {
        self.mode = Mode::WidgetList { selected: 0 };
    }

    /// Opens the user picker on the current user.
    pub fn open_user_picker(&mut self) {
        let current = self.store().user_id();
        let selected = USERS.iter().position(|u| u.id == current).unwrap_or(0);
        self.mode = Mode::UserPicker { selected };
    }

    /// Runs the TUI application: sets up terminal, enters event loop, restores on exit.
    pub async fn run(&mut self) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    /// Main event loop: starts fetches, renders UI and processes events.
    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(self.settings.tick_rate);
        let mut reader = EventStream::new();

        let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchResult>();

        loop {
            // Drain finished fetches before rendering
            while let Ok(fetched) = fetch_rx.try_recv() {
                self.apply_fetch(fetched);
            }

            for job in self.pending_fetches() {
                let source = self.settings.source;
                let tx = fetch_tx.clone();
                tokio::spawn(async move {
                    let result = source.fetch(job.dataset).await;
                    let fetched = FetchResult {
                        widget: job.widget,
                        dataset: job.dataset,
                        result,
                    };
                    if tx.send(fetched).is_err() {
                        tracing::trace!("fetch finished after the app closed");
                    }
                });
            }

            terminal.draw(|frame| {
                render_dashboard(frame, self);
            })?;

            match event_handler.next(&mut reader).await? {
                Event::Key(key) => {
                    let action = handle_key_event(self, key);
                    self.apply_action(action);
                }
                Event::Mouse(mouse) => {
                    let action = self.handle_mouse_event(mouse);
                    self.apply_action(action);
                }
                Event::Tick => {
                    self.tick(Instant::now());
                }
                Event::Resize(_, _) => {
                    // Next draw picks up the new size
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

#[cfg(test)]
mod tests;
