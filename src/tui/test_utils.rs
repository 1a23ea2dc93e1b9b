//! Buffer inspection and app builders for rendering tests.
//!
//! Views are drawn onto a ratatui `TestBackend`; assertions then read text
//! and colors back out of the resulting [`Buffer`].

#![cfg(test)]

use crate::config::schema::Config;
use crate::store::{storage_key, BlobStore, MemoryBlobStore, PersistedDashboard, WidgetRecord};
use crate::tui::app::{App, AppSettings};
use crate::tui::ui::render_dashboard;
use crate::user::{DashboardSession, DEFAULT_USER_ID};
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Frame, Terminal};
use std::sync::Arc;

/// Draws with `f` on a `width` x `height` test terminal.
pub fn render_to_buffer<F: FnOnce(&mut Frame)>(width: u16, height: u16, f: F) -> Buffer {
    let mut terminal =
        Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
    terminal.draw(f).expect("draw into test backend");
    terminal.backend().buffer().clone()
}

pub fn render_app_to_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    render_to_buffer(width, height, |frame| render_dashboard(frame, app))
}

/// Symbols of one buffer row joined together. Out of range rows are empty.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let mut text = String::new();
    if row < buffer.area().height {
        for col in 0..buffer.area().width {
            text.push_str(buffer.cell((col, row)).map_or(" ", |c| c.symbol()));
        }
    }
    text
}

pub fn row_contains(buffer: &Buffer, row: u16, text: &str) -> bool {
    row_text(buffer, row).contains(text)
}

/// Index of the topmost row showing `text`.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    (0..buffer.area().height).find(|&row| row_contains(buffer, row, text))
}

pub fn assert_fg_color(buffer: &Buffer, col: u16, row: u16, color: Color) {
    let Some(cell) = buffer.cell((col, row)) else {
        panic!("({col}, {row}) is outside the buffer");
    };
    assert_eq!(cell.fg, color, "foreground at ({col}, {row})");
}

/// Checks the color of the first glyph of `text` within `row`.
pub fn assert_text_fg_in_row(buffer: &Buffer, row: u16, text: &str, color: Color) {
    let line = row_text(buffer, row);
    let Some(start) = line.find(text) else {
        panic!("{text:?} missing from row {row}: {line:?}");
    };
    let col = line[..start].chars().count() as u16;
    assert_fg_color(buffer, col, row, color);
}

/// Settings for tests: default config with no fetch latency.
pub fn test_settings() -> AppSettings {
    let mut config = Config::default();
    config.data.latency = "0ms".to_string();
    AppSettings::from_config(&config).expect("test settings are valid")
}

/// Creates an app for user `user1` whose dashboard holds exactly `records`.
pub fn make_app(records: Vec<WidgetRecord>) -> App {
    let blobs = Arc::new(MemoryBlobStore::new());
    let blob = PersistedDashboard::new(records, 0)
        .encode()
        .expect("records encode");
    blobs
        .write(&storage_key(DEFAULT_USER_ID), &blob)
        .expect("memory write");
    App::new(DashboardSession::open(blobs, None), test_settings())
}

/// Creates an app over the default widget set.
pub fn make_default_app() -> App {
    let blobs = Arc::new(MemoryBlobStore::new());
    App::new(DashboardSession::open(blobs, None), test_settings())
}
