//! TUI module for the widget dashboard.
//!
//! Provides a terminal user interface built on ratatui and crossterm: the
//! widget grid, the add-widget form, the widget list panel, notifications
//! and the fullscreen overlay.

pub mod app;
pub mod event;
pub mod form;
pub mod geometry;
pub mod ui;
pub mod views;

#[cfg(test)]
pub(crate) mod test_utils;
