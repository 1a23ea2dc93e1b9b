//! Key metric tiles.

use crate::data::Metric;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Lines taken by one tile: name, value and change.
const TILE_HEIGHT: u16 = 3;

/// Narrowest area that gets two tiles per row.
const TWO_COLUMN_MIN_WIDTH: u16 = 30;

fn tile(metric: &Metric) -> Paragraph<'_> {
    let (arrow, color) = if metric.is_positive {
        ("▲", Color::Green)
    } else {
        ("▼", Color::Red)
    };
    Paragraph::new(vec![
        Line::from(Span::styled(
            metric.name.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            metric.value.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {}", arrow, metric.change),
            Style::default().fg(color),
        )),
    ])
}

/// Renders metrics as tiles, two per row when wide enough. Tiles that do
/// not fit are dropped.
pub fn render_stats(frame: &mut Frame, area: Rect, metrics: &[Metric]) {
    let per_row = if area.width >= TWO_COLUMN_MIN_WIDTH { 2 } else { 1 };
    let rows = metrics.chunks(per_row);
    let fitting = (area.height / TILE_HEIGHT).max(1) as usize;
    let row_areas = Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); fitting]).split(area);

    for (row, row_area) in rows.zip(row_areas.iter()) {
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(*row_area);
        for (metric, cell) in row.iter().zip(cells.iter()) {
            frame.render_widget(tile(metric), *cell);
        }
    }
}
