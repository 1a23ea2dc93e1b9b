//! Widget body views: table, chart and stats.
//!
//! Each view renders already-fetched records into a widget's inner area.
//! [`render_widget_body`] picks the view and covers the loading and empty
//! states.

pub mod chart;
pub mod stats;
pub mod table;

use crate::data::{Dataset, Records};
use crate::store::WidgetRecord;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

/// Shown while a fetch is in flight.
pub const LOADING_TEXT: &str = "Loading...";

/// Shown when a fetch failed or returned nothing.
pub const NO_DATA_TEXT: &str = "No data available";

/// Data state of one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetData {
    /// Fetch in flight.
    Loading(Dataset),
    /// Fetch finished.
    Ready(Dataset, Records),
    /// Fetch failed; rendered as empty.
    Failed(Dataset),
}

impl WidgetData {
    /// Dataset this state belongs to.
    pub fn dataset(&self) -> Dataset {
        match self {
            WidgetData::Loading(d) | WidgetData::Ready(d, _) | WidgetData::Failed(d) => *d,
        }
    }

    /// Returns `true` while the fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetData::Loading(_))
    }
}

/// Renders the content of `record` into `area`.
pub fn render_widget_body(
    frame: &mut Frame,
    area: Rect,
    record: &WidgetRecord,
    data: Option<&WidgetData>,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    match data {
        None | Some(WidgetData::Loading(_)) => render_message(frame, area, LOADING_TEXT),
        Some(WidgetData::Failed(_)) => render_message(frame, area, NO_DATA_TEXT),
        Some(WidgetData::Ready(_, records)) if records.is_empty() => {
            render_message(frame, area, NO_DATA_TEXT)
        }
        Some(WidgetData::Ready(_, records)) => match records {
            Records::Customers(customers) => {
                table::render_table(frame, area, customers, record.type_config.sort)
            }
            Records::Metrics(metrics) => stats::render_stats(frame, area, metrics),
            Records::Revenue(_) | Records::Sales(_) | Records::Distribution(_) => {
                chart::render_chart(frame, area, records)
            }
        },
    }
}

/// Centered gray one-line message.
pub fn render_message(frame: &mut Frame, area: Rect, text: &str) {
    let y = area.y + area.height.saturating_sub(1) / 2;
    let line_area = Rect::new(area.x, y, area.width, 1);
    let paragraph = Paragraph::new(Line::from(text))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, line_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_utils::{find_row_with_text, render_to_buffer};
    use crate::WidgetKind;

    fn stats_record() -> WidgetRecord {
        WidgetRecord::new("s", WidgetKind::Stats, "Stats")
    }

    #[test]
    fn missing_data_renders_loading() {
        let buffer = render_to_buffer(40, 5, |frame| {
            render_widget_body(frame, frame.area(), &stats_record(), None)
        });
        assert_eq!(find_row_with_text(&buffer, LOADING_TEXT), Some(2));
    }

    #[test]
    fn failed_fetch_renders_no_data() {
        let data = WidgetData::Failed(Dataset::Metrics);
        let buffer = render_to_buffer(40, 5, |frame| {
            render_widget_body(frame, frame.area(), &stats_record(), Some(&data))
        });
        assert!(find_row_with_text(&buffer, NO_DATA_TEXT).is_some());
    }

    #[test]
    fn empty_records_render_no_data() {
        let data = WidgetData::Ready(Dataset::Metrics, Records::Metrics(Vec::new()));
        let buffer = render_to_buffer(40, 5, |frame| {
            render_widget_body(frame, frame.area(), &stats_record(), Some(&data))
        });
        assert!(find_row_with_text(&buffer, NO_DATA_TEXT).is_some());
    }

    #[test]
    fn widget_data_reports_dataset() {
        assert_eq!(WidgetData::Loading(Dataset::Sales).dataset(), Dataset::Sales);
        assert!(WidgetData::Loading(Dataset::Sales).is_loading());
        assert!(!WidgetData::Failed(Dataset::Sales).is_loading());
    }
}
