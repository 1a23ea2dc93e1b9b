//! Chart views: bars for revenue, a line for sales, shares for
//! distribution.

use crate::data::{Records, RevenuePoint, SalesPoint, Share};
use ratatui::{
    layout::{Direction, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType},
    Frame,
};

/// Compact dollar amount, e.g. `$12k`.
pub fn short_amount(value: u64) -> String {
    if value >= 1_000 {
        format!("${}k", value / 1_000)
    } else {
        format!("${}", value)
    }
}

/// Renders whichever chart fits `records`. Non-chart records are ignored.
pub fn render_chart(frame: &mut Frame, area: Rect, records: &Records) {
    match records {
        Records::Revenue(points) => render_revenue(frame, area, points),
        Records::Sales(points) => render_sales(frame, area, points),
        Records::Distribution(shares) => render_distribution(frame, area, shares),
        Records::Customers(_) | Records::Metrics(_) => {}
    }
}

fn render_revenue(frame: &mut Frame, area: Rect, points: &[RevenuePoint]) {
    let count = points.len().max(1) as u16;
    let bar_width = (area.width / count).saturating_sub(1).clamp(1, 9);
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.revenue)
                .label(Line::from(p.month.clone()))
                .text_value(short_amount(p.revenue))
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Indexed(63)))
        .value_style(Style::default().fg(Color::White).bg(Color::Indexed(63)));
    frame.render_widget(chart, area);
}

fn render_sales(frame: &mut Frame, area: Rect, points: &[SalesPoint]) {
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.sales as f64))
        .collect();
    let max = points.iter().map(|p| p.sales).max().unwrap_or(0);
    let x_labels: Vec<String> = [points.first(), points.last()]
        .into_iter()
        .flatten()
        .map(|p| p.date.format("%b %d").to_string())
        .collect();

    let dataset = Dataset::default()
        .name("sales")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);
    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .bounds([0.0, data.len().saturating_sub(1).max(1) as f64])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, (max as f64 * 1.1).max(1.0)])
                .labels(vec!["0".to_string(), max.to_string()])
                .style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(chart, area);
}

fn render_distribution(frame: &mut Frame, area: Rect, shares: &[Share]) {
    let bars: Vec<Bar> = shares
        .iter()
        .map(|s| {
            Bar::default()
                .value(s.value)
                .label(Line::from(s.category.clone()))
                .text_value(format!("{}%", s.value))
        })
        .collect();
    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .max(100)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    frame.render_widget(chart, area);
}
