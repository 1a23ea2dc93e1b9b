//! Customer table view with cycling column sort.

use crate::data::{Customer, CustomerStatus};
use crate::store::TableSort;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use std::cmp::Ordering;

/// Column headers, in display order.
pub const COLUMNS: [&str; 5] = ["Name", "Email", "Status", "Last Order", "Total Spent"];

/// Next sort in the cycle: unsorted, then each column ascending and
/// descending in turn, then unsorted again.
pub fn next_sort(current: Option<TableSort>) -> Option<TableSort> {
    match current {
        None => Some(TableSort {
            column: 0,
            descending: false,
        }),
        Some(TableSort {
            column,
            descending: false,
        }) => Some(TableSort {
            column,
            descending: true,
        }),
        Some(TableSort { column, .. }) if column + 1 < COLUMNS.len() => Some(TableSort {
            column: column + 1,
            descending: false,
        }),
        Some(_) => None,
    }
}

fn compare(a: &Customer, b: &Customer, column: usize) -> Ordering {
    match column {
        0 => a.name.cmp(&b.name),
        1 => a.email.cmp(&b.email),
        2 => a.status.cmp(&b.status),
        3 => a.last_order.cmp(&b.last_order),
        4 => a.total_spent.cmp(&b.total_spent),
        _ => Ordering::Equal,
    }
}

/// Customers in display order under `sort`. Ties keep fetch order.
pub fn sorted(customers: &[Customer], sort: Option<TableSort>) -> Vec<&Customer> {
    let mut rows: Vec<&Customer> = customers.iter().collect();
    if let Some(sort) = sort {
        rows.sort_by(|a, b| {
            let ord = compare(a, b, sort.column);
            if sort.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
    rows
}

fn status_color(status: CustomerStatus) -> Color {
    match status {
        CustomerStatus::Active => Color::Green,
        CustomerStatus::Pending => Color::Yellow,
        CustomerStatus::Inactive => Color::DarkGray,
    }
}

fn header_label(index: usize, sort: Option<TableSort>) -> String {
    match sort {
        Some(s) if s.column == index && s.descending => format!("{} ↓", COLUMNS[index]),
        Some(s) if s.column == index => format!("{} ↑", COLUMNS[index]),
        _ => COLUMNS[index].to_string(),
    }
}

/// Renders a count line and the sorted customer table.
pub fn render_table(frame: &mut Frame, area: Rect, customers: &[Customer], sort: Option<TableSort>) {
    let [summary_area, table_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let summary = Paragraph::new(Line::from(Span::styled(
        format!("{} customers", customers.len()),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(summary, summary_area);

    let header = Row::new((0..COLUMNS.len()).map(|i| Cell::from(header_label(i, sort))))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = sorted(customers, sort).into_iter().map(|c| {
        Row::new(vec![
            Cell::from(c.name.clone()),
            Cell::from(c.email.clone()),
            Cell::from(Span::styled(
                c.status.to_string(),
                Style::default().fg(status_color(c.status)),
            )),
            Cell::from(c.last_order.to_string()),
            Cell::from(format!("${}", c.total_spent)),
        ])
    });
    let widths = [
        Constraint::Percentage(22),
        Constraint::Percentage(30),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(13),
    ];
    frame.render_widget(Table::new(rows, widths).header(header), table_area);
}
