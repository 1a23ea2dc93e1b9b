//! Main rendering orchestration for the TUI dashboard.
//!
//! Provides the top-level `render_dashboard` function that composes the
//! header, the widget grid (or the fullscreen widget), open panels,
//! notifications and the footer.

use crate::notify::NotificationKind;
use crate::store::WidgetRecord;
use crate::tui::app::{App, Mode};
use crate::tui::form::AddWidgetForm;
use crate::tui::views::{render_message, render_widget_body, WidgetData};
use crate::user::USERS;
use crate::WidgetKind;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

/// Header text displayed at the top of the dashboard.
const HEADER_TEXT: &str = "Widget Dashboard";

/// Shown in place of the grid when no widget is visible.
pub const EMPTY_GRID_TEXT: &str = "No widgets to show. Press [a] to add one or [w] to show hidden ones.";

/// Footer hint when nothing is focused.
const FOOTER_IDLE: &str = "[Tab] Focus  [a] Add  [w] Widgets  [u] User  [q] Quit";

/// Footer hint for the focused widget.
const FOOTER_FOCUSED: &str =
    "[e] Expand  [f] Fullscreen  [r] Restore  [h] Hide  [x] Remove  [HJKL] Move  [ [ ] - = ] Size";

/// Footer hint in fullscreen.
const FOOTER_FULLSCREEN: &str = "[Esc] Exit fullscreen  [r] Restore";

/// Shown in the footer when layout changes are not saved at this width.
pub const UNSAVED_NOTE: &str = "narrow view: layout changes are not saved";

/// Renders the full dashboard.
///
/// Picks the breakpoint from the terminal width and stores the grid area in
/// `app` for mouse hit testing.
pub fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.set_terminal_width(area.width);

    let [header_area, grid_area, footer_area] = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(0),    // grid
        Constraint::Length(1), // footer
    ])
    .areas(area);
    app.grid_area = Some(grid_area);
    // Layout may have shrunk since the last frame
    app.scroll_by(0);

    let app: &App = app;
    render_header(frame, app, header_area);
    match app.overlay.widget().and_then(|id| app.store().get(id)) {
        Some(record) => render_fullscreen(frame, app, record, grid_area),
        None => render_grid(frame, app, grid_area),
    }
    render_footer(frame, app, footer_area);

    match &app.mode {
        Mode::Dashboard => {}
        Mode::AddWidget(form) => render_add_form(frame, form, grid_area),
        Mode::WidgetList { selected } => render_widget_list(frame, app, *selected, grid_area),
        Mode::UserPicker { selected } => render_user_picker(frame, app, *selected, grid_area),
    }
    render_notifications(frame, app, grid_area);
}

/// Title on the left, current user and breakpoint on the right.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let user = match app.session.user_info() {
        Some(info) => format!("{} ({})", info.name, info.role),
        None => app.store().user_id().to_string(),
    };
    let status = format!(
        "{}  {} · {} cols",
        user,
        app.adapter.breakpoint().name(),
        app.adapter.engine().cols()
    );
    let padding = (area.width as usize)
        .saturating_sub(HEADER_TEXT.chars().count())
        .saturating_sub(status.chars().count());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(HEADER_TEXT, Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(padding)),
        Span::styled(status, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, area);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let Some(geometry) = app.geometry() else {
        return;
    };
    let layout = app.adapter.display_layout(app.store());
    if layout.is_empty() {
        render_message(frame, area, EMPTY_GRID_TEXT);
        return;
    }
    let active = app.adapter.state().item();
    for entry in &layout {
        let (Some(rect), Some(record)) = (geometry.cell_rect(entry), app.store().get(&entry.id))
        else {
            continue;
        };
        let color = if active == Some(entry.id.as_str()) {
            Color::Yellow
        } else if app.focused.as_deref() == Some(entry.id.as_str()) {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        render_widget_frame(frame, rect, record, app.data.get(&entry.id), color, None);
    }
}

fn render_fullscreen(frame: &mut Frame, app: &App, record: &WidgetRecord, area: Rect) {
    render_widget_frame(
        frame,
        area,
        record,
        app.data.get(&record.id),
        Color::Cyan,
        Some(" [Esc] exit fullscreen "),
    );
}

/// Bordered widget chrome with the body inside.
fn render_widget_frame(
    frame: &mut Frame,
    area: Rect,
    record: &WidgetRecord,
    data: Option<&WidgetData>,
    border: Color,
    hint: Option<&str>,
) {
    let mut block = Block::bordered()
        .border_style(Style::default().fg(border))
        .title(Line::from(Span::styled(
            format!(" {} ", record.title),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    if record.kind == WidgetKind::Chart {
        block = block.title(Line::from(format!(" {} ", record.chart_type())).right_aligned());
    }
    if let Some(hint) = hint {
        block = block.title_bottom(Line::from(hint).right_aligned());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_widget_body(frame, inner, record, data);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match &app.mode {
        Mode::AddWidget(_) => "[Tab] Kind  [Enter] Add  [Esc] Cancel".to_string(),
        Mode::WidgetList { .. } => "[j/k] Select  [Enter] Show/Hide  [Esc] Close".to_string(),
        Mode::UserPicker { .. } => "[j/k] Select  [Enter] Switch  [Esc] Close".to_string(),
        Mode::Dashboard if app.overlay.is_active() => {
            let kind = app.overlay.widget().and_then(|id| app.store().get(id)).map(|r| r.kind);
            with_content_keys(FOOTER_FULLSCREEN, kind)
        }
        Mode::Dashboard => match app.focused_record() {
            Some(record) => with_content_keys(FOOTER_FOCUSED, Some(record.kind)),
            None => FOOTER_IDLE.to_string(),
        },
    };
    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::DarkGray))];
    if !app.adapter.is_authoritative() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(UNSAVED_NOTE, Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn with_content_keys(base: &str, kind: Option<WidgetKind>) -> String {
    match kind {
        Some(WidgetKind::Chart) => format!("{}  [c] Chart type  [R] Refresh", base),
        Some(WidgetKind::Table) => format!("{}  [s] Sort  [R] Refresh", base),
        Some(WidgetKind::Stats) => format!("{}  [R] Refresh", base),
        None => base.to_string(),
    }
}

/// Rectangle of `width x height` centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_add_form(frame: &mut Frame, form: &AddWidgetForm, area: Rect) {
    let popup = centered_rect(50, 7, area);
    frame.render_widget(Clear, popup);
    let block = Block::bordered()
        .title(" Add Widget ")
        .border_style(Style::default().fg(Color::Cyan));
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}_", form.title)),
        ]),
        Line::from(vec![
            Span::styled("Kind:  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("< {} >", form.kind.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
    ];
    if !form.is_valid() {
        lines.push(Line::from(Span::styled(
            "Title is required",
            Style::default().fg(Color::Yellow),
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn selectable(text: String, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text, style))
}

fn render_widget_list(frame: &mut Frame, app: &App, selected: usize, area: Rect) {
    let widgets = app.store().widgets();
    let height = widgets.len().max(1) as u16 + 2;
    let popup = centered_rect(44, height, area);
    frame.render_widget(Clear, popup);
    let block = Block::bordered()
        .title(" Widgets ")
        .border_style(Style::default().fg(Color::Cyan));
    let lines: Vec<Line> = if widgets.is_empty() {
        vec![Line::from(Span::styled(
            "No widgets",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        widgets
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mark = if record.visible { "x" } else { " " };
                selectable(
                    format!("[{}] {} ({})", mark, record.title, record.kind.label()),
                    i == selected,
                )
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_user_picker(frame: &mut Frame, app: &App, selected: usize, area: Rect) {
    let popup = centered_rect(50, USERS.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    let block = Block::bordered()
        .title(" Switch User ")
        .border_style(Style::default().fg(Color::Cyan));
    let current = app.store().user_id();
    let lines: Vec<Line> = USERS
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let mark = if user.id == current { "●" } else { " " };
            selectable(
                format!("{} {}  {}  {}", mark, user.name, user.email, user.role),
                i == selected,
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Active notifications stacked upward from the bottom-right of `area`,
/// newest at the bottom.
fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.notifications.active();
    let mut bottom = area.y + area.height;
    for entry in active.iter().rev() {
        if bottom <= area.y {
            break;
        }
        let (symbol, color) = match entry.notification.kind {
            NotificationKind::Success => ("✓", Color::Green),
            NotificationKind::Error => ("✗", Color::Red),
            NotificationKind::Info => ("i", Color::Blue),
        };
        let text = format!(" {} {} ", symbol, entry.notification.message);
        let width = (text.chars().count() as u16).min(area.width);
        bottom -= 1;
        let rect = Rect::new(area.x + area.width - width, bottom, width, 1);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color)))),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Handle;
    use crate::notify::{Notification, Notifier};
    use crate::tui::event::Action;
    use crate::tui::test_utils::{
        assert_fg_color, find_row_with_text, make_app, make_default_app, render_app_to_buffer,
        row_contains, row_text,
    };

    #[test]
    fn header_shows_user_and_breakpoint() {
        let mut app = make_default_app();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        let header = row_text(&buffer, 0);
        assert!(header.starts_with(HEADER_TEXT));
        assert!(header.contains("John Doe (admin)"));
        assert!(header.contains("lg · 12 cols"));
    }

    #[test]
    fn default_widgets_render_at_their_cells() {
        let mut app = make_default_app();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        // Row 0 of the grid starts right below the header
        assert!(row_contains(&buffer, 1, "Recent Customers"));
        assert!(row_contains(&buffer, 1, "Monthly Revenue"));
        // Row 2 of the grid, five lines per row
        assert_eq!(find_row_with_text(&buffer, "Sales Trends"), Some(11));
        assert_eq!(find_row_with_text(&buffer, "Key Metrics"), Some(11));
    }

    #[test]
    fn chart_title_shows_chart_type() {
        let mut app = make_default_app();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(row_contains(&buffer, 1, " bar "));
        assert!(row_contains(&buffer, 11, " line "));
        assert!(row_contains(&buffer, 11, " pie "));
    }

    #[test]
    fn unfetched_widgets_show_loading() {
        let mut app = make_default_app();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(find_row_with_text(&buffer, "Loading...").is_some());
    }

    #[test]
    fn focused_widget_border_is_cyan() {
        let mut app = make_default_app();
        app.focused = Some("widget1".to_string());
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert_fg_color(&buffer, 0, 1, Color::Cyan);
        assert_fg_color(&buffer, 65, 1, Color::DarkGray);
    }

    #[test]
    fn dragged_widget_border_is_yellow() {
        let mut app = make_default_app();
        render_app_to_buffer(&mut app, 130, 40);
        assert!(app
            .adapter
            .drag_start(app.session.store(), "widget2", Handle::DragBar));
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert_fg_color(&buffer, 65, 1, Color::Yellow);
    }

    #[test]
    fn fullscreen_hides_the_grid() {
        let mut app = make_default_app();
        app.apply_action(Action::Fullscreen("widget5".to_string()));
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(row_contains(&buffer, 1, "Key Metrics"));
        assert!(find_row_with_text(&buffer, "Recent Customers").is_none());
        assert!(find_row_with_text(&buffer, "exit fullscreen").is_some());
    }

    #[test]
    fn empty_dashboard_shows_hint() {
        let mut app = make_app(Vec::new());
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(find_row_with_text(&buffer, "No widgets to show").is_some());
    }

    #[test]
    fn narrow_terminal_notes_unsaved_layout() {
        let mut app = make_default_app();
        let buffer = render_app_to_buffer(&mut app, 99, 40);
        assert!(row_text(&buffer, 0).contains("sm · 6 cols"));
        assert!(row_contains(&buffer, 39, UNSAVED_NOTE));
    }

    #[test]
    fn footer_lists_content_keys_for_focused_table() {
        let mut app = make_default_app();
        app.focused = Some("widget1".to_string());
        let buffer = render_app_to_buffer(&mut app, 200, 40);
        assert!(row_contains(&buffer, 39, "[s] Sort"));
    }

    #[test]
    fn add_form_popup_renders() {
        let mut app = make_default_app();
        app.open_add_form();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(find_row_with_text(&buffer, "Add Widget").is_some());
        assert!(find_row_with_text(&buffer, "Title is required").is_some());
        assert!(find_row_with_text(&buffer, "< Data Table >").is_some());
    }

    #[test]
    fn widget_list_marks_hidden_widgets() {
        let mut app = make_default_app();
        app.apply_action(Action::ToggleVisibility("widget3".to_string()));
        app.open_widget_list();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(find_row_with_text(&buffer, "[ ] Sales Trends").is_some());
        assert!(find_row_with_text(&buffer, "[x] Key Metrics").is_some());
    }

    #[test]
    fn user_picker_marks_current_user() {
        let mut app = make_default_app();
        app.open_user_picker();
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        assert!(find_row_with_text(&buffer, "● John Doe").is_some());
        assert!(find_row_with_text(&buffer, "Jane Smith").is_some());
    }

    #[test]
    fn notifications_render_bottom_right() {
        let mut app = make_default_app();
        app.notifications.show(Notification::error("Save failed"));
        let buffer = render_app_to_buffer(&mut app, 130, 40);
        let row = find_row_with_text(&buffer, "✗ Save failed").expect("notification shown");
        assert_eq!(row, 38);
        assert!(row_text(&buffer, row).trim_end().ends_with("Save failed"));
    }
}
