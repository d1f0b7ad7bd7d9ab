//! Top-level UI layout: header, chart with sidebar, status bar.

pub mod help;
pub mod rrg_chart;
pub mod sidebar;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, rows[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(rows[1]);
    rrg_chart::render(f, body[0], app);
    sidebar::render(f, body[1], app);

    status_bar::render(f, rows[2], app);

    if app.show_help {
        help::render(f, centered_rect(70, 70, rows[1]));
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let state = app.controller.state();
    let as_of = app
        .repository
        .get(app.timeframe)
        .and_then(|ds| ds.rrg_date)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());

    let sep = || Span::styled(" | ", theme::muted());
    let mut spans = vec![
        Span::styled(" RRGLab", theme::accent()),
        sep(),
        Span::styled(app.timeframe.code(), theme::text()),
        sep(),
        Span::styled(state.kind.label(), theme::text()),
        sep(),
        Span::styled(state.selection_mode.to_string(), theme::text()),
        sep(),
        Span::styled(format!("trail {}", state.trail_length), theme::secondary()),
        sep(),
        Span::styled(format!("zoom {:.2}x", state.zoom.get()), theme::secondary()),
        sep(),
        Span::styled(format!("as of {as_of}"), theme::muted()),
    ];
    if app.is_loading() {
        spans.push(sep());
        spans.push(Span::styled("loading...", theme::warning()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
