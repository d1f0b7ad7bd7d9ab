//! Bottom status bar: last status/error message and key hints.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(" q:quit ?:help Tab:kind w:1D/1W t:trail m:mode", theme::muted()));
    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    if let Some(last) = app.error_history.front() {
        if app.error_history.len() > 1 {
            spans.push(Span::styled(
                format!(
                    "  ({} errors, last at {}, see log)",
                    app.error_history.len(),
                    last.timestamp.format("%H:%M:%S")
                ),
                theme::muted(),
            ));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
