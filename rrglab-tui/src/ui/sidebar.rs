//! Right-hand column: legend in ranking order and a details box.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use rrglab_core::StrengthBand;
use rrglab_core::render::{Marker, Tooltip};

use crate::app::AppState;
use crate::theme;

/// Markers summarised in the details box when nothing is hovered or selected.
const PREVIEW_COUNT: usize = 3;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(9)])
        .split(area);

    render_legend(f, chunks[0], app);
    render_details(f, chunks[1], app);
}

fn render_legend(f: &mut Frame, area: Rect, app: &AppState) {
    let scene = &app.scene;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(format!(" Legend ({}) ", scene.legend.len()))
        .title_style(theme::panel_title(false));

    let mut items: Vec<ListItem> = scene
        .legend
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let x = scene.markers.get(i).map(|m| m.position.x).unwrap_or(f64::NAN);
            let band = StrengthBand::of(x);
            let line = Line::from(vec![
                Span::styled("● ", Style::default().fg(theme::series(&entry.color))),
                Span::styled(format!("{:<18}", truncate(&entry.name, 18)), theme::text()),
                Span::styled(format!("{x:>7.2} "), Style::default().fg(theme::strength(band))),
                Span::styled(
                    entry.quadrant.label(),
                    Style::default().fg(theme::quadrant(entry.quadrant)),
                ),
            ]);
            let item = ListItem::new(line);
            if app.cursor == Some(i) {
                item.style(theme::highlight())
            } else {
                item
            }
        })
        .collect();

    if scene.dropped > 0 {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("+{} more not shown (limit {})", scene.dropped, rrglab_core::MAX_VISIBLE),
            theme::warning(),
        ))));
    }

    f.render_widget(List::new(items).block(block), area);
}

fn render_details(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Details ")
        .title_style(theme::panel_title(false));

    let state = app.controller.state();
    let selected = state
        .selected
        .as_ref()
        .and_then(|id| app.scene.marker_index(id))
        .and_then(|i| app.scene.markers.get(i));

    let lines = match (&state.hovered, selected) {
        (Some(tip), _) => tooltip_lines(tip),
        (None, Some(marker)) => marker_lines(marker),
        (None, None) => app
            .scene
            .markers
            .iter()
            .take(PREVIEW_COUNT)
            .map(|m| {
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(theme::series(&m.color))),
                    Span::styled(truncate(&m.display_name, 14), theme::text()),
                    Span::styled(
                        format!(" {:.2}/{:.2}", m.position.x, m.position.y),
                        theme::secondary(),
                    ),
                ])
            })
            .collect(),
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn tooltip_lines(tip: &Tooltip) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(tip.display_name.clone(), theme::accent())),
        Line::from(format!("RS-Ratio:    {:.2}", tip.x)),
        Line::from(format!("RS-Momentum: {:.2}", tip.y)),
        Line::from(Span::styled(format!("Date: {}", tip.date), theme::muted())),
    ]
}

fn marker_lines(marker: &Marker) -> Vec<Line<'static>> {
    let band = StrengthBand::of(marker.position.x);
    let mut lines = vec![
        Line::from(Span::styled(marker.display_name.clone(), theme::accent())),
        Line::from(Span::styled(format!("{}", marker.entity_id), theme::muted())),
        Line::from(Span::styled(
            marker.quadrant.label(),
            Style::default().fg(theme::quadrant(marker.quadrant)),
        )),
        Line::from(vec![
            Span::raw(format!("RS-Ratio {:.2} ", marker.position.x)),
            Span::styled(format!("({})", band.label()), Style::default().fg(theme::strength(band))),
        ]),
        Line::from(format!("RS-Momentum {:.2}", marker.position.y)),
    ];
    if let Some(industry) = &marker.industry {
        lines.push(Line::from(Span::styled(format!("Industry: {industry}"), theme::secondary())));
    }
    lines
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Banks", 18), "Banks");
        assert_eq!(truncate("Construction & Materials", 10), "Construct…");
        assert_eq!(truncate("Construc…", 9).chars().count(), 9);
    }
}
