//! Key reference overlay.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme;

const KEYS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("Tab", "cycle industries / groups / symbols"),
    ("w", "toggle daily / weekly snapshot"),
    ("r", "reload current snapshot"),
    ("t", "cycle trail length (none, 5, 10, 21)"),
    ("m", "cycle selection: membership, top/bottom ratio, top/bottom momentum"),
    ("[ ]", "previous / next industry (symbols)"),
    ("+ - 0", "zoom in / out / reset"),
    ("j k", "move hover cursor across markers"),
    ("Enter", "select hovered entity"),
    ("Esc", "clear hover and selection"),
];

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from("")];
    for (key, what) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<7}"), theme::accent()),
            Span::styled(*what, theme::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  any key to close", theme::muted())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Keys ")
        .title_style(theme::panel_title(true));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
