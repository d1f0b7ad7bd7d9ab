//! The rotation graph itself: quadrants, neutral crosshair, trails, markers.
//!
//! Drawn on a ratatui `Canvas` in data coordinates, so the engine's viewport
//! maps straight onto the canvas bounds.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{self, Canvas, Context};
use ratatui::widgets::{Block, Borders, Paragraph};

use rrglab_core::render::Scene;
use rrglab_core::{EntityId, NEUTRAL};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let state = app.controller.state();
    let outside = app
        .scene
        .markers
        .iter()
        .filter(|m| !app.scene.viewport.contains(&m.position))
        .count();
    let mut title = format!(" Relative Rotation: {} ({}) ", state.kind.label(), app.timeframe);
    if outside > 0 {
        title.push_str(&format!("- {outside} outside view "));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(title)
        .title_style(theme::panel_title(true));

    if app.scene.is_empty() {
        render_empty(f, area, block, app);
        return;
    }

    let scene = &app.scene;
    let cursor = app.cursor;
    let selected = state.selected.as_ref();
    let chart = Canvas::default()
        .block(block)
        .background_color(theme::BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds(scene.viewport.domain_x)
        .y_bounds(scene.viewport.domain_y)
        .paint(move |ctx| paint(ctx, scene, cursor, selected));
    f.render_widget(chart, area);
}

fn render_empty(f: &mut Frame, area: Rect, block: Block, app: &AppState) {
    let message = if app.is_loading() {
        Span::styled(format!("Loading {} snapshot...", app.timeframe), theme::accent())
    } else if !app.repository.is_loaded(app.timeframe) {
        Span::styled(
            format!("No data for {}. Press r to retry.", app.timeframe),
            theme::negative(),
        )
    } else {
        Span::styled(
            "No entities match the current selection. Press m or [ ] to change it.",
            theme::muted(),
        )
    };
    let lines = vec![Line::from(""), Line::from(""), Line::from(message)];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn paint(ctx: &mut Context, scene: &Scene, cursor: Option<usize>, selected: Option<&EntityId>) {
    let [lo, hi] = scene.viewport.domain_x;
    let span = hi - lo;

    // Layer 1: quadrant names in the outer corners, crosshair, ticks.
    for area in &scene.regions {
        let q = area.quadrant;
        let x = if q.outperforming() {
            area.region.x[1] - span * 0.15
        } else {
            area.region.x[0] + span * 0.02
        };
        let y = if q.improving_momentum() {
            area.region.y[1] - span * 0.03
        } else {
            area.region.y[0] + span * 0.08
        };
        ctx.print(
            x,
            y,
            Span::styled(q.label(), Style::default().fg(theme::quadrant(q)).add_modifier(Modifier::BOLD)),
        );
    }
    ctx.draw(&canvas::Line {
        x1: lo,
        y1: NEUTRAL,
        x2: hi,
        y2: NEUTRAL,
        color: theme::MUTED,
    });
    ctx.draw(&canvas::Line {
        x1: NEUTRAL,
        y1: lo,
        x2: NEUTRAL,
        y2: hi,
        color: theme::MUTED,
    });
    for &t in scene.ticks.iter().skip(1) {
        ctx.print(t, lo, Span::styled(format!("{t:.1}"), theme::muted()));
        ctx.print(lo, t, Span::styled(format!("{t:.1}"), theme::muted()));
    }
    ctx.layer();

    // Layer 2: trails.
    for trail in &scene.trails {
        let color = theme::faded(&trail.color, trail.opacity);
        for pair in trail.points.windows(2) {
            ctx.draw(&canvas::Line {
                x1: pair[0].x,
                y1: pair[0].y,
                x2: pair[1].x,
                y2: pair[1].y,
                color,
            });
        }
    }
    ctx.layer();

    // Layer 3: latest markers with labels. Zoomed-out-of-view markers are counted in the title.
    for (i, marker) in scene.markers.iter().enumerate() {
        if !scene.viewport.contains(&marker.position) {
            continue;
        }
        let color = theme::series(&marker.color);
        let emphasized = cursor == Some(i) || selected == Some(&marker.entity_id);
        let style = if emphasized {
            Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(color)
        };
        ctx.print(
            marker.position.x,
            marker.position.y,
            Span::styled(format!("● {}", marker.label), style),
        );
    }
}
