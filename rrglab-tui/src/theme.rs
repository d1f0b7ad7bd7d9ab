//! Colour tokens for the RRGLab TUI.
//!
//! Chrome uses a fixed dark palette. Data colours come from the engine:
//! quadrant tints from [`Quadrant::tint`], series colours from the HSL value
//! assigned to each visible entity.

use ratatui::style::{Color, Modifier, Style};

use rrglab_core::render::SeriesColor;
use rrglab_core::{Quadrant, StrengthBand};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 220, 220);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEGATIVE: Color = Color::Rgb(239, 68, 68);
pub const MUTED: Color = Color::Rgb(110, 118, 135);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

const BACKGROUND_RGB: (u8, u8, u8) = (18, 18, 20);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn highlight() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn panel_title(active: bool) -> Style {
    let style = Style::default().fg(TEXT_PRIMARY);
    if active {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub fn quadrant(q: Quadrant) -> Color {
    rgb(q.tint())
}

pub fn series(color: &SeriesColor) -> Color {
    rgb(color.to_rgb())
}

/// Series colour faded toward the background. Terminals have no alpha, so
/// opacity is emulated by linear blending.
pub fn faded(color: &SeriesColor, opacity: f64) -> Color {
    rgb(blend(color.to_rgb(), BACKGROUND_RGB, opacity))
}

fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: f64) -> (u8, u8, u8) {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * a).round() as u8;
    (mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

/// RS-Ratio strength colouring for the legend.
pub fn strength(band: StrengthBand) -> Color {
    match band {
        StrengthBand::VeryStrong => Color::Rgb(21, 128, 61),
        StrengthBand::Strong => Color::Rgb(22, 163, 74),
        StrengthBand::SlightlyStrong => Color::Rgb(34, 197, 94),
        StrengthBand::Neutral => Color::Rgb(234, 179, 8),
        StrengthBand::SlightlyWeak => Color::Rgb(248, 113, 113),
        StrengthBand::Weak => Color::Rgb(239, 68, 68),
        StrengthBand::VeryWeak => Color::Rgb(185, 28, 28),
    }
}
