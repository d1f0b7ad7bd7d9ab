//! Quadrant classification.
//!
//! Convention: a coordinate equal to 100 counts as the non-leading side on
//! both axes. `(100, 100)` is therefore Lagging, `(101, 100)` is Weakening
//! and `(100, 101)` is Improving. Every caller (markers, legends, CLI
//! summaries) goes through [`classify`], so there is exactly one rule.

use serde::{Deserialize, Serialize};

use crate::domain::{NEUTRAL, RsPoint};
use crate::error::RrgError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    Leading,
    Weakening,
    Lagging,
    Improving,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Leading,
        Quadrant::Weakening,
        Quadrant::Lagging,
        Quadrant::Improving,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Leading => "Leading",
            Quadrant::Weakening => "Weakening",
            Quadrant::Lagging => "Lagging",
            Quadrant::Improving => "Improving",
        }
    }

    /// Background tint for the quadrant area (RGB).
    pub fn tint(self) -> (u8, u8, u8) {
        match self {
            Quadrant::Leading => (16, 185, 129),
            Quadrant::Weakening => (245, 158, 11),
            Quadrant::Lagging => (239, 68, 68),
            Quadrant::Improving => (59, 130, 246),
        }
    }

    /// Whether the quadrant lies right of the vertical neutral line.
    pub fn outperforming(self) -> bool {
        matches!(self, Quadrant::Leading | Quadrant::Weakening)
    }

    /// Whether the quadrant lies above the horizontal neutral line.
    pub fn improving_momentum(self) -> bool {
        matches!(self, Quadrant::Leading | Quadrant::Improving)
    }
}

/// Classify from raw coordinates. Fails on non-finite input.
pub fn classify_xy(x: f64, y: f64) -> Result<Quadrant, RrgError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(RrgError::InvalidPoint { x, y });
    }
    let right = x > NEUTRAL;
    let up = y > NEUTRAL;
    Ok(match (right, up) {
        (true, true) => Quadrant::Leading,
        (true, false) => Quadrant::Weakening,
        (false, false) => Quadrant::Lagging,
        (false, true) => Quadrant::Improving,
    })
}

pub fn classify(point: &RsPoint) -> Result<Quadrant, RrgError> {
    classify_xy(point.x, point.y)
}

/// RS-Ratio strength band, used to colour tables and legends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrengthBand {
    VeryWeak,
    Weak,
    SlightlyWeak,
    Neutral,
    SlightlyStrong,
    Strong,
    VeryStrong,
}

impl StrengthBand {
    pub fn of(rs_ratio: f64) -> StrengthBand {
        match rs_ratio {
            r if r >= 110.0 => StrengthBand::VeryStrong,
            r if r >= 105.0 => StrengthBand::Strong,
            r if r > NEUTRAL => StrengthBand::SlightlyStrong,
            r if r == NEUTRAL => StrengthBand::Neutral,
            r if r >= 95.0 => StrengthBand::SlightlyWeak,
            r if r >= 90.0 => StrengthBand::Weak,
            _ => StrengthBand::VeryWeak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthBand::VeryStrong => "very strong",
            StrengthBand::Strong => "strong",
            StrengthBand::SlightlyStrong => "slightly strong",
            StrengthBand::Neutral => "neutral",
            StrengthBand::SlightlyWeak => "slightly weak",
            StrengthBand::Weak => "weak",
            StrengthBand::VeryWeak => "very weak",
        }
    }
}
