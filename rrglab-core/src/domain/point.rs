//! A single (RS-Ratio, RS-Momentum) observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Neutral value on both axes. Above it an entity outperforms (x) or improves (y).
pub const NEUTRAL: f64 = 100.0;

/// A single observation on the rotation graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsPoint {
    pub date: NaiveDate,
    /// RS-Ratio.
    pub x: f64,
    /// RS-Momentum.
    pub y: f64,
}

impl RsPoint {
    pub fn new(date: NaiveDate, x: f64, y: f64) -> Self {
        Self { date, x, y }
    }

    /// Both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Largest absolute distance from the neutral value on either axis.
    pub fn deviation(&self) -> f64 {
        (self.x - NEUTRAL).abs().max((self.y - NEUTRAL).abs())
    }
}
