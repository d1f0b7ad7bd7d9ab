//! Viewport calculation: a square domain centred on the neutral value.
//!
//! `r = max(max|x-100|, max|y-100|) * 1.1 / zoom`, with `[90, 110]` on both
//! axes when there is nothing to show. Zoom arrives already clamped by the
//! view-state controller and is not clamped again here.

use serde::{Deserialize, Serialize};

use crate::domain::{NEUTRAL, RsPoint};
use crate::quadrant::Quadrant;

/// Radius used when there are no points (or all points sit exactly on 100).
pub const FALLBACK_RADIUS: f64 = 10.0;
/// Headroom factor around the outermost point.
pub const PADDING: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub domain_x: [f64; 2],
    pub domain_y: [f64; 2],
}

/// Axis-aligned rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Viewport {
    pub fn with_radius(r: f64) -> Self {
        let domain = [NEUTRAL - r, NEUTRAL + r];
        Self {
            domain_x: domain,
            domain_y: domain,
        }
    }

    pub fn fallback() -> Self {
        Self::with_radius(FALLBACK_RADIUS)
    }

    pub fn radius(&self) -> f64 {
        self.domain_x[1] - NEUTRAL
    }

    pub fn contains(&self, point: &RsPoint) -> bool {
        point.x >= self.domain_x[0]
            && point.x <= self.domain_x[1]
            && point.y >= self.domain_y[0]
            && point.y <= self.domain_y[1]
    }

    /// Axis ticks: domain ends plus 95/100/105 when they fall inside.
    pub fn ticks(&self) -> Vec<f64> {
        let [lo, hi] = self.domain_x;
        let mut ticks = vec![lo];
        ticks.extend([95.0, NEUTRAL, 105.0].into_iter().filter(|t| *t > lo && *t < hi));
        ticks.push(hi);
        ticks
    }

    /// Background area for a quadrant within this viewport.
    pub fn quadrant_region(&self, quadrant: Quadrant) -> Region {
        let [x_lo, x_hi] = self.domain_x;
        let [y_lo, y_hi] = self.domain_y;
        let x = if quadrant.outperforming() {
            [NEUTRAL, x_hi]
        } else {
            [x_lo, NEUTRAL]
        };
        let y = if quadrant.improving_momentum() {
            [NEUTRAL, y_hi]
        } else {
            [y_lo, NEUTRAL]
        };
        Region { x, y }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Compute the viewport from every rendered point (latest markers and trails).
///
/// Non-finite points are skipped; they should never get this far.
pub fn compute<'a, I>(points: I, zoom: f64) -> Viewport
where
    I: IntoIterator<Item = &'a RsPoint>,
{
    let mut seen = false;
    let mut max_dev: f64 = 0.0;
    for p in points.into_iter().filter(|p| p.is_finite()) {
        seen = true;
        max_dev = max_dev.max(p.deviation());
    }
    if !seen || max_dev == 0.0 {
        return Viewport::fallback();
    }
    Viewport::with_radius(max_dev * PADDING / zoom)
}
