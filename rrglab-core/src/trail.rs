//! Trail windowing: the bounded recent history drawn behind each marker.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{RsPoint, Series};
use crate::error::RrgError;

/// Allowed trail lengths: 0 (none), 5, 10, 21.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum TrailLength {
    None,
    Five,
    #[default]
    Ten,
    TwentyOne,
}

impl TrailLength {
    pub const ALL: [TrailLength; 4] = [
        TrailLength::None,
        TrailLength::Five,
        TrailLength::Ten,
        TrailLength::TwentyOne,
    ];

    pub fn get(self) -> usize {
        match self {
            TrailLength::None => 0,
            TrailLength::Five => 5,
            TrailLength::Ten => 10,
            TrailLength::TwentyOne => 21,
        }
    }

    pub fn next(self) -> TrailLength {
        match self {
            TrailLength::None => TrailLength::Five,
            TrailLength::Five => TrailLength::Ten,
            TrailLength::Ten => TrailLength::TwentyOne,
            TrailLength::TwentyOne => TrailLength::None,
        }
    }
}

impl TryFrom<usize> for TrailLength {
    type Error = RrgError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(TrailLength::None),
            5 => Ok(TrailLength::Five),
            10 => Ok(TrailLength::Ten),
            21 => Ok(TrailLength::TwentyOne),
            other => Err(RrgError::InvalidParameter(format!(
                "trail length must be one of 0, 5, 10, 21 (got {other})"
            ))),
        }
    }
}

impl From<TrailLength> for usize {
    fn from(t: TrailLength) -> usize {
        t.get()
    }
}

impl fmt::Display for TrailLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailLength::None => f.write_str("none"),
            other => write!(f, "{}", other.get()),
        }
    }
}

/// Last `len` points of `points`, oldest first. Borrowed, never copied.
pub fn window_points(points: &[RsPoint], len: TrailLength) -> &[RsPoint] {
    let n = len.get().min(points.len());
    &points[points.len() - n..]
}

/// Trail for a series. The latest marker is `series.latest()` regardless of
/// the trail length.
pub fn window(series: &Series, len: TrailLength) -> &[RsPoint] {
    window_points(&series.points, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{Entity, EntityId, EntityKind};

    fn series(n: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = (0..n)
            .map(|i| {
                RsPoint::new(
                    start + chrono::Days::new(i as u64),
                    100.0 + i as f64,
                    100.0 - i as f64,
                )
            })
            .collect();
        Series::new(
            Entity {
                id: EntityId::new("STEEL"),
                display_name: "Steel".into(),
                kind: EntityKind::Industry,
                membership: None,
            },
            points,
        )
    }

    #[test]
    fn zero_trail_keeps_latest() {
        let s = series(8);
        assert!(window(&s, TrailLength::None).is_empty());
        assert_eq!(s.latest().unwrap().x, 107.0);
    }

    #[test]
    fn window_is_chronological_suffix() {
        let s = series(30);
        let w = window(&s, TrailLength::Ten);
        assert_eq!(w.len(), 10);
        assert_eq!(w[0].x, 120.0);
        assert_eq!(w[9].x, 129.0);
        assert!(w.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn short_history_returns_everything() {
        let s = series(3);
        assert_eq!(window(&s, TrailLength::TwentyOne).len(), 3);
    }

    #[test]
    fn source_untouched() {
        let s = series(12);
        let before = s.clone();
        let _ = window(&s, TrailLength::Five);
        assert_eq!(s, before);
    }

    #[test]
    fn only_allowed_lengths_parse() {
        for n in [0usize, 5, 10, 21] {
            assert_eq!(TrailLength::try_from(n).unwrap().get(), n);
        }
        for n in [1usize, 4, 11, 20, 22, 100] {
            assert!(matches!(
                TrailLength::try_from(n),
                Err(RrgError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn next_cycles() {
        assert_eq!(TrailLength::TwentyOne.next(), TrailLength::None);
        assert_eq!(TrailLength::None.next(), TrailLength::Five);
    }
}
