//! Selection and ranking of visible series.
//!
//! One pure function, [`select`], dispatches on the [`SelectionMode`] tagged
//! union. Output is an explicit ordered list: colours are derived from
//! position in it, so ordering must be reproducible. Rankings break ties by
//! entity id ascending; membership filters keep snapshot order.
//!
//! Top/bottom rankings are global. They rank every entity of the requested
//! kind and ignore any industry membership that was active before.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::data::Dataset;
use crate::domain::{EntityId, EntityKind, Series};
use crate::error::RrgError;

/// Hard cap on visible series. Bounds the cost of the synchronous
/// recomputation that runs on every interaction.
pub const MAX_VISIBLE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SelectionMode {
    /// Industries/groups by id, or symbols by owning industry id.
    ByMembership(Vec<EntityId>),
    TopNByRatio(usize),
    BottomNByRatio(usize),
    TopNByMomentum(usize),
    BottomNByMomentum(usize),
}

/// Which coordinate of the latest point a ranking uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    Ratio,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDirection {
    Top,
    Bottom,
}

impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::ByMembership(Vec::new())
    }
}

impl SelectionMode {
    /// Mode a kind starts in (and is reset to when the kind changes).
    pub fn default_for(_kind: EntityKind) -> Self {
        SelectionMode::ByMembership(Vec::new())
    }

    /// `(metric, direction, n)` for ranking modes.
    pub fn ranking(&self) -> Option<(RankMetric, RankDirection, usize)> {
        match *self {
            SelectionMode::ByMembership(_) => None,
            SelectionMode::TopNByRatio(n) => Some((RankMetric::Ratio, RankDirection::Top, n)),
            SelectionMode::BottomNByRatio(n) => Some((RankMetric::Ratio, RankDirection::Bottom, n)),
            SelectionMode::TopNByMomentum(n) => Some((RankMetric::Momentum, RankDirection::Top, n)),
            SelectionMode::BottomNByMomentum(n) => {
                Some((RankMetric::Momentum, RankDirection::Bottom, n))
            }
        }
    }

    pub fn is_ranking(&self) -> bool {
        self.ranking().is_some()
    }

    /// Reject ranking counts of zero.
    pub fn validate(&self) -> Result<(), RrgError> {
        match self.ranking() {
            Some((_, _, 0)) => Err(RrgError::InvalidParameter(
                "ranking count must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Next mode in the interactive cycle:
    /// membership → top ratio → bottom ratio → top momentum → bottom momentum → membership.
    pub fn cycle(&self, n: usize) -> SelectionMode {
        match self {
            SelectionMode::ByMembership(_) => SelectionMode::TopNByRatio(n),
            SelectionMode::TopNByRatio(_) => SelectionMode::BottomNByRatio(n),
            SelectionMode::BottomNByRatio(_) => SelectionMode::TopNByMomentum(n),
            SelectionMode::TopNByMomentum(_) => SelectionMode::BottomNByMomentum(n),
            SelectionMode::BottomNByMomentum(_) => SelectionMode::ByMembership(Vec::new()),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::ByMembership(ids) if ids.is_empty() => f.write_str("By membership"),
            SelectionMode::ByMembership(ids) => {
                let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                write!(f, "By membership [{}]", names.join(", "))
            }
            SelectionMode::TopNByRatio(n) => write!(f, "Top {n} RS-Ratio"),
            SelectionMode::BottomNByRatio(n) => write!(f, "Bottom {n} RS-Ratio"),
            SelectionMode::TopNByMomentum(n) => write!(f, "Top {n} RS-Momentum"),
            SelectionMode::BottomNByMomentum(n) => write!(f, "Bottom {n} RS-Momentum"),
        }
    }
}

/// Ordered visible series plus what was cut.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub kind: EntityKind,
    pub mode: SelectionMode,
    /// Visible series, in colour-assignment order. At most `MAX_VISIBLE`.
    pub series: Vec<&'a Series>,
    /// Series removed by the `MAX_VISIBLE` cap.
    pub dropped: usize,
    /// Membership ids actually applied (the seeded industry for symbols).
    pub effective_membership: Vec<EntityId>,
}

impl<'a> Selection<'a> {
    pub fn empty(kind: EntityKind, mode: SelectionMode) -> Self {
        Self {
            kind,
            mode,
            series: Vec::new(),
            dropped: 0,
            effective_membership: Vec::new(),
        }
    }

    /// Nothing survived filtering. Rendered as an explicit empty state.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn was_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// Filter and order the series of `kind` according to `mode`.
pub fn select<'a>(
    dataset: &'a Dataset,
    kind: EntityKind,
    mode: &SelectionMode,
) -> Result<Selection<'a>, RrgError> {
    mode.validate()?;

    let candidates = dataset.series(kind);
    let (mut series, effective_membership) = match mode {
        SelectionMode::ByMembership(ids) => by_membership(dataset, kind, candidates, ids),
        _ => {
            // validate() guarantees a ranking here
            let (metric, direction, n) = mode
                .ranking()
                .ok_or_else(|| RrgError::InvalidParameter("expected ranking mode".into()))?;
            (rank(candidates, metric, direction, n), Vec::new())
        }
    };

    let dropped = series.len().saturating_sub(MAX_VISIBLE);
    series.truncate(MAX_VISIBLE);

    Ok(Selection {
        kind,
        mode: mode.clone(),
        series,
        dropped,
        effective_membership,
    })
}

fn by_membership<'a>(
    dataset: &'a Dataset,
    kind: EntityKind,
    candidates: &'a [Series],
    ids: &[EntityId],
) -> (Vec<&'a Series>, Vec<EntityId>) {
    match kind {
        EntityKind::Industry | EntityKind::Group => {
            let series = candidates
                .iter()
                .filter(|s| s.is_renderable())
                .filter(|s| ids.is_empty() || ids.contains(s.id()))
                .collect();
            (series, ids.to_vec())
        }
        EntityKind::Symbol => {
            // Never "all symbols": seed with the first industry instead.
            let effective: Vec<EntityId> = if ids.is_empty() {
                dataset.industries.first().map(|s| s.id().clone()).into_iter().collect()
            } else {
                ids.to_vec()
            };
            let series = candidates
                .iter()
                .filter(|s| s.is_renderable())
                .filter(|s| {
                    s.entity
                        .membership
                        .as_ref()
                        .is_some_and(|m| effective.contains(m))
                })
                .collect();
            (series, effective)
        }
    }
}

fn rank<'a>(
    candidates: &'a [Series],
    metric: RankMetric,
    direction: RankDirection,
    n: usize,
) -> Vec<&'a Series> {
    let mut keyed: Vec<(f64, &Series)> = candidates
        .iter()
        .filter_map(|s| {
            let latest = s.latest()?;
            let key = match metric {
                RankMetric::Ratio => latest.x,
                RankMetric::Momentum => latest.y,
            };
            Some((key, s))
        })
        .collect();

    keyed.sort_by(|(ka, a), (kb, b)| {
        let by_key = match direction {
            RankDirection::Top => kb.total_cmp(ka),
            RankDirection::Bottom => ka.total_cmp(kb),
        };
        match by_key {
            Ordering::Equal => a.id().cmp(b.id()),
            other => other,
        }
    });

    keyed.into_iter().take(n).map(|(_, s)| s).collect()
}
