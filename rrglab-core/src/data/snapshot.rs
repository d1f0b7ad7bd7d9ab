//! Snapshot wire format and the loaded, immutable `Dataset`.
//!
//! Wire format (JSON):
//! ```json
//! {
//!   "rrg_date": "2024-06-03",
//!   "tail_length": 21,
//!   "industries": [{"id": "BANK", "name": "Banks", "tail": [{"x": 101.2, "y": 99.8, "date": "2024-06-03"}]}],
//!   "groups":     [{"id": "VN30", "name": "VN30", "tail": []}],
//!   "symbols":    [{"symbol": "VCB", "name": "Vietcombank", "primaryIndustryId": "BANK", "tail": [...]}]
//! }
//! ```
//! Tails are chronological, last element is latest. A missing or empty tail is
//! legal. Points with a missing or non-finite coordinate are dropped with a
//! warning; the rest of the entity survives.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::{Entity, EntityId, EntityKind, RsPoint, Series, Timeframe};
use crate::error::RrgError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub rrg_date: Option<NaiveDate>,
    #[serde(default)]
    pub tail_length: Option<usize>,
    #[serde(default)]
    pub industries: Vec<RawSeries>,
    #[serde(default)]
    pub groups: Vec<RawSeries>,
    #[serde(default)]
    pub symbols: Vec<RawSymbol>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPoint {
    #[serde(default, deserialize_with = "coordinate")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    pub y: Option<f64>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSeries {
    #[serde(alias = "custom_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tail: Option<Vec<RawPoint>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSymbol {
    #[serde(alias = "id")]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "primaryIndustryId", alias = "industry")]
    pub primary_industry_id: Option<String>,
    #[serde(default)]
    pub tail: Option<Vec<RawPoint>>,
}

/// Lenient coordinate: numbers (of any magnitude) and numeric strings.
/// Anything unreadable or non-finite becomes `None` and the point is dropped
/// later instead of failing the whole snapshot.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

/// Id + display name, for pickers and legends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
}

/// One loaded snapshot. Read-only for the lifetime of its timeframe.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub timeframe: Timeframe,
    pub rrg_date: Option<NaiveDate>,
    pub tail_length: Option<usize>,
    pub industries: Vec<Series>,
    pub groups: Vec<Series>,
    pub symbols: Vec<Series>,
    /// blake3 hex digest of the raw snapshot bytes.
    pub digest: String,
    /// Points dropped at load time for non-finite coordinates.
    pub dropped_points: usize,
    industry_index: HashMap<EntityId, usize>,
}

impl Dataset {
    /// Parse snapshot bytes. Any parse failure is `DataUnavailable`.
    pub fn from_json(timeframe: Timeframe, bytes: &[u8]) -> Result<Self, RrgError> {
        let raw: RawSnapshot = serde_json::from_slice(bytes)
            .map_err(|e| RrgError::data_unavailable(timeframe, format!("malformed snapshot: {e}")))?;
        let digest = blake3::hash(bytes).to_hex().to_string();
        Ok(Self::from_raw(timeframe, raw, digest))
    }

    pub fn from_raw(timeframe: Timeframe, raw: RawSnapshot, digest: String) -> Self {
        let mut dropped = 0usize;

        let industries: Vec<Series> = raw
            .industries
            .into_iter()
            .map(|s| build_series(s.id, s.name, None, s.tail, EntityKind::Industry, &mut dropped))
            .collect();
        let groups: Vec<Series> = raw
            .groups
            .into_iter()
            .map(|s| build_series(s.id, s.name, None, s.tail, EntityKind::Group, &mut dropped))
            .collect();
        let symbols: Vec<Series> = raw
            .symbols
            .into_iter()
            .map(|s| {
                build_series(
                    s.symbol,
                    s.name,
                    s.primary_industry_id,
                    s.tail,
                    EntityKind::Symbol,
                    &mut dropped,
                )
            })
            .collect();

        let industry_index = industries
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id().clone(), i))
            .collect();

        debug!(
            %timeframe,
            industries = industries.len(),
            groups = groups.len(),
            symbols = symbols.len(),
            dropped_points = dropped,
            "snapshot parsed"
        );

        Self {
            timeframe,
            rrg_date: raw.rrg_date,
            tail_length: raw.tail_length,
            industries,
            groups,
            symbols,
            digest,
            dropped_points: dropped,
            industry_index,
        }
    }

    /// All series of a kind, in snapshot order.
    pub fn series(&self, kind: EntityKind) -> &[Series] {
        match kind {
            EntityKind::Industry => &self.industries,
            EntityKind::Group => &self.groups,
            EntityKind::Symbol => &self.symbols,
        }
    }

    /// Every industry, including those with no points.
    pub fn list_industries(&self) -> Vec<EntitySummary> {
        summaries(&self.industries)
    }

    /// Every group, including those with no points.
    pub fn list_groups(&self) -> Vec<EntitySummary> {
        summaries(&self.groups)
    }

    /// Symbols whose primary industry is one of `ids`. Empty `ids` lists all
    /// symbols; the ranking engine never passes an empty set for display.
    pub fn list_tickers_by_industry(&self, ids: &[EntityId]) -> Vec<&Series> {
        if ids.is_empty() {
            return self.symbols.iter().collect();
        }
        self.symbols
            .iter()
            .filter(|s| s.entity.membership.as_ref().is_some_and(|m| ids.contains(m)))
            .collect()
    }

    pub fn find(&self, kind: EntityKind, id: &EntityId) -> Option<&Series> {
        self.series(kind).iter().find(|s| s.id() == id)
    }

    /// Owning industry of a symbol, if both the symbol and its industry are known.
    pub fn industry_of(&self, symbol: &EntityId) -> Option<EntitySummary> {
        let series = self.find(EntityKind::Symbol, symbol)?;
        let industry_id = series.entity.membership.as_ref()?;
        let idx = *self.industry_index.get(industry_id)?;
        let industry = &self.industries[idx];
        Some(EntitySummary {
            id: industry.id().clone(),
            name: industry.name().to_string(),
        })
    }

    /// Total point count across all series.
    pub fn point_count(&self) -> usize {
        EntityKind::ALL
            .iter()
            .flat_map(|k| self.series(*k))
            .map(|s| s.points.len())
            .sum()
    }
}

fn summaries(series: &[Series]) -> Vec<EntitySummary> {
    series
        .iter()
        .map(|s| EntitySummary {
            id: s.id().clone(),
            name: s.name().to_string(),
        })
        .collect()
}

fn build_series(
    id: String,
    name: Option<String>,
    membership: Option<String>,
    tail: Option<Vec<RawPoint>>,
    kind: EntityKind,
    dropped: &mut usize,
) -> Series {
    let display_name = match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => id.clone(),
    };
    let mut points = Vec::new();
    for raw in tail.unwrap_or_default() {
        match (raw.x, raw.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                points.push(RsPoint::new(raw.date, x, y));
            }
            (x, y) => {
                *dropped += 1;
                let err = RrgError::InvalidPoint {
                    x: x.unwrap_or(f64::NAN),
                    y: y.unwrap_or(f64::NAN),
                };
                warn!(entity = %id, date = %raw.date, "dropping point: {err}");
            }
        }
    }
    Series::new(
        Entity {
            id: EntityId(id),
            display_name,
            kind,
            membership: match kind {
                EntityKind::Symbol => membership.map(EntityId),
                _ => None,
            },
        },
        points,
    )
}
