//! Rendering adapter: turns a selection into drawable primitives.
//!
//! A [`Scene`] is plain data. Painters (the ratatui chart, tests, anything
//! else) read it and report pointer activity back as [`Interaction`]s, which
//! the scene answers with at most one [`Response`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ColorConfig;
use crate::data::Dataset;
use crate::domain::{EntityId, EntityKind, RsPoint, Series};
use crate::quadrant::{self, Quadrant};
use crate::selection::Selection;
use crate::trail::{self, TrailLength};
use crate::viewport::{Region, Viewport};

/// Opacity of trail polylines relative to their marker.
pub const TRAIL_OPACITY: f64 = 0.4;

/// HSL colour. Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl SeriesColor {
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }

    /// CSS `hsl(...)` form, for exports.
    pub fn css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Colour for the `index`-th of `total` visible series.
///
/// Depends only on position in the ordered selection, never on the id, so
/// a given ranking always paints the same way.
pub fn assign_color(entity_id: &EntityId, index: usize, total: usize) -> SeriesColor {
    assign_color_with(&ColorConfig::default(), entity_id, index, total)
}

pub fn assign_color_with(
    config: &ColorConfig,
    _entity_id: &EntityId,
    index: usize,
    total: usize,
) -> SeriesColor {
    let hue = if total == 0 {
        0.0
    } else {
        360.0 * index as f64 / total as f64
    };
    SeriesColor {
        hue,
        saturation: config.saturation,
        lightness: config.lightness,
    }
}

/// Latest point of one visible entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub entity_id: EntityId,
    pub display_name: String,
    pub position: RsPoint,
    pub color: SeriesColor,
    /// Short on-chart label: ticker for symbols, display name otherwise.
    pub label: String,
    pub quadrant: Quadrant,
    /// Owning industry name, attached for symbols under a ranking.
    pub industry: Option<String>,
}

/// Recent history of one visible entity, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailPrimitive {
    pub entity_id: EntityId,
    pub color: SeriesColor,
    pub opacity: f64,
    pub points: Vec<RsPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub entity_id: EntityId,
    pub name: String,
    pub color: SeriesColor,
    pub quadrant: Quadrant,
}

/// Tinted background area behind one quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantArea {
    pub quadrant: Quadrant,
    pub region: Region,
    pub tint: (u8, u8, u8),
}

/// Something under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    Marker(usize),
    /// `trail` indexes `Scene::trails`, `point` the trail's points.
    TrailPoint { trail: usize, point: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    Enter(HitTarget),
    Leave,
    Click(HitTarget),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub entity_id: EntityId,
    pub display_name: String,
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    /// Where the tooltip points, in data coordinates.
    pub anchor: (f64, f64),
}

/// What the painter should do in reaction to an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    ShowTooltip(Tooltip),
    HideTooltip,
    Select(EntityId),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
    pub trails: Vec<TrailPrimitive>,
    pub legend: Vec<LegendEntry>,
    pub regions: Vec<QuadrantArea>,
    pub ticks: Vec<f64>,
    /// Series cut by the visible cap.
    pub dropped: usize,
}

impl Scene {
    /// Nothing to draw except the axes and quadrant backgrounds.
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            regions: regions(&viewport),
            ticks: viewport.ticks(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker_index(&self, id: &EntityId) -> Option<usize> {
        self.markers.iter().position(|m| &m.entity_id == id)
    }

    /// Tooltip for a hit target; `None` if the target is out of range.
    pub fn tooltip_for(&self, target: HitTarget) -> Option<Tooltip> {
        match target {
            HitTarget::Marker(i) => {
                let m = self.markers.get(i)?;
                Some(tooltip(&m.entity_id, &m.display_name, &m.position))
            }
            HitTarget::TrailPoint { trail, point } => {
                let t = self.trails.get(trail)?;
                let p = t.points.get(point)?;
                let name = self
                    .markers
                    .iter()
                    .find(|m| m.entity_id == t.entity_id)
                    .map(|m| m.display_name.as_str())
                    .unwrap_or(t.entity_id.as_str());
                Some(tooltip(&t.entity_id, name, p))
            }
        }
    }

    /// Answer a pointer interaction. Clicks on trail points do nothing.
    pub fn respond(&self, interaction: &Interaction) -> Option<Response> {
        match *interaction {
            Interaction::Enter(target) => self.tooltip_for(target).map(Response::ShowTooltip),
            Interaction::Leave => Some(Response::HideTooltip),
            Interaction::Click(HitTarget::Marker(i)) => self
                .markers
                .get(i)
                .map(|m| Response::Select(m.entity_id.clone())),
            Interaction::Click(HitTarget::TrailPoint { .. }) => None,
        }
    }
}

fn tooltip(id: &EntityId, name: &str, p: &RsPoint) -> Tooltip {
    Tooltip {
        entity_id: id.clone(),
        display_name: name.to_string(),
        x: p.x,
        y: p.y,
        date: p.date,
        anchor: (p.x, p.y),
    }
}

fn regions(viewport: &Viewport) -> Vec<QuadrantArea> {
    Quadrant::ALL
        .iter()
        .map(|&q| QuadrantArea {
            quadrant: q,
            region: viewport.quadrant_region(q),
            tint: q.tint(),
        })
        .collect()
}

/// Every point the scene will draw: trail points plus each latest point.
pub fn rendered_points<'a>(
    series: &'a [&'a Series],
    trail_length: TrailLength,
) -> impl Iterator<Item = &'a RsPoint> + 'a {
    series.iter().flat_map(move |s| {
        trail::window(s, trail_length).iter().chain(s.latest())
    })
}

/// Build the scene for an already computed viewport.
///
/// `dataset` is only consulted for the best-effort industry name on symbol
/// markers.
pub fn build_scene(
    selection: &Selection<'_>,
    trail_length: TrailLength,
    viewport: Viewport,
    dataset: &Dataset,
    colors: &ColorConfig,
) -> Scene {
    let total = selection.series.len();
    let attach_industry = selection.kind == EntityKind::Symbol && selection.mode.is_ranking();

    let mut scene = Scene::empty(viewport);
    scene.dropped = selection.dropped;

    for (index, series) in selection.series.iter().enumerate() {
        let Some(latest) = series.latest() else {
            continue;
        };
        let quadrant = match quadrant::classify(latest) {
            Ok(q) => q,
            Err(e) => {
                warn!(entity = %series.id(), "skipping marker: {e}");
                continue;
            }
        };
        let color = assign_color_with(colors, series.id(), index, total);
        let label = match series.entity.kind {
            EntityKind::Symbol => series.id().to_string(),
            _ => series.name().to_string(),
        };
        let industry = if attach_industry {
            dataset.industry_of(series.id()).map(|s| s.name)
        } else {
            None
        };

        let trail_points = trail::window(series, trail_length);
        if !trail_points.is_empty() {
            scene.trails.push(TrailPrimitive {
                entity_id: series.id().clone(),
                color,
                opacity: TRAIL_OPACITY,
                points: trail_points.to_vec(),
            });
        }

        scene.legend.push(LegendEntry {
            entity_id: series.id().clone(),
            name: series.name().to_string(),
            color,
            quadrant,
        });
        scene.markers.push(Marker {
            entity_id: series.id().clone(),
            display_name: series.name().to_string(),
            position: *latest,
            color,
            label,
            quadrant,
            industry,
        });
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timeframe;
    use crate::selection::{SelectionMode, select};
    use crate::viewport;
    use proptest::prelude::*;

    const SNAPSHOT: &str = r#"{
        "industries": [
            {"id": "BANK", "name": "Banks", "tail": [
                {"x": 99.0, "y": 98.0, "date": "2024-05-29"},
                {"x": 100.5, "y": 99.5, "date": "2024-05-30"},
                {"x": 101.0, "y": 100.5, "date": "2024-05-31"},
                {"x": 102.0, "y": 101.0, "date": "2024-06-03"}
            ]},
            {"id": "STEEL", "name": "Steel", "tail": [
                {"x": 97.0, "y": 103.0, "date": "2024-06-03"}
            ]}
        ],
        "symbols": [
            {"symbol": "VCB", "name": "Vietcombank", "primaryIndustryId": "BANK", "tail": [
                {"x": 104.0, "y": 97.0, "date": "2024-06-03"}
            ]},
            {"symbol": "ORPH", "name": "Orphan", "primaryIndustryId": "GONE", "tail": [
                {"x": 105.0, "y": 99.0, "date": "2024-06-03"}
            ]}
        ]
    }"#;

    fn dataset() -> Dataset {
        Dataset::from_json(Timeframe::Daily, SNAPSHOT.as_bytes()).unwrap()
    }

    fn scene_for(ds: &Dataset, kind: EntityKind, mode: SelectionMode, trail: TrailLength) -> Scene {
        let sel = select(ds, kind, &mode).unwrap();
        let vp = viewport::compute(rendered_points(&sel.series, trail), 1.0);
        build_scene(&sel, trail, vp, ds, &ColorConfig::default())
    }

    #[test]
    fn hue_from_position() {
        let id = EntityId::new("A");
        assert_eq!(assign_color(&id, 0, 4).hue, 0.0);
        assert_eq!(assign_color(&id, 1, 4).hue, 90.0);
        assert_eq!(assign_color(&id, 3, 4).hue, 270.0);
        assert_eq!(assign_color(&id, 0, 0).hue, 0.0);
    }

    #[test]
    fn color_ignores_id() {
        assert_eq!(
            assign_color(&EntityId::new("A"), 2, 5),
            assign_color(&EntityId::new("B"), 2, 5)
        );
    }

    #[test]
    fn hsl_to_rgb() {
        let red = SeriesColor { hue: 0.0, saturation: 70.0, lightness: 50.0 };
        assert_eq!(red.to_rgb(), (217, 38, 38));
        let grey = SeriesColor { hue: 200.0, saturation: 0.0, lightness: 50.0 };
        assert_eq!(grey.to_rgb(), (128, 128, 128));
        let blue = SeriesColor { hue: 240.0, saturation: 100.0, lightness: 50.0 };
        assert_eq!(blue.to_rgb(), (0, 0, 255));
        assert_eq!(red.css(), "hsl(0, 70%, 50%)");
    }

    #[test]
    fn markers_and_trails() {
        let ds = dataset();
        let scene = scene_for(&ds, EntityKind::Industry, SelectionMode::default(), TrailLength::Five);

        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.trails.len(), 2);
        assert_eq!(scene.legend.len(), 2);
        assert_eq!(scene.regions.len(), 4);

        let bank = &scene.markers[0];
        assert_eq!(bank.label, "Banks");
        assert_eq!(bank.quadrant, Quadrant::Leading);
        assert_eq!(bank.position.x, 102.0);

        let trail = &scene.trails[0];
        assert_eq!(trail.opacity, TRAIL_OPACITY);
        assert_eq!(trail.color, bank.color);
        assert_eq!(trail.points.len(), 4);
        assert!(trail.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn zero_trail_keeps_markers() {
        let ds = dataset();
        let scene = scene_for(&ds, EntityKind::Industry, SelectionMode::default(), TrailLength::None);
        assert!(scene.trails.is_empty());
        assert_eq!(scene.markers.len(), 2);
    }

    #[test]
    fn industry_attached_for_ranked_symbols() {
        let ds = dataset();
        let scene = scene_for(&ds, EntityKind::Symbol, SelectionMode::TopNByRatio(5), TrailLength::Ten);
        let orph = &scene.markers[0];
        assert_eq!(orph.label, "ORPH");
        assert_eq!(orph.industry, None);
        assert_eq!(scene.markers[1].industry.as_deref(), Some("Banks"));

        let by_membership = scene_for(&ds, EntityKind::Symbol, SelectionMode::default(), TrailLength::Ten);
        assert!(by_membership.markers.iter().all(|m| m.industry.is_none()));
    }

    #[test]
    fn enter_marker_and_trail_point_give_tooltip() {
        let ds = dataset();
        let scene = scene_for(&ds, EntityKind::Industry, SelectionMode::default(), TrailLength::Ten);

        let Some(Response::ShowTooltip(tip)) = scene.respond(&Interaction::Enter(HitTarget::Marker(1))) else {
            panic!("expected tooltip");
        };
        assert_eq!(tip.display_name, "Steel");
        assert_eq!((tip.x, tip.y), (97.0, 103.0));

        let target = HitTarget::TrailPoint { trail: 0, point: 0 };
        let Some(Response::ShowTooltip(tip)) = scene.respond(&Interaction::Enter(target)) else {
            panic!("expected tooltip");
        };
        assert_eq!(tip.display_name, "Banks");
        assert_eq!(tip.date, NaiveDate::from_ymd_opt(2024, 5, 29).unwrap());

        assert_eq!(scene.respond(&Interaction::Leave), Some(Response::HideTooltip));
        assert_eq!(scene.respond(&Interaction::Enter(HitTarget::Marker(9))), None);
    }

    #[test]
    fn click_selects_marker_only() {
        let ds = dataset();
        let scene = scene_for(&ds, EntityKind::Industry, SelectionMode::default(), TrailLength::Ten);
        assert_eq!(
            scene.respond(&Interaction::Click(HitTarget::Marker(0))),
            Some(Response::Select(EntityId::new("BANK")))
        );
        assert_eq!(
            scene.respond(&Interaction::Click(HitTarget::TrailPoint { trail: 0, point: 1 })),
            None
        );
    }

    #[test]
    fn empty_scene_has_axes() {
        let scene = Scene::empty(Viewport::fallback());
        assert!(scene.is_empty());
        assert_eq!(scene.ticks, vec![90.0, 95.0, 100.0, 105.0, 110.0]);
        assert_eq!(scene.regions.len(), 4);
    }

    proptest! {
        #[test]
        fn distinct_indices_distinct_hues(total in 1usize..=50, a in 0usize..50, b in 0usize..50) {
            prop_assume!(a < total && b < total && a != b);
            let id = EntityId::new("X");
            prop_assert_ne!(assign_color(&id, a, total).hue, assign_color(&id, b, total).hue);
        }

        #[test]
        fn rgb_channels_deterministic(hue in 0.0..360.0_f64) {
            let c = SeriesColor { hue, saturation: 70.0, lightness: 50.0 };
            prop_assert_eq!(c.to_rgb(), c.to_rgb());
        }
    }
}
