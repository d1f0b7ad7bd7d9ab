//! View-state controller.
//!
//! Owns the composite interaction state and turns it into a [`Scene`]. All
//! transitions are explicit methods; each one that changes something queues
//! a [`ViewEvent`] for whoever hosts the chart.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ColorConfig, EngineConfig};
use crate::data::{Dataset, EntitySummary, Repository};
use crate::domain::{EntityId, EntityKind, Timeframe};
use crate::error::RrgError;
use crate::render::{self, Interaction, Response, Scene, Tooltip};
use crate::selection::{self, SelectionMode};
use crate::trail::TrailLength;
use crate::viewport::{self, Viewport};

/// Zoom factor, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ZoomLevel(f64);

impl ZoomLevel {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 10.0;
    pub const STEP: f64 = 1.5;

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn zoomed_in(self) -> ZoomLevel {
        ZoomLevel((self.0 * Self::STEP).min(Self::MAX))
    }

    pub fn zoomed_out(self) -> ZoomLevel {
        ZoomLevel((self.0 / Self::STEP).max(Self::MIN))
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        ZoomLevel(Self::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub kind: EntityKind,
    pub trail_length: TrailLength,
    pub selection_mode: SelectionMode,
    pub zoom: ZoomLevel,
    pub hovered: Option<Tooltip>,
    pub selected: Option<EntityId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            kind: EntityKind::Industry,
            trail_length: TrailLength::Ten,
            selection_mode: SelectionMode::default_for(EntityKind::Industry),
            zoom: ZoomLevel::default(),
            hovered: None,
            selected: None,
        }
    }
}

/// Outward notification of a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Hover(Option<Tooltip>),
    Select(Option<EntityId>),
    ZoomChange(f64),
    TrailLengthChange(TrailLength),
    SelectionModeChange(SelectionMode),
    KindChange(EntityKind),
}

#[derive(Debug, Clone)]
pub struct ViewController {
    state: ViewState,
    colors: ColorConfig,
    ranking_count: usize,
    events: Vec<ViewEvent>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ViewController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: ViewState {
                trail_length: config.trail_length(),
                ..ViewState::default()
            },
            colors: config.color,
            ranking_count: config.ranking_count,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Switch entity kind. The selection mode resets to the kind's default
    /// and any selection or hover is cleared.
    pub fn set_kind(&mut self, kind: EntityKind) {
        if self.state.kind == kind {
            return;
        }
        self.state.kind = kind;
        self.events.push(ViewEvent::KindChange(kind));
        self.replace_mode(SelectionMode::default_for(kind));
        self.hover(None);
        self.select(None);
    }

    pub fn cycle_kind(&mut self) {
        self.set_kind(self.state.kind.next());
    }

    /// Accepts 0, 5, 10 or 21. Anything else leaves the state untouched.
    pub fn set_trail_length(&mut self, n: usize) -> Result<(), RrgError> {
        let len = TrailLength::try_from(n)?;
        if len != self.state.trail_length {
            self.state.trail_length = len;
            self.events.push(ViewEvent::TrailLengthChange(len));
        }
        Ok(())
    }

    pub fn cycle_trail_length(&mut self) {
        let len = self.state.trail_length.next();
        self.state.trail_length = len;
        self.events.push(ViewEvent::TrailLengthChange(len));
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> Result<(), RrgError> {
        mode.validate()?;
        self.replace_mode(mode);
        Ok(())
    }

    /// Step through membership and the four rankings, using the configured
    /// ranking count.
    pub fn cycle_selection_mode(&mut self) {
        let n = self.ranking_count.max(1);
        let next = self.state.selection_mode.cycle(n);
        self.replace_mode(next);
    }

    /// Move the symbol membership filter to the next/previous industry.
    /// Only meaningful for symbols; returns `false` when nothing changed.
    pub fn step_membership(&mut self, industries: &[EntitySummary], forward: bool) -> bool {
        if self.state.kind != EntityKind::Symbol || industries.is_empty() {
            return false;
        }
        let len = industries.len();
        // From a ranking there is no current industry: start before the first.
        let next = match &self.state.selection_mode {
            SelectionMode::ByMembership(ids) => {
                let current = ids
                    .first()
                    .and_then(|id| industries.iter().position(|s| &s.id == id))
                    .unwrap_or(0);
                if forward {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                }
            }
            _ if forward => 0,
            _ => len - 1,
        };
        self.replace_mode(SelectionMode::ByMembership(vec![industries[next].id.clone()]));
        true
    }

    /// A new mode replaces the visible set, so any hover refers to a stale
    /// marker and is dropped.
    fn replace_mode(&mut self, mode: SelectionMode) {
        if mode != self.state.selection_mode {
            debug!(%mode, "selection mode changed");
            self.state.selection_mode = mode.clone();
            self.events.push(ViewEvent::SelectionModeChange(mode));
            self.hover(None);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.state.zoom.zoomed_in());
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.state.zoom.zoomed_out());
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(ZoomLevel::default());
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        if zoom != self.state.zoom {
            self.state.zoom = zoom;
            self.events.push(ViewEvent::ZoomChange(zoom.get()));
        }
    }

    pub fn hover(&mut self, tooltip: Option<Tooltip>) {
        if tooltip != self.state.hovered {
            self.state.hovered = tooltip.clone();
            self.events.push(ViewEvent::Hover(tooltip));
        }
    }

    pub fn select(&mut self, entity: Option<EntityId>) {
        if entity != self.state.selected {
            self.state.selected = entity.clone();
            self.events.push(ViewEvent::Select(entity));
        }
    }

    /// Route an adapter interaction to `hover` / `select`.
    pub fn interact(&mut self, interaction: &Interaction, scene: &Scene) {
        match scene.respond(interaction) {
            Some(Response::ShowTooltip(tip)) => self.hover(Some(tip)),
            Some(Response::HideTooltip) => self.hover(None),
            Some(Response::Select(id)) => self.select(Some(id)),
            None => {}
        }
    }

    /// Full derivation for one loaded timeframe. A timeframe that is not
    /// loaded yields an empty scene on the fallback viewport.
    pub fn frame(&self, repository: &Repository, timeframe: Timeframe) -> Scene {
        match repository.get(timeframe) {
            Some(ds) => self.frame_dataset(ds),
            None => Scene::empty(Viewport::fallback()),
        }
    }

    pub fn frame_dataset(&self, dataset: &Dataset) -> Scene {
        let state = &self.state;
        let selection = match selection::select(dataset, state.kind, &state.selection_mode) {
            Ok(sel) => sel,
            Err(e) => {
                debug!("selection failed, drawing empty scene: {e}");
                return Scene::empty(Viewport::fallback());
            }
        };
        let viewport = viewport::compute(
            render::rendered_points(&selection.series, state.trail_length),
            state.zoom.get(),
        );
        render::build_scene(&selection, state.trail_length, viewport, dataset, &self.colors)
    }

    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;
    use crate::render::HitTarget;

    const SNAPSHOT: &str = r#"{
        "industries": [
            {"id": "BANK", "name": "Banks", "tail": [
                {"x": 101.0, "y": 99.0, "date": "2024-05-31"},
                {"x": 104.0, "y": 102.0, "date": "2024-06-03"}
            ]},
            {"id": "STEEL", "name": "Steel", "tail": [{"x": 96.0, "y": 98.0, "date": "2024-06-03"}]}
        ],
        "symbols": [
            {"symbol": "VCB", "primaryIndustryId": "BANK", "tail": [{"x": 102.0, "y": 101.0, "date": "2024-06-03"}]},
            {"symbol": "HPG", "primaryIndustryId": "STEEL", "tail": [{"x": 95.0, "y": 97.0, "date": "2024-06-03"}]}
        ]
    }"#;

    fn repo() -> Repository {
        let mut repo = Repository::new(MemorySource::new().with(Timeframe::Daily, SNAPSHOT));
        repo.load(Timeframe::Daily).unwrap();
        repo
    }

    #[test]
    fn defaults() {
        let c = ViewController::default();
        let s = c.state();
        assert_eq!(s.kind, EntityKind::Industry);
        assert_eq!(s.trail_length, TrailLength::Ten);
        assert_eq!(s.zoom.get(), 1.0);
        assert_eq!(s.selection_mode, SelectionMode::ByMembership(vec![]));
    }

    #[test]
    fn config_overrides_trail_length() {
        let config = EngineConfig {
            default_trail_length: 21,
            ..EngineConfig::default()
        };
        assert_eq!(ViewController::new(&config).state().trail_length, TrailLength::TwentyOne);
    }

    #[test]
    fn zoom_clamps_and_is_idempotent_at_bounds() {
        let mut c = ViewController::default();
        c.zoom_out();
        assert_eq!(c.state().zoom.get(), 1.0);
        assert!(c.drain_events().is_empty());

        for _ in 0..10 {
            c.zoom_in();
        }
        assert_eq!(c.state().zoom.get(), 10.0);
        let before = c.drain_events().len();
        c.zoom_in();
        assert_eq!(c.state().zoom.get(), 10.0);
        assert!(before > 0);
        assert!(c.drain_events().is_empty());

        c.reset_zoom();
        assert_eq!(c.state().zoom.get(), 1.0);
        assert_eq!(c.drain_events(), vec![ViewEvent::ZoomChange(1.0)]);
    }

    #[test]
    fn zoom_steps_by_one_and_a_half() {
        let mut c = ViewController::default();
        c.zoom_in();
        assert_eq!(c.state().zoom.get(), 1.5);
        c.zoom_in();
        assert_eq!(c.state().zoom.get(), 2.25);
        c.zoom_out();
        assert_eq!(c.state().zoom.get(), 1.5);
    }

    #[test]
    fn invalid_trail_length_keeps_state() {
        let mut c = ViewController::default();
        assert!(matches!(c.set_trail_length(7), Err(RrgError::InvalidParameter(_))));
        assert_eq!(c.state().trail_length, TrailLength::Ten);
        c.set_trail_length(21).unwrap();
        assert_eq!(c.state().trail_length, TrailLength::TwentyOne);
        assert_eq!(c.drain_events(), vec![ViewEvent::TrailLengthChange(TrailLength::TwentyOne)]);
    }

    #[test]
    fn invalid_ranking_count_rejected() {
        let mut c = ViewController::default();
        assert!(c.set_selection_mode(SelectionMode::TopNByRatio(0)).is_err());
        assert_eq!(c.state().selection_mode, SelectionMode::default());
    }

    #[test]
    fn set_kind_resets_mode() {
        let mut c = ViewController::default();
        c.set_selection_mode(SelectionMode::TopNByMomentum(5)).unwrap();
        c.select(Some("BANK".into()));
        c.drain_events();

        c.set_kind(EntityKind::Symbol);
        assert_eq!(c.state().selection_mode, SelectionMode::ByMembership(vec![]));
        assert_eq!(c.state().selected, None);
        let events = c.drain_events();
        assert!(events.contains(&ViewEvent::KindChange(EntityKind::Symbol)));
        assert!(events.contains(&ViewEvent::SelectionModeChange(SelectionMode::default())));
        assert!(events.contains(&ViewEvent::Select(None)));
    }

    #[test]
    fn frame_without_data_is_empty() {
        let c = ViewController::default();
        let repo = Repository::new(MemorySource::new());
        let scene = c.frame(&repo, Timeframe::Weekly);
        assert!(scene.is_empty());
        assert_eq!(scene.viewport, Viewport::fallback());
    }

    #[test]
    fn frame_derives_scene() {
        let c = ViewController::default();
        let scene = c.frame(&repo(), Timeframe::Daily);
        assert_eq!(scene.markers.len(), 2);
        // max deviation 4.0 (BANK x / STEEL x) * 1.1
        assert!((scene.viewport.radius() - 4.4).abs() < 1e-9);
    }

    #[test]
    fn zoom_shrinks_frame_viewport() {
        let mut c = ViewController::default();
        let repo = repo();
        let wide = c.frame(&repo, Timeframe::Daily).viewport.radius();
        c.zoom_in();
        let narrow = c.frame(&repo, Timeframe::Daily).viewport.radius();
        assert!(narrow < wide);
    }

    #[test]
    fn interact_routes_hover_and_click() {
        let mut c = ViewController::default();
        let scene = c.frame(&repo(), Timeframe::Daily);

        c.interact(&Interaction::Enter(HitTarget::Marker(0)), &scene);
        assert_eq!(c.state().hovered.as_ref().unwrap().display_name, "Banks");
        c.interact(&Interaction::Click(HitTarget::Marker(1)), &scene);
        assert_eq!(c.state().selected, Some(EntityId::new("STEEL")));
        assert_eq!(c.state().selection_mode, SelectionMode::default());
        c.interact(&Interaction::Leave, &scene);
        assert!(c.state().hovered.is_none());

        let events = c.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ViewEvent::Hover(Some(_))));
        assert_eq!(events[1], ViewEvent::Select(Some(EntityId::new("STEEL"))));
        assert_eq!(events[2], ViewEvent::Hover(None));
    }

    #[test]
    fn membership_stepping_for_symbols() {
        let repo = repo();
        let industries = repo.list_industries(Timeframe::Daily).unwrap();
        let mut c = ViewController::default();
        assert!(!c.step_membership(&industries, true));

        c.set_kind(EntityKind::Symbol);
        assert!(c.step_membership(&industries, true));
        assert_eq!(c.state().selection_mode, SelectionMode::ByMembership(vec!["STEEL".into()]));
        let scene = c.frame(&repo, Timeframe::Daily);
        assert_eq!(scene.markers[0].label, "HPG");

        assert!(c.step_membership(&industries, true));
        assert_eq!(c.state().selection_mode, SelectionMode::ByMembership(vec!["BANK".into()]));
        assert!(c.step_membership(&industries, false));
        assert_eq!(c.state().selection_mode, SelectionMode::ByMembership(vec!["STEEL".into()]));
    }

    #[test]
    fn membership_stepping_from_ranking_starts_at_ends() {
        let repo = repo();
        let industries = repo.list_industries(Timeframe::Daily).unwrap();
        let mut c = ViewController::default();
        c.set_kind(EntityKind::Symbol);

        c.set_selection_mode(SelectionMode::TopNByRatio(5)).unwrap();
        assert!(c.step_membership(&industries, true));
        assert_eq!(c.state().selection_mode, SelectionMode::ByMembership(vec!["BANK".into()]));

        c.set_selection_mode(SelectionMode::BottomNByMomentum(5)).unwrap();
        assert!(c.step_membership(&industries, false));
        assert_eq!(c.state().selection_mode, SelectionMode::ByMembership(vec!["STEEL".into()]));
    }

    #[test]
    fn mode_change_clears_hover() {
        let mut c = ViewController::default();
        let scene = c.frame(&repo(), Timeframe::Daily);
        c.interact(&Interaction::Enter(HitTarget::Marker(1)), &scene);
        assert!(c.state().hovered.is_some());
        c.drain_events();

        c.cycle_selection_mode();
        assert!(c.state().hovered.is_none());
        let events = c.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ViewEvent::SelectionModeChange(_)));
        assert_eq!(events[1], ViewEvent::Hover(None));

        // Unchanged mode keeps the hover.
        c.interact(&Interaction::Enter(HitTarget::Marker(0)), &scene);
        c.set_selection_mode(SelectionMode::TopNByRatio(10)).unwrap();
        assert!(c.state().hovered.is_some());
    }

    #[test]
    fn cycle_mode_uses_ranking_count() {
        let config = EngineConfig {
            ranking_count: 3,
            ..EngineConfig::default()
        };
        let mut c = ViewController::new(&config);
        c.cycle_selection_mode();
        assert_eq!(c.state().selection_mode, SelectionMode::TopNByRatio(3));
    }
}
