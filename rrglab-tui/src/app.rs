//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. Snapshot loads are delegated to the worker
//! thread; everything else (selection, viewport, scene) is recomputed
//! synchronously after each key press.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use rrglab_core::render::{HitTarget, Interaction, Scene};
use rrglab_core::{EngineConfig, Repository, Settled, Timeframe, ViewController, ViewEvent};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

pub struct AppState {
    pub running: bool,
    pub show_help: bool,
    pub timeframe: Timeframe,
    pub repository: Repository,
    pub controller: ViewController,
    /// Scene for the current state; rebuilt by `refresh`.
    pub scene: Scene,
    /// Keyboard hover cursor over `scene.markers`.
    pub cursor: Option<usize>,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        config: &EngineConfig,
        repository: Repository,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let mut app = Self {
            running: true,
            show_help: false,
            timeframe: config.default_timeframe,
            repository,
            controller: ViewController::new(config),
            scene: Scene::default(),
            cursor: None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            worker_tx,
            worker_rx,
        };
        app.refresh();
        app
    }

    /// Record an error and show it in the status bar.
    pub fn push_error(&mut self, message: String) {
        warn!("{message}");
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            message: message.clone(),
        });
        self.error_history.truncate(ERROR_HISTORY_CAP);
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Show the current timeframe, loading it on the worker if needed.
    pub fn request_load(&mut self) {
        let timeframe = self.timeframe;
        if self.repository.is_loaded(timeframe) {
            self.refresh();
            return;
        }
        let ticket = self.repository.begin_load(timeframe);
        if self.worker_tx.send(WorkerCommand::Load(ticket)).is_err() {
            self.push_error("loader thread is not running".into());
            return;
        }
        self.set_status(format!("Loading {timeframe} snapshot..."));
        self.refresh();
    }

    /// Drop the cached snapshot for the current timeframe and fetch it again.
    pub fn reload(&mut self) {
        self.repository.invalidate(self.timeframe);
        self.request_load();
    }

    pub fn toggle_timeframe(&mut self) {
        self.timeframe = self.timeframe.toggle();
        self.clear_pointer();
        self.request_load();
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Loaded { ticket, result } => {
                match self.repository.settle(ticket, result) {
                    Ok(Settled::Applied(ds)) => {
                        info!(
                            timeframe = %ticket.timeframe,
                            digest = %ds.digest,
                            points = ds.point_count(),
                            "snapshot applied"
                        );
                        if ds.dropped_points > 0 {
                            self.set_warning(format!(
                                "Loaded {}: {} invalid points skipped",
                                ticket.timeframe, ds.dropped_points
                            ));
                        } else {
                            self.set_status(format!(
                                "Loaded {}: {} industries, {} groups, {} symbols",
                                ticket.timeframe,
                                ds.industries.len(),
                                ds.groups.len(),
                                ds.symbols.len()
                            ));
                        }
                    }
                    Ok(Settled::Stale) => {
                        debug!(ticket = ticket.id, "ignoring superseded load");
                    }
                    Err(e) => self.push_error(e.to_string()),
                }
                self.refresh();
            }
        }
    }

    /// Rebuild the scene and flush controller events. A new visible set
    /// drops the keyboard cursor.
    pub fn refresh(&mut self) {
        self.scene = self.controller.frame(&self.repository, self.timeframe);
        if let Some(i) = self.cursor {
            if i >= self.scene.markers.len() {
                self.cursor = None;
            }
        }
        for event in self.controller.drain_events() {
            debug!(?event, "view event");
            match event {
                ViewEvent::TrailLengthChange(len) => self.set_status(format!("Trail length: {len}")),
                ViewEvent::SelectionModeChange(mode) => {
                    self.cursor = None;
                    self.set_status(format!("Mode: {mode}"));
                }
                ViewEvent::KindChange(kind) => {
                    self.cursor = None;
                    self.set_status(format!("Showing {}", kind.label()));
                }
                ViewEvent::ZoomChange(z) => self.set_status(format!("Zoom {z:.2}x")),
                ViewEvent::Select(Some(id)) => self.set_status(format!("Selected {id}")),
                ViewEvent::Select(None) | ViewEvent::Hover(_) => {}
            }
        }
    }

    /// Move the hover cursor by `delta` markers, wrapping around.
    pub fn move_cursor(&mut self, delta: isize) {
        let n = self.scene.markers.len();
        if n == 0 {
            return;
        }
        let next = match self.cursor {
            None if delta >= 0 => 0,
            None => n - 1,
            Some(i) => (i as isize + delta).rem_euclid(n as isize) as usize,
        };
        self.cursor = Some(next);
        self.controller
            .interact(&Interaction::Enter(HitTarget::Marker(next)), &self.scene);
    }

    /// Select the marker under the cursor.
    pub fn select_at_cursor(&mut self) {
        if let Some(i) = self.cursor {
            self.controller
                .interact(&Interaction::Click(HitTarget::Marker(i)), &self.scene);
        }
    }

    /// Drop hover, cursor and selection.
    pub fn clear_pointer(&mut self) {
        self.controller.interact(&Interaction::Leave, &self.scene);
        self.controller.select(None);
        self.cursor = None;
    }

    pub fn is_loading(&self) -> bool {
        self.repository.is_loading()
    }
}
