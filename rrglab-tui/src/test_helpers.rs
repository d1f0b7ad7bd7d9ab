//! Test helpers: in-memory snapshots and an app wired to a fake worker.

use std::sync::mpsc::{self, Receiver};

use rrglab_core::data::repository::fetch_dataset;
use rrglab_core::{EngineConfig, MemorySource, Repository, Timeframe};

use crate::app::AppState;
use crate::worker::{WorkerCommand, WorkerResponse};

pub const DAILY: &str = r#"{
    "rrg_date": "2024-06-03",
    "industries": [
        {"id": "BANK", "name": "Banks", "tail": [{"x": 103.0, "y": 101.0, "date": "2024-06-03"}]},
        {"id": "STEEL", "name": "Steel", "tail": [{"x": 97.0, "y": 99.0, "date": "2024-06-03"}]}
    ],
    "symbols": [
        {"symbol": "VCB", "primaryIndustryId": "BANK", "tail": [{"x": 104.0, "y": 102.0, "date": "2024-06-03"}]},
        {"symbol": "HPG", "primaryIndustryId": "STEEL", "tail": [{"x": 96.0, "y": 98.0, "date": "2024-06-03"}]}
    ]
}"#;

pub const WEEKLY: &str = r#"{"industries": [{"id": "BANK", "name": "Banks", "tail": [{"x": 99.0, "y": 98.0, "date": "2024-05-31"}]}]}"#;

pub fn source() -> MemorySource {
    MemorySource::new()
        .with(Timeframe::Daily, DAILY)
        .with(Timeframe::Weekly, WEEKLY)
}

/// App over `source()` whose worker commands land in the returned receiver.
pub fn app() -> (AppState, Receiver<WorkerCommand>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (_resp_tx, resp_rx) = mpsc::channel();
    let app = AppState::new(&EngineConfig::default(), Repository::new(source()), cmd_tx, resp_rx);
    (app, cmd_rx)
}

/// Play the worker's part synchronously for every queued command.
pub fn pump(app: &mut AppState, rx: &Receiver<WorkerCommand>) {
    let src = source();
    while let Ok(WorkerCommand::Load(ticket)) = rx.try_recv() {
        let result = fetch_dataset(&src, ticket.timeframe);
        app.handle_worker_response(WorkerResponse::Loaded { ticket, result });
    }
}

/// App with the daily snapshot loaded.
pub fn loaded_app() -> (AppState, Receiver<WorkerCommand>) {
    let (mut app, rx) = app();
    app.request_load();
    pump(&mut app, &rx);
    (app, rx)
}
