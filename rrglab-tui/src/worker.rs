//! Background worker thread: snapshot loads run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Each load
//! carries the `LoadTicket` issued by the repository; the main thread decides
//! on arrival whether the result is still wanted.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use rrglab_core::data::repository::fetch_dataset;
use rrglab_core::{Dataset, LoadTicket, RrgError, SnapshotSource};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Load(LoadTicket),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Loaded {
        ticket: LoadTicket,
        result: Result<Dataset, RrgError>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    source: impl SnapshotSource + 'static,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("rrglab-loader".into())
        .spawn(move || worker_loop(&source, rx, tx))
}

fn worker_loop(source: &dyn SnapshotSource, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Load(ticket)) => {
                debug!(ticket = ticket.id, timeframe = %ticket.timeframe, source = source.name(), "loading snapshot");
                let result = fetch_dataset(source, ticket.timeframe);
                if tx.send(WorkerResponse::Loaded { ticket, result }).is_err() {
                    // UI is gone
                    break;
                }
            }
        }
    }
}
