//! Caller-owned, timeframe-keyed snapshot repository.
//!
//! There is no process-wide cache: whoever owns the `Repository` owns the
//! loaded datasets and decides when to invalidate them.
//!
//! Loads may also be performed elsewhere (the TUI does them on a worker
//! thread). Those go through [`Repository::begin_load`] / [`Repository::settle`]:
//! every request gets a ticket and only the newest ticket's result is applied,
//! so a slow response for an older request can never overwrite a newer one.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::snapshot::{Dataset, EntitySummary};
use super::source::SnapshotSource;
use crate::domain::{EntityId, EntityKind, Series, Timeframe};
use crate::error::RrgError;
use crate::selection::{self, Selection, SelectionMode};

/// Identifies one outstanding load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: u64,
    pub timeframe: Timeframe,
}

/// Outcome of settling a load.
#[derive(Debug, Clone)]
pub enum Settled {
    Applied(Arc<Dataset>),
    /// A newer request was issued; this result was discarded.
    Stale,
}

pub struct Repository {
    source: Box<dyn SnapshotSource>,
    datasets: BTreeMap<Timeframe, Arc<Dataset>>,
    issued: u64,
    newest: Option<u64>,
}

/// Fetch and parse one snapshot from a source without touching any cache.
pub fn fetch_dataset(source: &dyn SnapshotSource, timeframe: Timeframe) -> Result<Dataset, RrgError> {
    let bytes = source.fetch(timeframe)?;
    Dataset::from_json(timeframe, &bytes)
}

impl Repository {
    pub fn new(source: impl SnapshotSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            datasets: BTreeMap::new(),
            issued: 0,
            newest: None,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Load a timeframe synchronously, reusing the cached dataset if present.
    pub fn load(&mut self, timeframe: Timeframe) -> Result<Arc<Dataset>, RrgError> {
        if let Some(ds) = self.datasets.get(&timeframe) {
            return Ok(Arc::clone(ds));
        }
        let ds = Arc::new(fetch_dataset(self.source.as_ref(), timeframe)?);
        debug!(%timeframe, source = self.source.name(), digest = %ds.digest, "snapshot loaded");
        self.datasets.insert(timeframe, Arc::clone(&ds));
        Ok(ds)
    }

    /// Register a new load request. Supersedes every earlier ticket.
    pub fn begin_load(&mut self, timeframe: Timeframe) -> LoadTicket {
        self.issued += 1;
        self.newest = Some(self.issued);
        LoadTicket {
            id: self.issued,
            timeframe,
        }
    }

    /// Apply the result of a load if its ticket is still the newest.
    ///
    /// Errors for the newest ticket are returned as-is and leave nothing
    /// cached for that timeframe. Results for stale tickets are dropped,
    /// errors included.
    pub fn settle(
        &mut self,
        ticket: LoadTicket,
        result: Result<Dataset, RrgError>,
    ) -> Result<Settled, RrgError> {
        if self.newest != Some(ticket.id) {
            debug!(ticket = ticket.id, timeframe = %ticket.timeframe, "discarding stale load");
            return Ok(Settled::Stale);
        }
        self.newest = None;
        match result {
            Ok(ds) => {
                debug!(timeframe = %ticket.timeframe, digest = %ds.digest, "snapshot loaded");
                let ds = Arc::new(ds);
                self.datasets.insert(ticket.timeframe, Arc::clone(&ds));
                Ok(Settled::Applied(ds))
            }
            Err(e) => {
                self.datasets.remove(&ticket.timeframe);
                Err(e)
            }
        }
    }

    /// Whether a load is outstanding.
    pub fn is_loading(&self) -> bool {
        self.newest.is_some()
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<&Arc<Dataset>> {
        self.datasets.get(&timeframe)
    }

    pub fn is_loaded(&self, timeframe: Timeframe) -> bool {
        self.datasets.contains_key(&timeframe)
    }

    /// Drop a cached timeframe so the next `load` refetches it.
    pub fn invalidate(&mut self, timeframe: Timeframe) -> bool {
        self.datasets.remove(&timeframe).is_some()
    }

    /// Drop every cached timeframe.
    pub fn clear(&mut self) {
        self.datasets.clear();
    }

    fn loaded(&self, timeframe: Timeframe) -> Result<&Dataset, RrgError> {
        self.datasets
            .get(&timeframe)
            .map(|ds| ds.as_ref())
            .ok_or_else(|| RrgError::data_unavailable(timeframe, "not loaded"))
    }

    pub fn list_industries(&self, timeframe: Timeframe) -> Result<Vec<EntitySummary>, RrgError> {
        Ok(self.loaded(timeframe)?.list_industries())
    }

    pub fn list_groups(&self, timeframe: Timeframe) -> Result<Vec<EntitySummary>, RrgError> {
        Ok(self.loaded(timeframe)?.list_groups())
    }

    pub fn list_tickers_by_industry(
        &self,
        timeframe: Timeframe,
        ids: &[EntityId],
    ) -> Result<Vec<&Series>, RrgError> {
        Ok(self.loaded(timeframe)?.list_tickers_by_industry(ids))
    }

    /// Filtered, ranked, capped series for display.
    pub fn visible_series(
        &self,
        kind: EntityKind,
        mode: &SelectionMode,
        timeframe: Timeframe,
    ) -> Result<Selection<'_>, RrgError> {
        selection::select(self.loaded(timeframe)?, kind, mode)
    }
}
