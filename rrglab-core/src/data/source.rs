//! Snapshot sources.
//!
//! The `SnapshotSource` trait abstracts over where snapshot bytes come from
//! so the repository can be fed from disk in the apps and from memory in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::Timeframe;
use crate::error::RrgError;

pub trait SnapshotSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Raw snapshot bytes for a timeframe.
    fn fetch(&self, timeframe: Timeframe) -> Result<Vec<u8>, RrgError>;
}

/// Reads `{dir}/rrg_{timeframe}.json`.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, timeframe: Timeframe) -> PathBuf {
        self.dir.join(timeframe.file_name())
    }
}

impl SnapshotSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, timeframe: Timeframe) -> Result<Vec<u8>, RrgError> {
        let path = self.path_for(timeframe);
        std::fs::read(&path).map_err(|e| {
            RrgError::data_unavailable(timeframe, format!("read {}: {e}", path.display()))
        })
    }
}

/// In-memory snapshots keyed by timeframe.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    snapshots: HashMap<Timeframe, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, timeframe: Timeframe, json: impl Into<String>) -> Self {
        self.snapshots.insert(timeframe, json.into());
        self
    }
}

impl SnapshotSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, timeframe: Timeframe) -> Result<Vec<u8>, RrgError> {
        self.snapshots
            .get(&timeframe)
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| RrgError::data_unavailable(timeframe, "no snapshot"))
    }
}
