//! Snapshot loading and the per-timeframe entity repository.
//!
//! Layout on disk: `{data_dir}/rrg_{1D|1W}.json`, one snapshot per timeframe.

pub mod repository;
pub mod snapshot;
pub mod source;

pub use repository::{LoadTicket, Repository, Settled};
pub use snapshot::{Dataset, EntitySummary, RawPoint, RawSeries, RawSnapshot, RawSymbol};
pub use source::{FileSource, MemorySource, SnapshotSource};
