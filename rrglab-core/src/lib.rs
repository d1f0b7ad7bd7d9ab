//! RRGLab Core: relative-rotation analytics engine.
//!
//! Takes per-timeframe snapshots of RS-Ratio / RS-Momentum histories for
//! industries, capitalization groups and symbols, and turns them into
//! something a chart can paint:
//! - Snapshot loading and the caller-owned, timeframe-keyed repository
//! - Quadrant classification
//! - Selection by membership or top/bottom ranking, capped at 50
//! - Trail windowing and the zoom-adaptive square viewport
//! - Scene building (markers, trails, legend, tooltips)
//! - The view-state controller that drives all of the above

pub mod config;
pub mod controller;
pub mod data;
pub mod domain;
pub mod error;
pub mod quadrant;
pub mod render;
pub mod selection;
pub mod trail;
pub mod viewport;

pub use config::{ColorConfig, EngineConfig};
pub use controller::{ViewController, ViewEvent, ViewState, ZoomLevel};
pub use data::{Dataset, FileSource, LoadTicket, MemorySource, Repository, Settled, SnapshotSource};
pub use domain::{Entity, EntityId, EntityKind, NEUTRAL, RsPoint, Series, Timeframe};
pub use error::RrgError;
pub use quadrant::{Quadrant, StrengthBand, classify};
pub use render::{Scene, SeriesColor, assign_color};
pub use selection::{MAX_VISIBLE, Selection, SelectionMode};
pub use trail::TrailLength;
pub use viewport::Viewport;
