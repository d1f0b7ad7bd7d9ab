//! Domain types for RRGLab

pub mod entity;
pub mod point;
pub mod timeframe;

pub use entity::{Entity, EntityId, EntityKind, Series};
pub use point::{NEUTRAL, RsPoint};
pub use timeframe::Timeframe;
