//! Engine error taxonomy.
//!
//! Only `DataUnavailable` is terminal, and only for the timeframe that failed
//! to load. Everything downstream of a loaded snapshot recovers locally with a
//! fallback (empty list, fallback viewport). An empty selection is a state,
//! not an error: see [`crate::selection::Selection::is_empty`].

use thiserror::Error;

use crate::domain::Timeframe;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RrgError {
    #[error("data unavailable for timeframe {timeframe}: {reason}")]
    DataUnavailable { timeframe: Timeframe, reason: String },

    #[error("invalid point: non-finite coordinates ({x}, {y})")]
    InvalidPoint { x: f64, y: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("config error: {0}")]
    Config(String),
}

impl RrgError {
    pub fn data_unavailable(timeframe: Timeframe, reason: impl Into<String>) -> Self {
        RrgError::DataUnavailable {
            timeframe,
            reason: reason.into(),
        }
    }
}
