//! Timeframe: the data-granularity selector used as the snapshot cache key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RrgError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1D")]
    Daily,
    #[serde(rename = "1W")]
    Weekly,
}

impl Timeframe {
    /// Short code used in file names and on screen.
    pub fn code(self) -> &'static str {
        match self {
            Timeframe::Daily => "1D",
            Timeframe::Weekly => "1W",
        }
    }

    /// Snapshot file name: `rrg_1D.json` / `rrg_1W.json`.
    pub fn file_name(self) -> String {
        format!("rrg_{}.json", self.code())
    }

    pub fn toggle(self) -> Self {
        match self {
            Timeframe::Daily => Timeframe::Weekly,
            Timeframe::Weekly => Timeframe::Daily,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Timeframe {
    type Err = RrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1D" | "D" | "DAILY" => Ok(Timeframe::Daily),
            "1W" | "W" | "WEEKLY" => Ok(Timeframe::Weekly),
            other => Err(RrgError::InvalidParameter(format!(
                "unknown timeframe '{other}' (expected 1D or 1W)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes() {
        assert_eq!("1D".parse::<Timeframe>().unwrap(), Timeframe::Daily);
        assert_eq!("weekly".parse::<Timeframe>().unwrap(), Timeframe::Weekly);
        assert!("1M".parse::<Timeframe>().is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(Timeframe::Daily.file_name(), "rrg_1D.json");
        assert_eq!(Timeframe::Weekly.file_name(), "rrg_1W.json");
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Timeframe::Daily.toggle().toggle(), Timeframe::Daily);
    }
}
