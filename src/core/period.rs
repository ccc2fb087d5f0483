//! Lookback periods for the history chart

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::rates::DateWindow;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum LookbackPeriod {
    /// Short lookback, 7 days
    Week,
    /// Medium lookback, 30 days
    #[default]
    Month,
    /// Long lookback, 365 days
    Year,
}

impl LookbackPeriod {
    pub const ALL: [LookbackPeriod; 3] = [
        LookbackPeriod::Week,
        LookbackPeriod::Month,
        LookbackPeriod::Year,
    ];

    pub fn days(&self) -> i64 {
        match self {
            LookbackPeriod::Week => 7,
            LookbackPeriod::Month => 30,
            LookbackPeriod::Year => 365,
        }
    }

    pub fn to_duration(&self) -> Duration {
        Duration::days(self.days())
    }

    /// Date window ending on `today` (inclusive) and starting `days()` earlier.
    pub fn window_ending(&self, today: NaiveDate) -> DateWindow {
        DateWindow {
            start: today - self.to_duration(),
            end: today,
        }
    }
}

impl Display for LookbackPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LookbackPeriod::Week => "1W",
                LookbackPeriod::Month => "1M",
                LookbackPeriod::Year => "1Y",
            }
        )
    }
}

impl FromStr for LookbackPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1W" | "SHORT" | "WEEK" => Ok(LookbackPeriod::Week),
            "1M" | "MEDIUM" | "MONTH" => Ok(LookbackPeriod::Month),
            "1Y" | "LONG" | "YEAR" => Ok(LookbackPeriod::Year),
            _ => Err(anyhow::anyhow!("Invalid lookback period: {}", s)),
        }
    }
}
