//! Performance tiers assigned from a centre's pass rate.

use std::fmt;

use serde::Serialize;

use crate::record::SchoolRecord;

/// Performance tier over the pass rate:
///
/// | Tier      | Pass rate  |
/// |-----------|------------|
/// | Excellent | 80% and up |
/// | Good      | 60% to 80% |
/// | Fair      | 40% to 60% |
/// | Poor      | below 40%  |
///
/// Each band includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Lower pass-rate bound per tier, checked top down. The final 0.0 entry
/// makes the table total over defined pass rates.
pub const TIER_TABLE: [(f64, Tier); 4] = [
    (80.0, Tier::Excellent),
    (60.0, Tier::Good),
    (40.0, Tier::Fair),
    (0.0, Tier::Poor),
];

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Excellent, Tier::Good, Tier::Fair, Tier::Poor];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Fair => "Fair",
            Tier::Poor => "Poor",
        }
    }

    /// Band description as shown in summaries.
    pub fn band(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent (80-100%)",
            Tier::Good => "Good (60-79%)",
            Tier::Fair => "Fair (40-59%)",
            Tier::Poor => "Poor (0-39%)",
        }
    }

    /// Lowest pass rate admitted to this tier.
    pub fn floor(self) -> f64 {
        match self {
            Tier::Excellent => 80.0,
            Tier::Good => 60.0,
            Tier::Fair => 40.0,
            Tier::Poor => 0.0,
        }
    }

    /// Parses a tier name, ignoring case and surrounding whitespace.
    pub fn from_label(raw: &str) -> Option<Tier> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Tier::Excellent),
            "good" => Some(Tier::Good),
            "fair" => Some(Tier::Fair),
            "poor" => Some(Tier::Poor),
            _ => None,
        }
    }

    /// Maps a defined pass rate to its tier: first table threshold met wins.
    pub fn from_pass_rate(pass_rate: f64) -> Tier {
        TIER_TABLE
            .iter()
            .find(|(floor, _)| pass_rate >= *floor)
            .map(|&(_, tier)| tier)
            .unwrap_or(Tier::Poor)
    }

    /// Tier for a record, `None` when its pass rate is undefined.
    pub fn categorize(record: &SchoolRecord) -> Option<Tier> {
        record.rates.map(|r| Tier::from_pass_rate(r.pass_rate))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
