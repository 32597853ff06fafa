//! Age group classification.
//!
//! [`AgeGroup::from_age`] is the only place the bucket boundaries are
//! defined. Age 30 falls in `25-30`; `30-35` starts at 31.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered age buckets used by the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Under 18")]
    Under18,
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-30")]
    From25To30,
    #[serde(rename = "30-35")]
    From30To35,
    #[serde(rename = "35+")]
    Over35,
    /// Sentinel for rows whose age could not be derived.
    #[serde(rename = "Unknown")]
    Unknown,
}

impl AgeGroup {
    /// All groups in presentation order.
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::Under18,
        AgeGroup::From18To24,
        AgeGroup::From25To30,
        AgeGroup::From30To35,
        AgeGroup::Over35,
        AgeGroup::Unknown,
    ];

    /// Classify an age in whole years. `None` maps to [`AgeGroup::Unknown`].
    pub fn from_age(age: Option<i64>) -> Self {
        match age {
            None => AgeGroup::Unknown,
            Some(age) if age < 18 => AgeGroup::Under18,
            Some(18..=24) => AgeGroup::From18To24,
            Some(25..=30) => AgeGroup::From25To30,
            Some(31..=35) => AgeGroup::From30To35,
            Some(_) => AgeGroup::Over35,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under18 => "Under 18",
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To30 => "25-30",
            AgeGroup::From30To35 => "30-35",
            AgeGroup::Over35 => "35+",
            AgeGroup::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
