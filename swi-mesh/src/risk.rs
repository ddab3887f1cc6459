use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal landslide risk level derived from a soil water index value.
///
/// Levels are ordered, so `RiskLevel::Caution < RiskLevel::Disaster` holds and
/// `max()` over a collection yields the most severe level.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Normal,
    Caution,
    Warning,
    Disaster,
}

impl RiskLevel {
    /// All levels in ascending order.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Normal,
        RiskLevel::Caution,
        RiskLevel::Warning,
        RiskLevel::Disaster,
    ];

    /// Numeric ordinal (0 = normal, 3 = disaster).
    pub fn as_u8(self) -> u8 {
        match self {
            RiskLevel::Normal => 0,
            RiskLevel::Caution => 1,
            RiskLevel::Warning => 2,
            RiskLevel::Disaster => 3,
        }
    }

    /// Inverse of [`RiskLevel::as_u8`]; values above 3 are not levels.
    pub fn from_u8(value: u8) -> Option<RiskLevel> {
        RiskLevel::ALL.get(value as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Normal => "Normal",
            RiskLevel::Caution => "Caution",
            RiskLevel::Warning => "Warning",
            RiskLevel::Disaster => "Disaster",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// The three per-mesh criteria a value is compared against.
///
/// Expected to satisfy `advisory <= warning <= disaster`, but this is not
/// validated: a misordered set still runs the cascade in [`classify`].
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub advisory: f64,
    pub warning: f64,
    pub disaster: f64,
}

impl Thresholds {
    pub fn new(advisory: f64, warning: f64, disaster: f64) -> Self {
        Self {
            advisory,
            warning,
            disaster,
        }
    }
}

/// Classify a value against a mesh's thresholds.
///
/// Boundary values belong to the higher band. The comparison runs
/// disaster -> warning -> advisory and stops at the first match.
pub fn classify(value: f64, thresholds: &Thresholds) -> RiskLevel {
    if value >= thresholds.disaster {
        RiskLevel::Disaster
    } else if value >= thresholds.warning {
        RiskLevel::Warning
    } else if value >= thresholds.advisory {
        RiskLevel::Caution
    } else {
        RiskLevel::Normal
    }
}

/// Risk level of an area (or mesh) at one forecast hour.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct RiskTimePoint {
    pub ft: u32,
    pub level: RiskLevel,
}
