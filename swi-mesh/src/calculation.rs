use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status string the calculation service uses for a failed run.
pub const STATUS_ERROR: &str = "error";

/// The calculation service's response for one run.
///
/// Timestamps are kept as the service wrote them (ISO-8601, possibly
/// without an offset); [`crate::dataset::Dataset`] parses them.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub status: String,
    pub calculation_time: String,
    pub initial_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swi_initial_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid_initial_time: Option<String>,
    /// Prefecture code -> prefecture
    pub prefectures: BTreeMap<String, Prefecture>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Prefecture {
    pub name: String,
    pub code: String,
    pub areas: Vec<Area>,
}

/// A warning area: a named group of meshes inside one prefecture.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
    pub meshes: Vec<Mesh>,
    /// As sent by the service; recomputed locally by the analysis crate.
    #[serde(default, skip_serializing)]
    pub risk_timeline: Vec<UpstreamRiskPoint>,
}

/// Area risk point in the service's numeric form (`value` is 0..=3).
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct UpstreamRiskPoint {
    pub ft: u32,
    pub value: u8,
}

impl CalculationResult {
    /// Parse the service's JSON body.
    pub fn from_json(body: &str) -> crate::error::Result<CalculationResult> {
        Ok(serde_json::from_str(body)?)
    }

    /// The run's SWI initial time, falling back to the legacy `initial_time`.
    pub fn swi_initial_time(&self) -> &str {
        self.swi_initial_time
            .as_deref()
            .unwrap_or(self.initial_time.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }

    pub fn mesh_count(&self) -> usize {
        self.prefectures
            .values()
            .flat_map(|p| p.areas.iter())
            .map(|a| a.meshes.len())
            .sum()
    }
}
