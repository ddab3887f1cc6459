use crate::{
    risk::{classify, RiskLevel, Thresholds},
    timeline::{TimeIndex, TimeSeriesPoint},
};
use serde::{Deserialize, Serialize};

/// A single grid cell of the soil water index calculation.
///
/// Field names follow the calculation service's JSON, so the upstream
/// spellings (`advisary_bound`, `dosyakei_bound`) are accepted on input.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh code, unique within a dataset
    pub code: String,
    /// Latitude of the cell center in decimal degrees
    pub lat: f64,
    /// Longitude of the cell center in decimal degrees
    pub lon: f64,
    /// Advisory (caution) criterion
    #[serde(rename = "advisary_bound", alias = "advisory_bound")]
    pub advisory_bound: f64,
    /// Warning criterion
    pub warning_bound: f64,
    /// Landslide disaster criterion
    #[serde(rename = "dosyakei_bound", alias = "disaster_bound")]
    pub disaster_bound: f64,
    /// Soil water index forecast, one point per forecast hour
    pub swi_timeline: Vec<TimeSeriesPoint>,
    /// Rainfall forecast; carried along for tooling, not used for risk
    #[serde(default)]
    pub rain_timeline: Vec<TimeSeriesPoint>,
}

impl Mesh {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.advisory_bound, self.warning_bound, self.disaster_bound)
    }

    /// Soil water index at forecast hour `ft`.
    ///
    /// Returns 0.0 when the hour is not indexed, when this mesh's timeline is
    /// shorter than the offset, or when the point at the offset belongs to a
    /// different hour (the mesh skipped a step the reference has).
    pub fn value_at(&self, index: &TimeIndex, ft: u32) -> f64 {
        self.point_at(index, ft).map_or(0.0, |point| point.value)
    }

    /// The timeline point for `ft`, if this mesh actually has one.
    pub fn point_at(&self, index: &TimeIndex, ft: u32) -> Option<&TimeSeriesPoint> {
        index
            .lookup(ft)
            .and_then(|offset| self.swi_timeline.get(offset))
            .filter(|point| point.ft == ft)
    }

    /// Risk level at forecast hour `ft`; recomputed on every call.
    pub fn risk_at(&self, index: &TimeIndex, ft: u32) -> RiskLevel {
        classify(self.value_at(index, ft), &self.thresholds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with(values: &[(u32, f64)]) -> Mesh {
        Mesh {
            code: "5235".to_string(),
            lat: 34.7,
            lon: 135.5,
            advisory_bound: 10.0,
            warning_bound: 20.0,
            disaster_bound: 30.0,
            swi_timeline: values
                .iter()
                .map(|(ft, v)| TimeSeriesPoint::new(*ft, *v))
                .collect(),
            rain_timeline: Vec::new(),
        }
    }

    #[test]
    fn test_value_at_indexed_hour() {
        let mesh = mesh_with(&[(0, 5.0), (3, 15.0), (6, 25.0)]);
        let index = TimeIndex::build(&mesh.swi_timeline);
        assert_eq!(mesh.value_at(&index, 3), 15.0);
        assert_eq!(mesh.risk_at(&index, 6), RiskLevel::Warning);
    }

    #[test]
    fn test_value_at_unknown_hour_is_zero() {
        let mesh = mesh_with(&[(0, 50.0), (3, 50.0)]);
        let index = TimeIndex::build(&mesh.swi_timeline);
        assert_eq!(mesh.value_at(&index, 4), 0.0);
        assert_eq!(mesh.risk_at(&index, 4), RiskLevel::Normal);
    }

    #[test]
    fn test_short_or_gapped_timeline_is_zero() {
        let reference = mesh_with(&[(0, 1.0), (3, 1.0), (6, 1.0)]);
        let index = TimeIndex::build(&reference.swi_timeline);

        let short = mesh_with(&[(0, 40.0)]);
        assert_eq!(short.value_at(&index, 6), 0.0);

        // hour 3 missing: offset 1 now holds hour 6
        let gapped = mesh_with(&[(0, 40.0), (6, 40.0)]);
        assert_eq!(gapped.value_at(&index, 3), 0.0);
        assert_eq!(gapped.value_at(&index, 0), 40.0);
    }

    #[test]
    fn test_deserialize_upstream_field_names() {
        let json = r#"{
            "code": "52353680",
            "lat": 34.70,
            "lon": 135.50,
            "advisary_bound": 90,
            "warning_bound": 110,
            "dosyakei_bound": 130,
            "swi_timeline": [{"ft": 0, "value": 85.5}, {"ft": 3, "value": 92.0}]
        }"#;
        let mesh: Mesh = serde_json::from_str(json).unwrap();
        assert_eq!(mesh.advisory_bound, 90.0);
        assert_eq!(mesh.disaster_bound, 130.0);
        assert_eq!(mesh.swi_timeline.len(), 2);
        assert!(mesh.rain_timeline.is_empty());
    }
}
