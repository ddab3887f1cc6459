//! Dataset-level analysis for soil water index meshes.
//!
//! This crate aggregates per-mesh classifications into the views the
//! surrounding application shows next to the map: area risk timelines,
//! per-level counts and a structural report used for debugging datasets.

/// Per-area and per-level risk aggregation.
pub mod area_risk {
    use serde::Serialize;
    use swi_mesh::{
        dataset::AreaRef,
        risk::{RiskLevel, RiskTimePoint},
        Dataset,
    };

    /// Number of meshes at each risk level.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
    pub struct RiskCounts {
        pub normal: usize,
        pub caution: usize,
        pub warning: usize,
        pub disaster: usize,
    }

    impl RiskCounts {
        pub fn add(&mut self, level: RiskLevel) {
            match level {
                RiskLevel::Normal => self.normal += 1,
                RiskLevel::Caution => self.caution += 1,
                RiskLevel::Warning => self.warning += 1,
                RiskLevel::Disaster => self.disaster += 1,
            }
        }

        pub fn get(&self, level: RiskLevel) -> usize {
            match level {
                RiskLevel::Normal => self.normal,
                RiskLevel::Caution => self.caution,
                RiskLevel::Warning => self.warning,
                RiskLevel::Disaster => self.disaster,
            }
        }

        pub fn total(&self) -> usize {
            self.normal + self.caution + self.warning + self.disaster
        }

        /// Meshes that would be drawn on the map (anything above normal).
        pub fn at_risk(&self) -> usize {
            self.caution + self.warning + self.disaster
        }
    }

    /// Risk timeline of one area with its display names.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct AreaRiskTimeline {
        pub prefecture_code: String,
        pub prefecture_name: String,
        pub area_name: String,
        pub timeline: Vec<RiskTimePoint>,
    }

    impl AreaRiskTimeline {
        /// Level at `ft`, normal when the hour is not in the timeline.
        pub fn level_at(&self, ft: u32) -> RiskLevel {
            self.timeline
                .iter()
                .find(|p| p.ft == ft)
                .map_or(RiskLevel::Normal, |p| p.level)
        }

        /// Most severe level over the whole forecast.
        pub fn peak(&self) -> RiskLevel {
            self.timeline
                .iter()
                .map(|p| p.level)
                .max()
                .unwrap_or(RiskLevel::Normal)
        }
    }

    /// For every forecast hour of the dataset, the most severe level among
    /// the area's meshes. An area without meshes is normal throughout.
    pub fn area_risk_timeline(dataset: &Dataset, area: &AreaRef) -> Vec<RiskTimePoint> {
        let index = dataset.time_index();
        index
            .hours()
            .iter()
            .map(|&ft| RiskTimePoint {
                ft,
                level: dataset
                    .area_meshes(area)
                    .map(|mesh| mesh.risk_at(index, ft))
                    .max()
                    .unwrap_or(RiskLevel::Normal),
            })
            .collect()
    }

    /// [`area_risk_timeline`] for every area of the dataset.
    pub fn prefecture_risk_timelines(dataset: &Dataset) -> Vec<AreaRiskTimeline> {
        dataset
            .areas()
            .iter()
            .map(|area| AreaRiskTimeline {
                prefecture_code: area.prefecture_code.clone(),
                prefecture_name: area.prefecture_name.clone(),
                area_name: area.area_name.clone(),
                timeline: area_risk_timeline(dataset, area),
            })
            .collect()
    }

    /// Per-level mesh counts at forecast hour `ft`.
    pub fn risk_counts(dataset: &Dataset, ft: u32) -> RiskCounts {
        let index = dataset.time_index();
        let mut counts = RiskCounts::default();
        for mesh in dataset.meshes() {
            counts.add(mesh.risk_at(index, ft));
        }
        counts
    }

}

/// Structural report on a dataset (coordinate coverage, interval statistics,
/// missing forecast entries).
pub mod analysis {
    use crate::area_risk::{risk_counts, RiskCounts};
    use log::debug;
    use serde::Serialize;
    use std::collections::{BTreeMap, BTreeSet};
    use swi_mesh::{
        dataset::GeoExtent,
        spacing::{consecutive_intervals, distinct_sorted, modal_interval},
        Dataset, InferredSpacing, Mesh, RiskLevel, SpacingConfig, Thresholds, TimeIndex,
        TimeSeriesPoint,
    };
    use swi_utils::geo::{km_estimate, round_to, Axis};

    /// Meshes listed in [`MeshAnalysis::samples`].
    pub const SAMPLE_LIMIT: usize = 5;

    /// Timeline points kept per sample.
    pub const TIMELINE_PREVIEW: usize = 5;

    /// One mesh shown as-is, for eyeballing thresholds and timelines.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct MeshSample {
        pub code: String,
        pub thresholds: Thresholds,
        /// `advisory <= warning <= disaster`
        pub thresholds_ordered: bool,
        pub value: f64,
        pub level: RiskLevel,
        pub timeline_len: usize,
        pub timeline_head: Vec<TimeSeriesPoint>,
    }

    impl MeshSample {
        fn of(mesh: &Mesh, index: &TimeIndex, ft: u32) -> MeshSample {
            let thresholds = mesh.thresholds();
            MeshSample {
                code: mesh.code.clone(),
                thresholds,
                thresholds_ordered: thresholds_ordered(&thresholds),
                value: mesh.value_at(index, ft),
                level: mesh.risk_at(index, ft),
                timeline_len: mesh.swi_timeline.len(),
                timeline_head: mesh
                    .swi_timeline
                    .iter()
                    .take(TIMELINE_PREVIEW)
                    .copied()
                    .collect(),
            }
        }
    }

    fn thresholds_ordered(t: &Thresholds) -> bool {
        t.advisory <= t.warning && t.warning <= t.disaster
    }

    /// Interval statistics along one axis.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct AxisIntervals {
        pub distinct_values: usize,
        pub interval_count: usize,
        pub mean: Option<f64>,
        pub min: Option<f64>,
        pub mode: Option<f64>,
        /// Display-only distance of the modal interval
        pub mode_km: Option<f64>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct MeshAnalysis {
        pub mesh_count: usize,
        pub extent: Option<GeoExtent>,
        pub latitude: AxisIntervals,
        pub longitude: AxisIntervals,
        /// Spacing the renderer uses for this dataset
        pub spacing: InferredSpacing,
        /// Mesh count by the first two characters of the mesh code
        pub code_prefix_counts: BTreeMap<String, usize>,
        pub forecast_hour: u32,
        pub risk_counts: RiskCounts,
        /// Meshes without a timeline entry for `forecast_hour`
        pub missing_entries: usize,
        /// Every forecast hour present in any mesh timeline
        pub forecast_hours: Vec<u32>,
        /// Meshes whose thresholds are not in ascending order
        pub misordered_thresholds: usize,
        /// Meshes whose timeline length differs from the time index
        pub ragged_timelines: usize,
        /// The first meshes of the dataset, at most [`SAMPLE_LIMIT`]
        pub samples: Vec<MeshSample>,
    }

    fn axis_intervals(
        values: impl Iterator<Item = f64>,
        axis: Axis,
        config: &SpacingConfig,
    ) -> AxisIntervals {
        let distinct = distinct_sorted(values);
        let intervals = consecutive_intervals(&distinct, config.noise_floor);
        let mean = if intervals.is_empty() {
            None
        } else {
            Some(round_to(
                intervals.iter().sum::<f64>() / intervals.len() as f64,
                config.precision,
            ))
        };
        let min = intervals.iter().copied().reduce(f64::min);
        let mode = modal_interval(&intervals, config.precision);
        AxisIntervals {
            distinct_values: distinct.len(),
            interval_count: intervals.len(),
            mean,
            min,
            mode,
            mode_km: mode.map(|m| km_estimate(m, axis)),
        }
    }

    /// Build the report for forecast hour `ft`.
    pub fn analyze(dataset: &Dataset, ft: u32, config: &SpacingConfig) -> MeshAnalysis {
        let config = &config.sanitized();
        let meshes = dataset.meshes();
        let index = dataset.time_index();

        let mut code_prefix_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut hours: BTreeSet<u32> = BTreeSet::new();
        let mut missing_entries = 0usize;
        let mut misordered_thresholds = 0usize;
        let mut ragged_timelines = 0usize;
        for mesh in meshes {
            let prefix: String = mesh.code.chars().take(2).collect();
            *code_prefix_counts.entry(prefix).or_default() += 1;
            hours.extend(mesh.swi_timeline.iter().map(|p| p.ft));
            if mesh.point_at(index, ft).is_none() {
                missing_entries += 1;
            }
            if !thresholds_ordered(&mesh.thresholds()) {
                misordered_thresholds += 1;
            }
            if mesh.swi_timeline.len() != index.len() {
                ragged_timelines += 1;
            }
        }
        debug!(
            "analysis: {} meshes, {} missing FT{} entries",
            meshes.len(),
            missing_entries,
            ft
        );

        MeshAnalysis {
            mesh_count: meshes.len(),
            extent: dataset.geo_extent(),
            latitude: axis_intervals(meshes.iter().map(|m| m.lat), Axis::Latitude, config),
            longitude: axis_intervals(meshes.iter().map(|m| m.lon), Axis::Longitude, config),
            spacing: *dataset.spacing(),
            code_prefix_counts,
            forecast_hour: ft,
            risk_counts: risk_counts(dataset, ft),
            missing_entries,
            forecast_hours: hours.into_iter().collect(),
            misordered_thresholds,
            ragged_timelines,
            samples: meshes
                .iter()
                .take(SAMPLE_LIMIT)
                .map(|mesh| MeshSample::of(mesh, index, ft))
                .collect(),
        }
    }

}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;
    use swi_mesh::{
        calculation::{Area, CalculationResult, Prefecture},
        Dataset, Mesh, SpacingConfig, TimeSeriesPoint,
    };

    fn mesh(code: &str, lat: f64, lon: f64, ft0: f64, ft3: f64) -> Mesh {
        Mesh {
            code: code.to_string(),
            lat,
            lon,
            advisory_bound: 10.0,
            warning_bound: 20.0,
            disaster_bound: 30.0,
            swi_timeline: vec![TimeSeriesPoint::new(0, ft0), TimeSeriesPoint::new(3, ft3)],
            rain_timeline: Vec::new(),
        }
    }

    /// 2x2 grid, one mesh per level at FT0; North holds the two west
    /// meshes, South the two east ones.
    pub(crate) fn osaka_dataset() -> Dataset {
        let mut prefectures = BTreeMap::new();
        prefectures.insert(
            "osaka".to_string(),
            Prefecture {
                name: "Osaka".to_string(),
                code: "osaka".to_string(),
                areas: vec![
                    Area {
                        name: "North".to_string(),
                        meshes: vec![
                            mesh("52350001", 34.70, 135.50, 5.0, 5.0),
                            mesh("52350002", 34.71, 135.50, 15.0, 22.0),
                        ],
                        risk_timeline: Vec::new(),
                    },
                    Area {
                        name: "South".to_string(),
                        meshes: vec![
                            mesh("52350003", 34.70, 135.51, 25.0, 12.0),
                            mesh("52350004", 34.71, 135.51, 35.0, 0.0),
                        ],
                        risk_timeline: Vec::new(),
                    },
                ],
            },
        );
        let result = CalculationResult {
            status: "success".to_string(),
            calculation_time: "2023-07-01T01:00:00".to_string(),
            initial_time: "2023-06-30T15:00:00Z".to_string(),
            swi_initial_time: None,
            guid_initial_time: None,
            prefectures,
        };
        Dataset::from_calculation_result(result, &SpacingConfig::default()).unwrap()
    }
}
