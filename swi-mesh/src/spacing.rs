use crate::mesh::Mesh;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use swi_utils::geo::{from_micro_key, micro_key};

/// Tunables for [`infer_spacing`].
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SpacingConfig {
    /// Interval used when an axis has fewer than two distinct coordinates.
    pub default_interval: f64,
    /// Differences at or below this are floating point near-duplicates.
    pub noise_floor: f64,
    /// Differences are bucketed to this resolution before counting.
    pub precision: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            default_interval: 0.008,
            noise_floor: 1e-4,
            precision: 1e-6,
        }
    }
}

impl SpacingConfig {
    /// Copy with every field that is not a positive finite number replaced by
    /// its default. Warns for each replacement.
    pub fn sanitized(&self) -> SpacingConfig {
        let defaults = SpacingConfig::default();
        let pick = |name: &str, value: f64, default: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                warn!("Spacing {} {} is not positive, using {}", name, value, default);
                default
            }
        };
        SpacingConfig {
            default_interval: pick(
                "default_interval",
                self.default_interval,
                defaults.default_interval,
            ),
            noise_floor: pick("noise_floor", self.noise_floor, defaults.noise_floor),
            precision: pick("precision", self.precision, defaults.precision),
        }
    }
}

/// Grid cell size in degrees; each mesh renders as center ± half interval.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct InferredSpacing {
    pub lat_interval: f64,
    pub lon_interval: f64,
}

impl InferredSpacing {
    pub fn half_lat(&self) -> f64 {
        self.lat_interval / 2.0
    }

    pub fn half_lon(&self) -> f64 {
        self.lon_interval / 2.0
    }
}

/// Infer the uniform grid spacing of a mesh set.
///
/// Each axis independently: distinct coordinates, sorted, consecutive
/// differences above the noise floor, then the most frequent difference at
/// `precision` resolution. Falls back to `default_interval` per axis.
pub fn infer_spacing(meshes: &[Mesh], config: &SpacingConfig) -> InferredSpacing {
    let config = &config.sanitized();
    let lat_interval = axis_interval(meshes.iter().map(|m| m.lat), config).unwrap_or_else(|| {
        warn!(
            "Latitude spacing not inferable from {} meshes, using {}",
            meshes.len(),
            config.default_interval
        );
        config.default_interval
    });
    let lon_interval = axis_interval(meshes.iter().map(|m| m.lon), config).unwrap_or_else(|| {
        warn!(
            "Longitude spacing not inferable from {} meshes, using {}",
            meshes.len(),
            config.default_interval
        );
        config.default_interval
    });
    InferredSpacing {
        lat_interval,
        lon_interval,
    }
}

fn axis_interval(values: impl Iterator<Item = f64>, config: &SpacingConfig) -> Option<f64> {
    let distinct = distinct_sorted(values);
    let intervals = consecutive_intervals(&distinct, config.noise_floor);
    modal_interval(&intervals, config.precision).filter(|interval| *interval > 0.0)
}

/// Sorted set of the finite values in `values`.
pub fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut distinct: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    distinct
}

/// Differences between neighbours of a sorted slice, dropping those at or
/// below `noise_floor`.
pub fn consecutive_intervals(sorted: &[f64], noise_floor: f64) -> Vec<f64> {
    sorted
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|diff| *diff > noise_floor)
        .collect()
}

/// Most frequent interval after rounding to `precision`.
///
/// A tie goes to the value seen first in `intervals`.
pub fn modal_interval(intervals: &[f64], precision: f64) -> Option<f64> {
    // key -> (count, first position)
    let mut counts: HashMap<i64, (usize, usize)> = HashMap::new();
    for (position, interval) in intervals.iter().enumerate() {
        let entry = counts
            .entry(micro_key(*interval, precision))
            .or_insert((0, position));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(key, _)| from_micro_key(key, precision))
}
