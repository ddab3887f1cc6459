use crate::{
    calculation::CalculationResult,
    error::{MeshError, Result},
    mesh::Mesh,
    spacing::{infer_spacing, InferredSpacing, SpacingConfig},
    timeline::TimeIndex,
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use swi_utils::time::parse_initial_time;

/// Location of an area's meshes inside a [`Dataset`].
#[derive(Debug, PartialEq, Clone)]
pub struct AreaRef {
    pub prefecture_code: String,
    pub prefecture_name: String,
    pub area_name: String,
    /// Offsets into [`Dataset::meshes`]
    pub mesh_offsets: Vec<usize>,
}

/// Bounding box of mesh centers.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct GeoExtent {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// One immutable snapshot of a calculation run.
///
/// Spacing and time index are derived once here and live exactly as long as
/// the meshes they were derived from. A new run means a new `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    meshes: Vec<Mesh>,
    areas: Vec<AreaRef>,
    spacing: InferredSpacing,
    time_index: TimeIndex,
    initial_time: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Build a dataset from a flat mesh list with no area structure.
    pub fn new(meshes: Vec<Mesh>, config: &SpacingConfig) -> Dataset {
        Dataset::assemble(meshes, Vec::new(), None, config)
    }

    /// Flatten a calculation result into a dataset.
    ///
    /// A mesh code listed under several areas is stored once; every area
    /// that lists it refers to the same mesh.
    pub fn from_calculation_result(
        result: CalculationResult,
        config: &SpacingConfig,
    ) -> Result<Dataset> {
        if result.is_error() {
            return Err(MeshError::CalculationFailed(result.status));
        }
        let initial_time = match parse_initial_time(result.swi_initial_time()) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("Ignoring initial time: {}", e);
                None
            }
        };

        let mut meshes: Vec<Mesh> = Vec::with_capacity(result.mesh_count());
        let mut offsets_by_code: HashMap<String, usize> = HashMap::new();
        let mut areas: Vec<AreaRef> = Vec::new();
        let mut duplicates = 0usize;

        for (prefecture_code, prefecture) in result.prefectures {
            for area in prefecture.areas {
                let mut mesh_offsets = Vec::with_capacity(area.meshes.len());
                for mesh in area.meshes {
                    let offset = match offsets_by_code.get(&mesh.code).copied() {
                        Some(existing) => {
                            duplicates += 1;
                            existing
                        }
                        None => {
                            let offset = meshes.len();
                            offsets_by_code.insert(mesh.code.clone(), offset);
                            meshes.push(mesh);
                            offset
                        }
                    };
                    mesh_offsets.push(offset);
                }
                areas.push(AreaRef {
                    prefecture_code: prefecture_code.clone(),
                    prefecture_name: prefecture.name.clone(),
                    area_name: area.name,
                    mesh_offsets,
                });
            }
        }
        if duplicates > 0 {
            warn!(
                "{} mesh entries repeated a code already in the dataset; kept the first",
                duplicates
            );
        }
        Ok(Dataset::assemble(meshes, areas, initial_time, config))
    }

    fn assemble(
        meshes: Vec<Mesh>,
        areas: Vec<AreaRef>,
        initial_time: Option<DateTime<Utc>>,
        config: &SpacingConfig,
    ) -> Dataset {
        let spacing = infer_spacing(&meshes, config);
        // longest timeline, earliest mesh on ties
        let time_index = meshes
            .iter()
            .reduce(|best, m| {
                if m.swi_timeline.len() > best.swi_timeline.len() {
                    m
                } else {
                    best
                }
            })
            .map(|m| TimeIndex::build(&m.swi_timeline))
            .unwrap_or_default();
        let ragged = meshes
            .iter()
            .filter(|m| m.swi_timeline.len() != time_index.len())
            .count();
        if ragged > 0 {
            warn!(
                "{} meshes have a timeline length different from the reference ({} steps)",
                ragged,
                time_index.len()
            );
        }
        info!(
            "Dataset: {} meshes, {} areas, {} forecast steps, spacing {:.6} x {:.6} deg",
            meshes.len(),
            areas.len(),
            time_index.len(),
            spacing.lat_interval,
            spacing.lon_interval
        );
        Dataset {
            meshes,
            areas,
            spacing,
            time_index,
            initial_time,
        }
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn areas(&self) -> &[AreaRef] {
        &self.areas
    }

    pub fn spacing(&self) -> &InferredSpacing {
        &self.spacing
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    pub fn initial_time(&self) -> Option<&DateTime<Utc>> {
        self.initial_time.as_ref()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// The meshes of `area`, in area order.
    pub fn area_meshes<'a>(&'a self, area: &'a AreaRef) -> impl Iterator<Item = &'a Mesh> + 'a {
        area.mesh_offsets
            .iter()
            .filter_map(move |offset| self.meshes.get(*offset))
    }

    pub fn find_area(&self, prefecture_code: &str, area_name: &str) -> Result<&AreaRef> {
        self.areas
            .iter()
            .find(|a| a.prefecture_code == prefecture_code && a.area_name == area_name)
            .ok_or_else(|| MeshError::AreaNotFound {
                prefecture: prefecture_code.to_string(),
                area: area_name.to_string(),
            })
    }

    /// Bounding box of mesh centers, `None` for an empty dataset.
    pub fn geo_extent(&self) -> Option<GeoExtent> {
        let first = self.meshes.first()?;
        let init = GeoExtent {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(self.meshes.iter().fold(init, |e, m| GeoExtent {
            min_lat: e.min_lat.min(m.lat),
            max_lat: e.max_lat.max(m.lat),
            min_lon: e.min_lon.min(m.lon),
            max_lon: e.max_lon.max(m.lon),
        }))
    }
}
