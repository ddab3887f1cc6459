//! Core types for soil water index mesh datasets.
//!
//! - `mesh` / `timeline`: the per-cell records and forecast series
//! - `risk`: the four-level classification
//! - `spacing`: grid interval inference from mesh centers
//! - `dataset`: immutable snapshot with its derived spacing and time index

pub mod calculation;
pub mod dataset;
pub mod error;
pub mod mesh;
pub mod risk;
pub mod spacing;
pub mod timeline;

pub use dataset::Dataset;
pub use mesh::Mesh;
pub use risk::{classify, RiskLevel, Thresholds};
pub use spacing::{infer_spacing, InferredSpacing, SpacingConfig};
pub use timeline::{TimeIndex, TimeSeriesPoint};
