/// Error types for loading mesh datasets
use thiserror::Error;

/// Main error type for dataset construction
#[derive(Error, Debug)]
pub enum MeshError {
    /// The upstream calculation reported a failure
    #[error("Calculation result reported status '{0}'")]
    CalculationFailed(String),

    /// Failed to parse the calculation result JSON
    #[error("Failed to parse calculation result: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A referenced prefecture or area could not be found
    #[error("Area not found: {prefecture}/{area}")]
    AreaNotFound { prefecture: String, area: String },
}

/// Type alias for Results using MeshError
pub type Result<T> = std::result::Result<T, MeshError>;
