//! Error types for cadenza-perform

use thiserror::Error;

/// Performance rendering error type
#[derive(Error, Debug)]
pub enum Error {
    /// Technique name not present in the catalog
    #[error("unknown technique: {0}")]
    UnknownTechnique(String),

    /// Expression contour name not recognized
    #[error("unknown expression contour: {0}")]
    UnknownContour(String),

    /// A note had no usable frequency for interval-based techniques
    #[error("note has no positive primary frequency")]
    MissingFrequency,

    /// A technique carried an unusable interval ratio
    #[error("invalid interval ratio: {0}")]
    InvalidInterval(f64),
}

/// Result type for performance operations
pub type Result<T> = std::result::Result<T, Error>;
