//! Error types for cadenza-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Render settings failed validation (fatal; reported before any allocation)
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Input data failed a structural precondition
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
