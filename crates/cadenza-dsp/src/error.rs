//! Error types for cadenza-dsp

use thiserror::Error;

/// DSP configuration error type
#[derive(Error, Debug)]
pub enum Error {
    /// A stage parameter was outside its stable range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for DSP operations
pub type Result<T> = std::result::Result<T, Error>;
