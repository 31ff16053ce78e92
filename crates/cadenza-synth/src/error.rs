//! Error types for cadenza-synth

use thiserror::Error;

/// Synthesis error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid render settings (fatal, raised before buffer allocation)
    #[error(transparent)]
    Core(#[from] cadenza_core::Error),

    /// No tone generator available and the built-in fallback is disabled
    #[error("no tone generator configured")]
    NoToneSource,
}

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, Error>;
