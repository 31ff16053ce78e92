//! Centralized error type for the cadenza umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate
//! boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cadenza_core::Error),

    #[error("perform: {0}")]
    Perform(#[from] cadenza_perform::Error),

    #[error("synth: {0}")]
    Synth(#[from] cadenza_synth::Error),

    #[error("dsp: {0}")]
    Dsp(#[from] cadenza_dsp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
