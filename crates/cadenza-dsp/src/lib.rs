//! Post-processing stages applied in place to a finished mix:
//! reverb, then compression, then limiting, each optional.
//!
//! Stages never change the sample count or sample rate. [`PostChain`] wires
//! them in the fixed order from the render settings.

mod chain;
mod dynamics;
mod error;
mod reverb;

pub use chain::PostChain;
pub use dynamics::{PeakLimiter, SoftCompressor};
pub use error::{Error, Result};
pub use reverb::FeedbackDelayReverb;
