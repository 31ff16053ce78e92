//! Synthesis engine: renders flattened sound events into a stereo buffer.
//!
//! - **[`SynthesisEngine`]** - Event list in, mixed [`AudioBuffer`] out
//! - **[`ToneGenerator`]** - Pluggable per-event waveform source
//! - **[`HarmonicTone`]** - Built-in fundamental + 2 harmonics + ADSR model
//! - **[`enforce_polyphony`]** - Velocity-keyed voice stealing
//!
//! Real-time mode accumulates on the calling thread; high-quality mode fans
//! waveform generation out across scoped worker threads and mixes the
//! fragments in deterministic event order, so both strategies produce
//! bit-identical buffers.
//!
//! [`AudioBuffer`]: cadenza_core::AudioBuffer

mod engine;
mod envelope;
mod error;
mod steal;
mod tone;

pub use engine::{ProgressFn, SynthOutput, SynthesisEngine, EVENT_BATCH};
pub use envelope::AdsrEnvelope;
pub use error::{Error, Result};
pub use steal::enforce_polyphony;
pub use tone::{HarmonicTone, ToneGenerator};
