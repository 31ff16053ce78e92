//! Core types shared across the cadenza workspace.
//!
//! - **[`Composition`]** - Normalized multi-track note input (bass/chord/melody)
//! - **[`AudioBuffer`]** - Stereo interleaved sample store with PCM conversion
//! - **[`RenderSettings`]** - Validated per-render configuration
//! - **[`RenderReport`]** - Non-fatal warnings and adjustments attached to a render
//!
//! No DSP lives here; the member crates (`cadenza-perform`, `cadenza-synth`,
//! `cadenza-dsp`) build on these types.

mod buffer;
mod error;
mod event;
mod note;
mod report;
mod settings;

pub use buffer::{AudioBuffer, BitDepth, CHANNELS};
pub use error::{Error, Result};
pub use event::{SoundEvent, VoiceRole};
pub use note::{Composition, InputNote, Track, TrackKind};
pub use report::{Adjustment, RenderReport, RenderWarning};
pub use settings::{
    DensityParams, DensityTier, PostStages, RenderMode, RenderSettings, SkillLevel,
};
