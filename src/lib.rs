//! # Cadenza - Performance Rendering and Synthesis Engine
//!
//! Turns a symbolic multi-track composition (timed notes on bass/chord/melody
//! tracks) into an embellished performance and sample-accurate stereo audio.
//!
//! ## Architecture
//!
//! Cadenza is an umbrella crate that coordinates:
//! - **cadenza-core** - Note model, audio buffer, render settings, warnings
//! - **cadenza-perform** - Technique catalog, performance renderer,
//!   expression contours, voice flattener
//! - **cadenza-synth** - Envelope synthesis, harmonic tone model, voice
//!   stealing, additive mixing
//! - **cadenza-dsp** - Post-processing chain (reverb, compressor, limiter)
//!
//! ## Quick Start
//!
//! ```
//! use cadenza::prelude::*;
//!
//! let mut composition = Composition::new("balanced");
//! composition.push_note(TrackKind::Melody, InputNote::tone(0.0, 1.0, 100, 440.0));
//!
//! let renderer = CadenzaRenderer::new();
//! let output = renderer
//!     .render(&composition, &RenderRequest::standard(), 42)
//!     .expect("render");
//!
//! assert!(output.buffer.sample_count() > 0);
//! assert!(!output.report.incomplete);
//! ```
//!
//! Renders are deterministic: the same composition, request and seed always
//! produce a bit-identical buffer.

/// Re-export of cadenza-core for direct access
pub use cadenza_core as core;

pub use cadenza_core::{
    Adjustment, AudioBuffer, BitDepth, Composition, DensityTier, InputNote, PostStages,
    RenderMode, RenderReport, RenderSettings, RenderWarning, SkillLevel, SoundEvent, Track,
    TrackKind, VoiceRole, CHANNELS,
};

/// Performance subsystem
pub use cadenza_perform as perform;

pub use cadenza_perform::{
    flatten, ExpressionContour, Performance, PerformanceNote, PerformanceRenderer,
    PerformanceStatistics, PerformanceStats, PhraseShaping, Technique, TechniqueCatalog,
    TechniqueKind,
};

/// Synthesis subsystem
pub use cadenza_synth as synth;

pub use cadenza_synth::{AdsrEnvelope, HarmonicTone, SynthesisEngine, ToneGenerator};

/// Post-processing subsystem
pub use cadenza_dsp as dsp;

pub use cadenza_dsp::{FeedbackDelayReverb, PeakLimiter, PostChain, SoftCompressor};

mod builder;
mod controller;
mod engine;
mod error;

pub use builder::CadenzaRendererBuilder;
pub use controller::{RenderModeController, RenderRequest};
pub use engine::{CadenzaRenderer, PipelineStage, RenderOptions, RenderOutput, RenderProgress};
pub use error::{Error, Result};

/// Common imports for typical use.
pub mod prelude {
    pub use crate::{
        AudioBuffer, BitDepth, CadenzaRenderer, Composition, DensityTier, InputNote, PostStages,
        RenderMode, RenderOptions, RenderRequest, SkillLevel, TrackKind,
    };
}
