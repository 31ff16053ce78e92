//! Performance rendering: turns a plain multi-track composition into an
//! embellished [`Performance`] and flattens it into independent sound events.
//!
//! - **[`TechniqueCatalog`]** - Immutable registry of named playing techniques
//! - **[`PerformanceRenderer`]** - Applies techniques and an expression contour
//! - **[`ExpressionContour`]** - Named dynamic-shaping profiles
//! - **[`flatten`]** - Expands a performance into per-voice [`SoundEvent`]s
//!
//! Technique selection is driven by an explicit seeded random source threaded
//! through [`PerformanceRenderer::render`], so identical inputs and seed give
//! identical output.

mod catalog;
mod error;
mod expression;
mod flatten;
mod performance;
mod renderer;
mod technique;

pub use catalog::TechniqueCatalog;
pub use error::{Error, Result};
pub use expression::{ExpressionContour, PhraseShaping};
pub use cadenza_core::{SoundEvent, VoiceRole};
pub use flatten::flatten;
pub use performance::{
    Articulation, ExpressionTag, Ornament, OrnamentKind, ParallelVoice, Performance,
    PerformanceNote, PerformanceStatistics, PerformanceStats,
};
pub use renderer::PerformanceRenderer;
pub use technique::{
    ArticulationParams, CascadeParams, CompositeParams, OrnamentPattern, ParallelParams,
    Technique, TechniqueKind,
};
