//! Technique definitions.
//!
//! Each technique is a tagged union of categories, each carrying its own
//! strongly typed parameter struct, matched exhaustively at application time.

use crate::performance::{Articulation, ExpressionTag};
use cadenza_core::{SkillLevel, TrackKind};

/// Parameters for a parallel-voice technique: one entry per emitted voice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParallelParams {
    /// Interval ratios relative to the primary frequency
    pub intervals: Vec<f64>,
    /// Velocity scale per voice; missing entries default to 1.0
    pub velocity_scales: Vec<f32>,
    /// Onset offset per voice in seconds; missing entries default to 0.0
    pub timing_offsets: Vec<f64>,
}

/// How an ornament technique decorates its note.
#[derive(Debug, Clone, PartialEq)]
pub enum OrnamentPattern {
    /// Single short note a fixed interval above the primary, shortly after
    /// the attack.
    Trill { interval: f64 },
    /// One or two short leading notes before the main attack (negative
    /// timing offsets).
    Leading { intervals: Vec<f64>, duration: f64 },
}

/// Parameters for an articulation technique.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticulationParams {
    /// Multiplier on the primary note duration
    pub duration_factor: f64,
    /// Multiplier on the primary note velocity
    pub velocity_factor: f32,
    /// Tag stamped on the note
    pub tag: Articulation,
}

/// A rapid rising run of short ornaments.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeParams {
    pub steps: usize,
    /// Frequency ratio between consecutive steps
    pub ratio_step: f64,
    /// Duration of each step in seconds
    pub step_duration: f64,
    /// Velocity drop per step
    pub velocity_step: u8,
}

/// Parameters for a composite technique: may add parallel voices, a cascade
/// of ornaments, and descriptive expression tags in one application.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeParams {
    pub parallel: Option<ParallelParams>,
    pub cascade: Option<CascadeParams>,
    pub tags: Vec<ExpressionTag>,
}

/// Technique category with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum TechniqueKind {
    Parallel(ParallelParams),
    Ornament(OrnamentPattern),
    Articulation(ArticulationParams),
    Composite(CompositeParams),
}

/// A named, catalog-registered playing technique. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct Technique {
    pub name: String,
    pub kind: TechniqueKind,
    /// Track kinds this technique suits
    pub tracks: Vec<TrackKind>,
    /// Minimum skill level required
    pub min_skill: SkillLevel,
    /// Relative complexity weight
    pub complexity: f32,
}

impl Technique {
    pub fn applies_to(&self, track: TrackKind) -> bool {
        self.tracks.contains(&track)
    }

    pub fn accessible_at(&self, skill: SkillLevel) -> bool {
        self.min_skill <= skill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_gating() {
        let tech = Technique {
            name: "cluster_harmony".into(),
            kind: TechniqueKind::Parallel(ParallelParams::default()),
            tracks: vec![TrackKind::Chord],
            min_skill: SkillLevel::Superhuman,
            complexity: 4.2,
        };
        assert!(!tech.accessible_at(SkillLevel::Virtuoso));
        assert!(tech.accessible_at(SkillLevel::Superhuman));
        assert!(tech.applies_to(TrackKind::Chord));
        assert!(!tech.applies_to(TrackKind::Melody));
    }
}
