//! Immutable technique registry.
//!
//! Techniques are stored in insertion order with a name index on top, so
//! `list_applicable` iterates deterministically; selection under a fixed seed
//! is then reproducible.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::performance::{Articulation, ExpressionTag};
use crate::technique::{
    ArticulationParams, CascadeParams, CompositeParams, OrnamentPattern, ParallelParams,
    Technique, TechniqueKind,
};
use cadenza_core::{SkillLevel, TrackKind};

/// Registry of named playing techniques. Lookups never mutate the catalog.
#[derive(Debug, Clone, Default)]
pub struct TechniqueCatalog {
    entries: Vec<Technique>,
    index: HashMap<String, usize>,
}

impl TechniqueCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog: parallel intervals, ornaments, articulations and
    /// composite techniques with their canonical parameters.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.insert(Technique {
            name: "thirds_parallel".into(),
            kind: TechniqueKind::Parallel(ParallelParams {
                intervals: vec![5.0 / 4.0],
                velocity_scales: vec![0.8],
                timing_offsets: vec![0.0],
            }),
            tracks: vec![TrackKind::Melody],
            min_skill: SkillLevel::Basic,
            complexity: 1.5,
        });

        catalog.insert(Technique {
            name: "fifths_parallel".into(),
            kind: TechniqueKind::Parallel(ParallelParams {
                intervals: vec![3.0 / 2.0],
                velocity_scales: vec![0.9],
                timing_offsets: vec![0.0],
            }),
            tracks: vec![TrackKind::Melody, TrackKind::Bass],
            min_skill: SkillLevel::Basic,
            complexity: 1.8,
        });

        catalog.insert(Technique {
            name: "octave_doubling".into(),
            kind: TechniqueKind::Parallel(ParallelParams {
                intervals: vec![2.0, 0.5],
                velocity_scales: vec![0.7, 0.6],
                timing_offsets: vec![0.0, 0.0],
            }),
            tracks: vec![TrackKind::Melody, TrackKind::Bass],
            min_skill: SkillLevel::Advanced,
            complexity: 2.2,
        });

        // Staggered third+fifth+seventh stack, slight per-voice delay
        catalog.insert(Technique {
            name: "chord_cascade".into(),
            kind: TechniqueKind::Parallel(ParallelParams {
                intervals: vec![5.0 / 4.0, 3.0 / 2.0, 15.0 / 8.0],
                velocity_scales: vec![0.8, 0.9, 0.7],
                timing_offsets: vec![0.02, 0.04, 0.06],
            }),
            tracks: vec![TrackKind::Melody],
            min_skill: SkillLevel::Virtuoso,
            complexity: 3.5,
        });

        catalog.insert(Technique {
            name: "cluster_harmony".into(),
            kind: TechniqueKind::Parallel(ParallelParams {
                intervals: vec![9.0 / 8.0, 5.0 / 4.0, 11.0 / 8.0, 3.0 / 2.0],
                velocity_scales: vec![0.6, 0.7, 0.8, 0.9],
                timing_offsets: vec![0.0, 0.0, 0.0, 0.0],
            }),
            tracks: vec![TrackKind::Chord],
            min_skill: SkillLevel::Superhuman,
            complexity: 4.2,
        });

        catalog.insert(Technique {
            name: "trill".into(),
            kind: TechniqueKind::Ornament(OrnamentPattern::Trill {
                interval: 9.0 / 8.0,
            }),
            tracks: vec![TrackKind::Melody],
            min_skill: SkillLevel::Advanced,
            complexity: 2.0,
        });

        catalog.insert(Technique {
            name: "grace_notes".into(),
            kind: TechniqueKind::Ornament(OrnamentPattern::Leading {
                intervals: vec![9.0 / 8.0, 5.0 / 4.0],
                duration: 0.05,
            }),
            tracks: vec![TrackKind::Melody],
            min_skill: SkillLevel::Basic,
            complexity: 1.3,
        });

        catalog.insert(Technique {
            name: "staccato_burst".into(),
            kind: TechniqueKind::Articulation(ArticulationParams {
                duration_factor: 0.5,
                velocity_factor: 1.2,
                tag: Articulation::Staccato,
            }),
            tracks: vec![TrackKind::Melody, TrackKind::Chord],
            min_skill: SkillLevel::Advanced,
            complexity: 1.8,
        });

        catalog.insert(Technique {
            name: "legato_flow".into(),
            kind: TechniqueKind::Articulation(ArticulationParams {
                duration_factor: 1.1,
                velocity_factor: 0.9,
                tag: Articulation::Legato,
            }),
            tracks: vec![TrackKind::Melody],
            min_skill: SkillLevel::Basic,
            complexity: 1.2,
        });

        // Five rising steps fired off the note attack
        catalog.insert(Technique {
            name: "cascade_run".into(),
            kind: TechniqueKind::Composite(CompositeParams {
                parallel: None,
                cascade: Some(CascadeParams {
                    steps: 5,
                    ratio_step: 1.2,
                    step_duration: 0.05,
                    velocity_step: 10,
                }),
                tags: vec![ExpressionTag::Cascade],
            }),
            tracks: vec![TrackKind::Melody],
            min_skill: SkillLevel::Superhuman,
            complexity: 4.5,
        });

        // Simultaneous third/fifth/octave jumps with micro-staggered onsets
        catalog.insert(Technique {
            name: "interval_leap".into(),
            kind: TechniqueKind::Composite(CompositeParams {
                parallel: Some(ParallelParams {
                    intervals: vec![5.0 / 4.0, 3.0 / 2.0, 2.0],
                    velocity_scales: vec![0.8, 0.7, 0.6],
                    timing_offsets: vec![0.0, 0.02, 0.04],
                }),
                cascade: None,
                tags: vec![ExpressionTag::Leap],
            }),
            tracks: vec![TrackKind::Melody, TrackKind::Chord],
            min_skill: SkillLevel::Superhuman,
            complexity: 4.8,
        });

        // Strong low-octave counter voice
        catalog.insert(Technique {
            name: "octave_contrast".into(),
            kind: TechniqueKind::Composite(CompositeParams {
                parallel: Some(ParallelParams {
                    intervals: vec![0.5],
                    velocity_scales: vec![1.5],
                    timing_offsets: vec![0.0],
                }),
                cascade: None,
                tags: vec![ExpressionTag::Contrast],
            }),
            tracks: vec![TrackKind::Bass, TrackKind::Chord],
            min_skill: SkillLevel::Virtuoso,
            complexity: 3.2,
        });

        catalog
    }

    /// Register a technique. Replaces any existing entry with the same name.
    pub fn insert(&mut self, technique: Technique) {
        if let Some(&i) = self.index.get(&technique.name) {
            self.entries[i] = technique;
        } else {
            self.index
                .insert(technique.name.clone(), self.entries.len());
            self.entries.push(technique);
        }
    }

    /// Look up a technique by name.
    pub fn lookup(&self, name: &str) -> Result<&Technique> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| Error::UnknownTechnique(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Techniques suited to a track and reachable at a skill level, in
    /// registration order.
    pub fn list_applicable(&self, track: TrackKind, skill: SkillLevel) -> Vec<&Technique> {
        self.entries
            .iter()
            .filter(|t| t.applies_to(track) && t.accessible_at(skill))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All technique names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|t| t.name.as_str())
    }
}
