//! Applies catalog techniques and an expression contour to a composition.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::catalog::TechniqueCatalog;
use crate::error::{Error, Result};
use crate::expression::{ExpressionContour, PhraseShaping};
use crate::performance::{
    scale_velocity, ExpressionTag, Ornament, OrnamentKind, ParallelVoice, Performance,
    PerformanceNote, PerformanceStats,
};
use crate::technique::{CascadeParams, OrnamentPattern, ParallelParams, Technique, TechniqueKind};
use cadenza_core::{Composition, DensityTier, RenderWarning, SkillLevel, TrackKind};

/// Floor for articulation-shortened notes, seconds.
const MIN_NOTE_DURATION: f64 = 0.01;

/// Accent boost lands on every Nth note position.
const ACCENT_INTERVAL: usize = 6;

/// At most this many leading grace notes per ornament application.
const MAX_LEADING_ORNAMENTS: usize = 2;

/// Renders a [`Composition`] into an embellished [`Performance`].
///
/// Stateless between calls; all randomness comes from the seeded source
/// passed to [`render`](Self::render), so a fixed seed reproduces the
/// performance exactly.
#[derive(Debug, Clone)]
pub struct PerformanceRenderer {
    skill: SkillLevel,
    density: DensityTier,
    contour: ExpressionContour,
    max_parallel_voices: usize,
}

impl PerformanceRenderer {
    /// Create a renderer. The parallel-voice cap defaults to the density
    /// tier's limit.
    pub fn new(skill: SkillLevel, density: DensityTier) -> Self {
        Self {
            skill,
            density,
            contour: ExpressionContour::default(),
            max_parallel_voices: density.params().max_parallel_voices,
        }
    }

    /// Select the expression contour applied in the second pass.
    pub fn with_contour(mut self, contour: ExpressionContour) -> Self {
        self.contour = contour;
        self
    }

    /// Override the per-note parallel-voice cap (normally the render settings
    /// value, kept in lockstep with the density tier by the mode controller).
    pub fn with_max_parallel_voices(mut self, cap: usize) -> Self {
        self.max_parallel_voices = cap;
        self
    }

    pub fn skill(&self) -> SkillLevel {
        self.skill
    }

    pub fn density(&self) -> DensityTier {
        self.density
    }

    /// Render the full performance.
    ///
    /// `techniques` overrides automatic selection with an explicit list;
    /// unknown names in it are reported as warnings and skipped. Per-note
    /// technique failures are logged and the note falls back to its
    /// unmodified form; they never abort the batch.
    pub fn render<R: Rng>(
        &self,
        composition: &Composition,
        catalog: &TechniqueCatalog,
        techniques: Option<&[String]>,
        rng: &mut R,
    ) -> (Performance, Vec<RenderWarning>) {
        let mut warnings = Vec::new();

        let selected: Vec<String> = match techniques {
            Some(list) => {
                let mut known = Vec::new();
                for name in list {
                    if catalog.contains(name) {
                        known.push(name.clone());
                    } else {
                        warn!(technique = %name, "technique not in catalog, skipping");
                        warnings.push(RenderWarning::UnknownTechnique { name: name.clone() });
                    }
                }
                known
            }
            None => self.auto_select(&composition.style, catalog, rng),
        };
        debug!(?selected, skill = self.skill.as_str(), "rendering performance");

        let params = self.density.params();
        let mut notes = Vec::with_capacity(composition.note_count());

        for track in TrackKind::ALL {
            let applicable: Vec<&Technique> = selected
                .iter()
                .filter_map(|name| catalog.lookup(name).ok())
                .filter(|t| {
                    t.applies_to(track)
                        && t.accessible_at(self.skill)
                        && t.complexity <= params.max_complexity
                })
                .collect();

            let track_notes = &composition.track(track).notes;
            let total = track_notes.len();

            for (i, input) in track_notes.iter().enumerate() {
                let mut note = PerformanceNote::from_input(track, input);

                let roll = rng.gen::<f64>();
                if roll < params.technique_probability && !applicable.is_empty() {
                    let technique = applicable[rng.gen_range(0..applicable.len())];

                    // Ornament techniques fire only with the density tier's
                    // ornament probability; other categories apply directly.
                    let gated_out = matches!(technique.kind, TechniqueKind::Ornament(_))
                        && rng.gen::<f64>() >= params.ornament_probability;

                    if !gated_out {
                        if let Err(e) = self.apply_technique(&mut note, technique) {
                            warn!(
                                technique = %technique.name,
                                note_index = i,
                                error = %e,
                                "technique application failed, using unmodified note"
                            );
                            warnings.push(RenderWarning::TechniqueFailed {
                                technique: technique.name.clone(),
                                note_index: i,
                                reason: e.to_string(),
                            });
                            note = PerformanceNote::from_input(track, input);
                        }
                    }
                }

                self.apply_expression(&mut note, i, total, rng);
                notes.push(note);
            }
        }

        let max_simultaneous_voices = notes.iter().map(PerformanceNote::voice_count).max();
        let mean_complexity = if notes.is_empty() {
            0.0
        } else {
            notes.iter().map(PerformanceNote::complexity).sum::<f32>() / notes.len() as f32
        };

        let performance = Performance {
            notes,
            stats: PerformanceStats {
                skill: self.skill,
                techniques_applied: selected,
                max_simultaneous_voices: max_simultaneous_voices.unwrap_or(0),
                mean_complexity,
            },
        };
        (performance, warnings)
    }

    /// Apply one technique to one note.
    ///
    /// Exposed for single-note exploration; the batch path in
    /// [`render`](Self::render) adds probability gating around this.
    pub fn apply_technique(&self, note: &mut PerformanceNote, technique: &Technique) -> Result<()> {
        match &technique.kind {
            TechniqueKind::Parallel(p) => self.apply_parallel(note, &technique.name, p),
            TechniqueKind::Ornament(pattern) => Self::apply_ornament(note, pattern),
            TechniqueKind::Articulation(a) => {
                note.articulation = a.tag;
                note.duration = (note.duration * a.duration_factor).max(MIN_NOTE_DURATION);
                note.velocity = scale_velocity(note.velocity, a.velocity_factor);
                Ok(())
            }
            TechniqueKind::Composite(c) => {
                if let Some(p) = &c.parallel {
                    self.apply_parallel(note, &technique.name, p)?;
                }
                if let Some(cascade) = &c.cascade {
                    Self::apply_cascade(note, cascade)?;
                }
                note.expression.extend(c.tags.iter().copied());
                Ok(())
            }
        }
    }

    fn apply_parallel(
        &self,
        note: &mut PerformanceNote,
        name: &str,
        params: &ParallelParams,
    ) -> Result<()> {
        if note.primary_frequency() <= 0.0 {
            return Err(Error::MissingFrequency);
        }
        for (i, &interval) in params
            .intervals
            .iter()
            .enumerate()
            .take(self.max_parallel_voices)
        {
            if interval <= 0.0 {
                return Err(Error::InvalidInterval(interval));
            }
            note.parallel_voices.push(ParallelVoice {
                interval_ratio: interval,
                velocity_scale: params.velocity_scales.get(i).copied().unwrap_or(1.0),
                timing_offset: params.timing_offsets.get(i).copied().unwrap_or(0.0),
                label: format!("{}_{}", name, i + 1),
            });
        }
        Ok(())
    }

    fn apply_ornament(note: &mut PerformanceNote, pattern: &OrnamentPattern) -> Result<()> {
        let base = note.primary_frequency();
        if base <= 0.0 {
            return Err(Error::MissingFrequency);
        }
        match pattern {
            OrnamentPattern::Trill { interval } => {
                note.ornaments.push(Ornament {
                    kind: OrnamentKind::Trill,
                    frequency: base * interval,
                    duration: 0.1,
                    velocity: (note.velocity / 2).max(1),
                    timing_offset: 0.05,
                });
            }
            OrnamentPattern::Leading {
                intervals,
                duration,
            } => {
                for (i, &interval) in intervals.iter().take(MAX_LEADING_ORNAMENTS).enumerate() {
                    note.ornaments.push(Ornament {
                        kind: OrnamentKind::GraceNote,
                        frequency: base * interval,
                        duration: *duration,
                        velocity: (note.velocity / 3).max(1),
                        timing_offset: -0.1 - i as f64 * 0.05,
                    });
                }
            }
        }
        Ok(())
    }

    fn apply_cascade(note: &mut PerformanceNote, params: &CascadeParams) -> Result<()> {
        let base = note.primary_frequency();
        if base <= 0.0 {
            return Err(Error::MissingFrequency);
        }
        for i in 0..params.steps {
            let drop = (i as u32 * params.velocity_step as u32).min(u8::MAX as u32) as u8;
            note.ornaments.push(Ornament {
                kind: OrnamentKind::Cascade,
                frequency: base * params.ratio_step.powi(i as i32),
                duration: params.step_duration,
                velocity: note.velocity.saturating_sub(drop).max(1),
                timing_offset: i as f64 * params.step_duration,
            });
        }
        Ok(())
    }

    fn apply_expression<R: Rng>(
        &self,
        note: &mut PerformanceNote,
        position: usize,
        total: usize,
        rng: &mut R,
    ) {
        let variation = self.contour.velocity_variation;
        let factor = 1.0 + rng.gen_range(-variation..=variation);
        note.velocity = scale_velocity(note.velocity, factor);

        if total > 0 {
            let ratio = position as f64 / total as f64;
            match self.contour.shaping {
                PhraseShaping::Gentle => {
                    if (0.2..=0.8).contains(&ratio) {
                        note.expression.push(ExpressionTag::GentleEmphasis);
                    }
                }
                PhraseShaping::Bold => {
                    if ratio < 0.1 || ratio > 0.9 {
                        note.expression.push(ExpressionTag::BoldAccent);
                    }
                }
                PhraseShaping::Floating => note.expression.push(ExpressionTag::Ethereal),
                PhraseShaping::Flat => {}
            }
        }

        if position % ACCENT_INTERVAL == 0 && self.contour.accent_strength > 1.0 {
            note.expression.push(ExpressionTag::Accent);
            note.velocity = scale_velocity(note.velocity, self.contour.accent_strength);
        }
    }

    /// Choose a technique list from the composition's style tag.
    fn auto_select<R: Rng>(
        &self,
        style: &str,
        catalog: &TechniqueCatalog,
        rng: &mut R,
    ) -> Vec<String> {
        let candidates: &[&str] = if style.contains("calm") || style.contains("meditation") {
            &["legato_flow", "thirds_parallel", "grace_notes"]
        } else if style.contains("dynamic") || style.contains("dance") {
            &["staccato_burst", "octave_doubling", "interval_leap"]
        } else if style.contains("harmonic") {
            &["chord_cascade", "cluster_harmony", "fifths_parallel"]
        } else {
            &["thirds_parallel", "grace_notes", "octave_doubling"]
        };

        let max_techniques = match self.density {
            DensityTier::Sparse => 2,
            DensityTier::Moderate => 3,
            DensityTier::Rich => 4,
            DensityTier::Extreme => 6,
        };

        let available: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|name| {
                catalog
                    .lookup(name)
                    .map(|t| t.accessible_at(self.skill))
                    .unwrap_or(false)
            })
            .collect();

        let count = available.len().min(max_techniques);
        let mut selected: Vec<String> = available
            .choose_multiple(rng, count)
            .map(|s| s.to_string())
            .collect();

        if self.skill == SkillLevel::Superhuman {
            for special in ["cascade_run", "interval_leap"] {
                if selected.len() >= max_techniques {
                    break;
                }
                if catalog.contains(special) && !selected.iter().any(|s| s == special) {
                    selected.push(special.to_string());
                }
            }
        }

        selected
    }
}
