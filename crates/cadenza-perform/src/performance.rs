//! The embellished performance data model.

use cadenza_core::{InputNote, SkillLevel, TrackKind};

/// Scale a MIDI velocity by a factor, truncating and clamping to 1-127.
pub(crate) fn scale_velocity(velocity: u8, factor: f32) -> u8 {
    ((velocity as f32 * factor) as i32).clamp(1, 127) as u8
}

/// Articulation applied to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Articulation {
    #[default]
    Normal,
    Staccato,
    Legato,
}

/// Descriptive expression tags attached by techniques and the contour pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionTag {
    /// Velocity boost on a metric accent position
    Accent,
    /// Mid-phrase emphasis from a gentle contour
    GentleEmphasis,
    /// Phrase-edge emphasis from a bold contour
    BoldAccent,
    /// Floating contour marking
    Ethereal,
    /// Rising ornament run
    Cascade,
    /// Wide simultaneous interval jumps
    Leap,
    /// Registral contrast voice
    Contrast,
}

/// Ornament note kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrnamentKind {
    Trill,
    GraceNote,
    Cascade,
}

/// A parallel voice sounding alongside a primary note.
///
/// Owned by exactly one [`PerformanceNote`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelVoice {
    /// Frequency ratio relative to the primary frequency
    pub interval_ratio: f64,
    /// Velocity scale relative to the primary velocity
    pub velocity_scale: f32,
    /// Onset offset in seconds
    pub timing_offset: f64,
    pub label: String,
}

/// A short decorative note attached to a primary note.
///
/// Owned by exactly one [`PerformanceNote`]. `timing_offset` is relative to
/// the parent onset and may be negative (leading grace notes).
#[derive(Debug, Clone, PartialEq)]
pub struct Ornament {
    pub kind: OrnamentKind,
    /// Absolute frequency in Hz
    pub frequency: f64,
    pub duration: f64,
    pub velocity: u8,
    pub timing_offset: f64,
}

/// One input note plus everything the performance renderer attached to it.
///
/// Immutable once emitted by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceNote {
    pub track: TrackKind,
    pub start_time: f64,
    pub duration: f64,
    /// One frequency for a tone, several for a chord
    pub frequencies: Vec<f64>,
    pub velocity: u8,
    pub parallel_voices: Vec<ParallelVoice>,
    pub ornaments: Vec<Ornament>,
    pub articulation: Articulation,
    pub expression: Vec<ExpressionTag>,
}

impl PerformanceNote {
    /// Wrap an input note with no techniques applied.
    pub fn from_input(track: TrackKind, note: &InputNote) -> Self {
        Self {
            track,
            start_time: note.start_time,
            duration: note.duration,
            frequencies: note.frequencies.clone(),
            velocity: note.velocity,
            parallel_voices: Vec::new(),
            ornaments: Vec::new(),
            articulation: Articulation::Normal,
            expression: Vec::new(),
        }
    }

    /// The frequency interval-based techniques are computed from.
    pub fn primary_frequency(&self) -> f64 {
        self.frequencies.first().copied().unwrap_or(0.0)
    }

    /// Simultaneous voices this note contributes (primary + parallels).
    pub fn voice_count(&self) -> usize {
        1 + self.parallel_voices.len()
    }

    /// Per-note complexity: 1 + 0.5 per parallel voice + 0.3 per ornament.
    pub fn complexity(&self) -> f32 {
        1.0 + 0.5 * self.parallel_voices.len() as f32 + 0.3 * self.ornaments.len() as f32
    }
}

/// Aggregate metadata for one rendered performance.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceStats {
    pub skill: SkillLevel,
    /// Names of techniques selected for this render
    pub techniques_applied: Vec<String>,
    /// Max over all notes of (1 + parallel voice count)
    pub max_simultaneous_voices: usize,
    /// Mean of per-note complexity
    pub mean_complexity: f32,
}

/// The embellished, technique-applied representation of a composition.
///
/// Lifetime spans one render request: produced by the performance renderer,
/// consumed by the voice flattener.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    /// All notes across all tracks, in track order (bass, chord, melody) and
    /// sequence order within each track.
    pub notes: Vec<PerformanceNote>,
    pub stats: PerformanceStats,
}

/// Detailed statistics derived from a performance.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceStatistics {
    pub parallel_voice_total: usize,
    pub ornament_total: usize,
    pub average_voices_per_note: f64,
    /// Ornaments per second of performance time
    pub ornament_density: f64,
    /// True for skill levels a human performer could manage
    pub humanly_playable: bool,
}

impl Performance {
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Latest note end across the performance, ornaments included.
    pub fn total_duration_seconds(&self) -> f64 {
        self.notes
            .iter()
            .flat_map(|n| {
                let note_end = n.start_time + n.duration;
                let ornament_end = n
                    .ornaments
                    .iter()
                    .map(|o| n.start_time + o.timing_offset + o.duration)
                    .fold(0.0, f64::max);
                [note_end, ornament_end]
            })
            .fold(0.0, f64::max)
    }

    pub fn statistics(&self) -> PerformanceStatistics {
        let parallel_voice_total: usize =
            self.notes.iter().map(|n| n.parallel_voices.len()).sum();
        let ornament_total: usize = self.notes.iter().map(|n| n.ornaments.len()).sum();
        let duration = self.total_duration_seconds();
        PerformanceStatistics {
            parallel_voice_total,
            ornament_total,
            average_voices_per_note: if self.notes.is_empty() {
                0.0
            } else {
                self.notes.iter().map(|n| n.voice_count()).sum::<usize>() as f64
                    / self.notes.len() as f64
            },
            ornament_density: if duration > 0.0 {
                ornament_total as f64 / duration
            } else {
                0.0
            },
            humanly_playable: matches!(self.stats.skill, SkillLevel::Basic | SkillLevel::Advanced),
        }
    }
}
