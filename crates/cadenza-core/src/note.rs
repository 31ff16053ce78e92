//! Normalized note input model.
//!
//! The composition subsystem feeds us ordered note lists per track. Everything
//! is normalized into [`InputNote`] at this boundary so the rest of the
//! pipeline never branches on note shape.

use serde::{Deserialize, Serialize};

/// Which track a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Bass,
    Chord,
    Melody,
}

impl TrackKind {
    /// All track kinds, in pipeline processing order.
    pub const ALL: [TrackKind; 3] = [TrackKind::Bass, TrackKind::Chord, TrackKind::Melody];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Bass => "bass",
            TrackKind::Chord => "chord",
            TrackKind::Melody => "melody",
        }
    }
}

/// A single timed note as produced by the composition subsystem.
///
/// `frequencies` holds one entry for a plain tone and several for a chord.
/// Velocity follows the MIDI convention (0-127).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputNote {
    /// Absolute onset time in seconds
    pub start_time: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Velocity, 0-127
    pub velocity: u8,
    /// One frequency (Hz) for a tone, several for a chord
    pub frequencies: Vec<f64>,
}

impl InputNote {
    /// Create a single-frequency note.
    pub fn tone(start_time: f64, duration: f64, velocity: u8, frequency: f64) -> Self {
        Self {
            start_time,
            duration,
            velocity,
            frequencies: vec![frequency],
        }
    }

    /// Create a chord note from a frequency set.
    pub fn chord(start_time: f64, duration: f64, velocity: u8, frequencies: Vec<f64>) -> Self {
        Self {
            start_time,
            duration,
            velocity,
            frequencies,
        }
    }

    /// The first (lowest-index) frequency; interval-based techniques are
    /// computed relative to this.
    pub fn primary_frequency(&self) -> Option<f64> {
        self.frequencies.first().copied()
    }

    /// End time in seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// An ordered note sequence on one track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub notes: Vec<InputNote>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<InputNote>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// A multi-track composition: bass, chord and melody tracks plus a free-form
/// style tag used for automatic technique selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Composition {
    /// Style tag from the composer, e.g. "calm_meditation" or "dynamic_dance"
    pub style: String,
    pub bass: Track,
    pub chord: Track,
    pub melody: Track,
}

impl Composition {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            ..Default::default()
        }
    }

    pub fn track(&self, kind: TrackKind) -> &Track {
        match kind {
            TrackKind::Bass => &self.bass,
            TrackKind::Chord => &self.chord,
            TrackKind::Melody => &self.melody,
        }
    }

    pub fn track_mut(&mut self, kind: TrackKind) -> &mut Track {
        match kind {
            TrackKind::Bass => &mut self.bass,
            TrackKind::Chord => &mut self.chord,
            TrackKind::Melody => &mut self.melody,
        }
    }

    /// Push a note onto the given track.
    pub fn push_note(&mut self, kind: TrackKind, note: InputNote) -> &mut Self {
        self.track_mut(kind).notes.push(note);
        self
    }

    /// Total number of notes across all tracks.
    pub fn note_count(&self) -> usize {
        TrackKind::ALL.iter().map(|k| self.track(*k).len()).sum()
    }

    /// Duration of the composition: the latest note end across all tracks.
    pub fn total_duration_seconds(&self) -> f64 {
        TrackKind::ALL
            .iter()
            .flat_map(|k| self.track(*k).notes.iter())
            .map(InputNote::end_time)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_has_single_frequency() {
        let note = InputNote::tone(0.0, 1.0, 100, 440.0);
        assert_eq!(note.primary_frequency(), Some(440.0));
        assert_eq!(note.frequencies.len(), 1);
    }

    #[test]
    fn test_total_duration_spans_all_tracks() {
        let mut comp = Composition::new("test");
        comp.push_note(TrackKind::Bass, InputNote::tone(0.0, 2.0, 80, 110.0));
        comp.push_note(TrackKind::Melody, InputNote::tone(1.5, 1.0, 100, 440.0));

        assert_eq!(comp.note_count(), 2);
        assert_eq!(comp.total_duration_seconds(), 2.5);
    }

    #[test]
    fn test_empty_composition_has_zero_duration() {
        let comp = Composition::new("empty");
        assert_eq!(comp.total_duration_seconds(), 0.0);
    }
}
