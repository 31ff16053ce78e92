//! Voice flattening: expands a [`Performance`] into independent sound events.
//!
//! Pure transformation with no failure modes. The output is NOT time-sorted;
//! ordering, if needed, is the synthesis engine's concern.

use crate::performance::{scale_velocity, Performance};
use cadenza_core::{SoundEvent, VoiceRole};

/// Expand every performance note into its primary tone(s), parallel voices
/// and ornaments.
///
/// Chord notes emit one primary event per chord tone; parallel voices are
/// computed from the first chord tone.
pub fn flatten(performance: &Performance) -> Vec<SoundEvent> {
    let mut events = Vec::new();

    for note in &performance.notes {
        for &frequency in &note.frequencies {
            events.push(SoundEvent {
                start_time: note.start_time,
                frequency,
                duration: note.duration,
                velocity: note.velocity,
                role: VoiceRole::Primary,
            });
        }

        let base = note.primary_frequency();
        for voice in &note.parallel_voices {
            events.push(SoundEvent {
                start_time: note.start_time + voice.timing_offset,
                frequency: base * voice.interval_ratio,
                duration: note.duration,
                velocity: scale_velocity(note.velocity, voice.velocity_scale),
                role: VoiceRole::Parallel,
            });
        }

        for ornament in &note.ornaments {
            events.push(SoundEvent {
                start_time: note.start_time + ornament.timing_offset,
                frequency: ornament.frequency,
                duration: ornament.duration,
                velocity: ornament.velocity,
                role: VoiceRole::Ornament,
            });
        }
    }

    events
}
