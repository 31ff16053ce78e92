//! Polyphony enforcement by greedy voice stealing.

use cadenza_core::SoundEvent;

/// Cap simultaneous voices at `max_polyphony` by dropping the lowest-velocity
/// event active in any overlapping window.
///
/// Events are swept in start-time order. When admitting an event would exceed
/// the cap, the weakest voice (lowest velocity, ties broken by earliest start,
/// then sweep order) among the active set and the candidate is dropped.
/// Returns the surviving events sorted by start time, plus the drop count.
pub fn enforce_polyphony(
    mut events: Vec<SoundEvent>,
    max_polyphony: usize,
) -> (Vec<SoundEvent>, usize) {
    events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    if events.len() <= max_polyphony {
        return (events, 0);
    }

    /// Active-voice bookkeeping: slot in `kept` plus the fields stealing
    /// decisions read.
    struct ActiveVoice {
        slot: usize,
        end_time: f64,
        velocity: u8,
        start_time: f64,
    }

    // Provisionally kept events; stolen slots become None.
    let mut kept: Vec<Option<SoundEvent>> = Vec::with_capacity(events.len());
    let mut active: Vec<ActiveVoice> = Vec::new();
    let mut dropped = 0usize;

    for event in events {
        active.retain(|voice| voice.end_time > event.start_time);

        let voice = ActiveVoice {
            slot: kept.len(),
            end_time: event.end_time(),
            velocity: event.velocity,
            start_time: event.start_time,
        };

        if active.len() < max_polyphony {
            active.push(voice);
            kept.push(Some(event));
            continue;
        }

        let weakest_pos = active
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.velocity
                    .cmp(&b.velocity)
                    .then(a.start_time.total_cmp(&b.start_time))
            })
            .map(|(pos, _)| pos);

        match weakest_pos {
            Some(pos) if event.velocity > active[pos].velocity => {
                // Steal the weakest active voice; it never reaches synthesis.
                kept[active[pos].slot] = None;
                active.remove(pos);
                dropped += 1;

                active.push(voice);
                kept.push(Some(event));
            }
            _ => {
                // Equal velocities keep the earlier-starting voice.
                dropped += 1;
            }
        }
    }

    (kept.into_iter().flatten().collect(), dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_core::VoiceRole;

    fn event(start: f64, duration: f64, velocity: u8) -> SoundEvent {
        SoundEvent {
            start_time: start,
            frequency: 440.0,
            duration,
            velocity,
            role: VoiceRole::Primary,
        }
    }

    #[test]
    fn test_under_cap_keeps_everything() {
        let events = vec![event(0.0, 1.0, 100), event(0.1, 1.0, 50)];
        let (kept, dropped) = enforce_polyphony(events, 4);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_non_overlapping_events_never_dropped() {
        let events: Vec<SoundEvent> = (0..10).map(|i| event(i as f64, 0.5, 60)).collect();
        let (kept, dropped) = enforce_polyphony(events, 2);
        assert_eq!(kept.len(), 10);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_weakest_voice_is_stolen() {
        let events = vec![
            event(0.0, 2.0, 30),
            event(0.1, 2.0, 90),
            event(0.2, 2.0, 100),
        ];
        let (kept, dropped) = enforce_polyphony(events, 2);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.velocity >= 90));
    }

    #[test]
    fn test_quiet_candidate_is_dropped() {
        let events = vec![
            event(0.0, 2.0, 90),
            event(0.1, 2.0, 100),
            event(0.2, 2.0, 30),
        ];
        let (kept, dropped) = enforce_polyphony(events, 2);
        assert_eq!(dropped, 1);
        assert!(kept.iter().all(|e| e.velocity >= 90));
    }

    #[test]
    fn test_equal_velocity_keeps_earliest() {
        let events = vec![event(0.0, 2.0, 80), event(0.5, 2.0, 80)];
        let (kept, dropped) = enforce_polyphony(events, 1);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start_time, 0.0);
    }

    #[test]
    fn test_heavy_overlap_bounded_at_cap() {
        // 200 simultaneous events, cap 64
        let events: Vec<SoundEvent> = (0..200)
            .map(|i| event(0.0, 4.0, (i % 128) as u8))
            .collect();
        let (kept, dropped) = enforce_polyphony(events, 64);
        assert_eq!(kept.len(), 64);
        assert_eq!(dropped, 136);
        // Survivors are the loudest of the pack
        assert!(kept.iter().all(|e| e.velocity >= 64));
    }

    #[test]
    fn test_result_is_sorted_by_start() {
        let events = vec![event(2.0, 1.0, 60), event(0.0, 1.0, 70), event(1.0, 1.0, 80)];
        let (kept, _) = enforce_polyphony(events, 8);
        for pair in kept.windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
        }
    }
}
