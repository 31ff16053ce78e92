//! The synthesis engine: sound events in, mixed stereo buffer out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::steal::enforce_polyphony;
use crate::tone::{HarmonicTone, ToneGenerator};
use cadenza_core::{
    AudioBuffer, RenderMode, RenderReport, RenderSettings, RenderWarning, SoundEvent,
};

/// Events per batch. Cancellation and progress are checked at batch
/// boundaries.
pub const EVENT_BATCH: usize = 64;

/// Progress callback: fraction of events mixed, 0.0 to 1.0.
pub type ProgressFn = dyn Fn(f32) + Send + Sync;

/// A finished (or cancelled) synthesis pass.
#[derive(Debug)]
pub struct SynthOutput {
    pub buffer: AudioBuffer,
    pub report: RenderReport,
}

/// Renders each sound event into a windowed waveform and additively mixes it
/// into a shared stereo buffer.
///
/// The buffer has a single writer-owner throughout: this engine fills it and
/// moves it out in the returned [`SynthOutput`].
pub struct SynthesisEngine {
    settings: RenderSettings,
    tone: Arc<dyn ToneGenerator>,
}

impl SynthesisEngine {
    /// Engine with the built-in harmonic-envelope tone model.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            tone: Arc::new(HarmonicTone::default()),
        }
    }

    /// Engine delegating waveform generation to an external tone source.
    pub fn with_tone_generator(settings: RenderSettings, tone: Arc<dyn ToneGenerator>) -> Self {
        Self { settings, tone }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Synthesize without cancellation or progress reporting.
    pub fn synthesize(&self, events: &[SoundEvent]) -> Result<SynthOutput> {
        self.synthesize_with(events, None, None)
    }

    /// Synthesize the event list.
    ///
    /// Malformed events (non-positive frequency or duration) are skipped and
    /// reported as warnings; they never abort the pass. Events beyond the
    /// polyphony cap are dropped by voice stealing and reported as a
    /// degraded-result warning. The cancellation flag is checked between
    /// event batches; on cancellation the partial mix is returned with
    /// `report.incomplete` set.
    pub fn synthesize_with(
        &self,
        events: &[SoundEvent],
        cancel: Option<&AtomicBool>,
        progress: Option<&(dyn Fn(f32) + Send + Sync + '_)>,
    ) -> Result<SynthOutput> {
        // Fatal checks happen before any buffer allocation.
        self.settings.validate().map_err(crate::error::Error::from)?;

        let mut report = RenderReport::default();

        let mut valid = Vec::with_capacity(events.len());
        for (index, event) in events.iter().enumerate() {
            if event.frequency <= 0.0 {
                warn!(index, frequency = event.frequency, "skipping malformed event");
                report.warnings.push(RenderWarning::MalformedEvent {
                    index,
                    reason: format!("frequency {} Hz", event.frequency),
                });
                continue;
            }
            if event.duration <= 0.0 {
                warn!(index, duration = event.duration, "skipping malformed event");
                report.warnings.push(RenderWarning::MalformedEvent {
                    index,
                    reason: format!("duration {} s", event.duration),
                });
                continue;
            }
            valid.push(event.clone());
        }

        let (kept, dropped) = enforce_polyphony(valid, self.settings.max_polyphony);
        if dropped > 0 {
            debug!(dropped, cap = self.settings.max_polyphony, "voice stealing engaged");
            report.dropped_voices = dropped;
            report
                .warnings
                .push(RenderWarning::VoicesDropped { count: dropped });
        }

        let sample_rate = self.settings.sample_rate;
        let total_seconds = kept.iter().map(SoundEvent::end_time).fold(0.0, f64::max);
        let sample_count =
            (total_seconds * sample_rate as f64).ceil() as usize + self.settings.tail_samples();
        let mut buffer = AudioBuffer::silent(sample_count, sample_rate);

        let mut mixed = 0usize;
        for batch in kept.chunks(EVENT_BATCH) {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    debug!(mixed, total = kept.len(), "synthesis cancelled");
                    report.incomplete = true;
                    break;
                }
            }

            match self.settings.mode {
                RenderMode::RealTime => {
                    for event in batch {
                        let wave = self.tone.render_tone(
                            event.frequency,
                            event.duration,
                            event.velocity,
                            sample_rate,
                        );
                        mix_into(&mut buffer, event.start_time, &wave);
                    }
                }
                RenderMode::HighQuality => self.render_batch_parallel(batch, &mut buffer),
            }

            mixed += batch.len();
            if let Some(callback) = progress {
                callback(mixed as f32 / kept.len().max(1) as f32);
            }
        }

        Ok(SynthOutput { buffer, report })
    }

    /// Generate a batch's waveforms across worker threads, then mix the
    /// fragments in event order on the calling thread.
    ///
    /// Generation is embarrassingly parallel; the deterministic single-pass
    /// mix keeps the result bit-identical to sequential accumulation.
    fn render_batch_parallel(&self, batch: &[SoundEvent], buffer: &mut AudioBuffer) {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(batch.len().max(1));
        let per_worker = (batch.len() + workers - 1) / workers;
        let sample_rate = self.settings.sample_rate;
        let tone = &self.tone;

        let mut fragments: Vec<Option<Vec<f32>>> = Vec::with_capacity(batch.len());
        fragments.resize_with(batch.len(), || None);

        let (tx, rx) = crossbeam_channel::unbounded::<(usize, Vec<f32>)>();
        std::thread::scope(|scope| {
            for worker in 0..workers {
                let start = worker * per_worker;
                let end = ((worker + 1) * per_worker).min(batch.len());
                if start >= end {
                    continue;
                }
                let tx = tx.clone();
                let slice = &batch[start..end];
                scope.spawn(move || {
                    for (offset, event) in slice.iter().enumerate() {
                        let wave = tone.render_tone(
                            event.frequency,
                            event.duration,
                            event.velocity,
                            sample_rate,
                        );
                        // Receiver outlives all senders within the scope.
                        let _ = tx.send((start + offset, wave));
                    }
                });
            }
            drop(tx);

            for (index, wave) in rx {
                fragments[index] = Some(wave);
            }
        });

        for (index, fragment) in fragments.into_iter().enumerate() {
            if let Some(wave) = fragment {
                mix_into(buffer, batch[index].start_time, &wave);
            }
        }
    }
}

/// Additively mix a mono waveform into both channels at its sample offset.
///
/// Out-of-range frames (negative onsets, waveforms running past the buffer)
/// are clipped.
fn mix_into(buffer: &mut AudioBuffer, start_time: f64, wave: &[f32]) {
    let start_sample = (start_time * buffer.sample_rate() as f64).floor() as i64;
    let frames = buffer.sample_count() as i64;

    for (i, &sample) in wave.iter().enumerate() {
        let frame = start_sample + i as i64;
        if frame < 0 || frame >= frames {
            continue;
        }
        buffer.add_sample(frame as usize, 0, sample);
        buffer.add_sample(frame as usize, 1, sample);
    }
}
