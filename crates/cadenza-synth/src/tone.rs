//! Per-event waveform generation.

use crate::envelope::AdsrEnvelope;

/// Abstract tone source. The engine delegates per-event waveform generation
/// here, so a sample-based synthesizer can stand in for the built-in model.
///
/// Implementations must be deterministic: identical arguments produce
/// identical samples.
pub trait ToneGenerator: Send + Sync {
    /// Render a mono waveform of `duration` seconds at `sample_rate`.
    fn render_tone(&self, frequency: f64, duration: f64, velocity: u8, sample_rate: u32)
        -> Vec<f32>;
}

/// Built-in band-limited tone: fundamental plus two attenuated harmonics,
/// shaped by an ADSR envelope and scaled by velocity.
///
/// The raw harmonic stack is normalized to the headroom guard before velocity
/// scaling, so relative velocities survive into relative amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicTone {
    harmonic_weights: [f32; 3],
    headroom: f32,
    envelope: AdsrEnvelope,
}

impl Default for HarmonicTone {
    fn default() -> Self {
        Self {
            harmonic_weights: [1.0, 0.3, 0.1],
            headroom: 0.8,
            envelope: AdsrEnvelope::default(),
        }
    }
}

impl HarmonicTone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_envelope(mut self, envelope: AdsrEnvelope) -> Self {
        self.envelope = envelope;
        self
    }
}

impl ToneGenerator for HarmonicTone {
    fn render_tone(
        &self,
        frequency: f64,
        duration: f64,
        velocity: u8,
        sample_rate: u32,
    ) -> Vec<f32> {
        let n = (duration * sample_rate as f64) as usize;
        let mut samples = vec![0.0f32; n];
        let dt = 1.0 / sample_rate as f64;

        for (i, sample) in samples.iter_mut().enumerate() {
            let t = i as f64 * dt;
            let mut acc = 0.0f64;
            for (h, &weight) in self.harmonic_weights.iter().enumerate() {
                let harmonic = (h + 1) as f64;
                acc += weight as f64 * (std::f64::consts::TAU * frequency * harmonic * t).sin();
            }
            *sample = acc as f32;
        }

        self.envelope.apply(&mut samples, sample_rate);

        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        if peak > self.headroom {
            let normalize = self.headroom / peak;
            for sample in &mut samples {
                *sample *= normalize;
            }
        }

        let gain = velocity as f32 / 127.0;
        for sample in &mut samples {
            *sample *= gain;
        }

        samples
    }
}
