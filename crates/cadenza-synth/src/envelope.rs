//! Four-stage amplitude envelope.

/// Attack/decay/sustain/release envelope applied in place to a waveform.
///
/// Attack and decay are fixed times; release takes a fixed fraction of the
/// note length and occupies the final samples of any note long enough to
/// reach it, decaying to silence at the note end.
#[derive(Debug, Clone, PartialEq)]
pub struct AdsrEnvelope {
    /// Attack time in seconds
    pub attack: f64,
    /// Decay time in seconds
    pub decay: f64,
    /// Sustain amplitude, 0.0-1.0
    pub sustain_level: f32,
    /// Fraction of the note length spent releasing
    pub release_fraction: f64,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self {
            attack: 0.05,
            decay: 0.1,
            sustain_level: 0.7,
            release_fraction: 0.3,
        }
    }
}

impl AdsrEnvelope {
    /// Shape `samples` in place.
    pub fn apply(&self, samples: &mut [f32], sample_rate: u32) {
        let n = samples.len();
        if n == 0 {
            return;
        }
        let sr = sample_rate as f64;
        let attack_samples = (self.attack * sr) as usize;
        let decay_samples = (self.decay * sr) as usize;
        let release_samples = (n as f64 * self.release_fraction) as usize;
        let sustain = self.sustain_level;

        // Attack: 0 -> 1
        let attack_end = attack_samples.min(n);
        for (k, sample) in samples[..attack_end].iter_mut().enumerate() {
            *sample *= k as f32 / attack_samples.max(1) as f32;
        }

        // Decay: 1 -> sustain
        let decay_end = (attack_end + decay_samples).min(n);
        for (k, sample) in samples[attack_end..decay_end].iter_mut().enumerate() {
            let t = k as f32 / decay_samples.max(1) as f32;
            *sample *= 1.0 - t * (1.0 - sustain);
        }

        // Sustain: flat until the release takes over
        let release_start = n.saturating_sub(release_samples).max(decay_end);
        for sample in &mut samples[decay_end..release_start] {
            *sample *= sustain;
        }

        // Release: sustain -> 0 over the final samples
        let release_len = n - release_start;
        for (k, sample) in samples[release_start..].iter_mut().enumerate() {
            let t = k as f32 / release_len.max(1) as f32;
            *sample *= sustain * (1.0 - t);
        }
    }
}
