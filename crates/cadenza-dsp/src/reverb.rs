//! Single feedback delay line reverb.

use crate::error::{Error, Result};
use cadenza_core::{AudioBuffer, CHANNELS};

/// Reverb built from one feedback delay line per channel.
///
/// `y[n] = x[n] + wet * d[n]` where `d[n] = x[n-D] + feedback * d[n-D]`.
/// Channels are processed independently.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDelayReverb {
    delay_seconds: f64,
    feedback: f32,
    wet_mix: f32,
}

impl Default for FeedbackDelayReverb {
    fn default() -> Self {
        Self {
            delay_seconds: 0.03,
            feedback: 0.3,
            wet_mix: 0.2,
        }
    }
}

impl FeedbackDelayReverb {
    /// Create a reverb. Feedback must stay below 1.0 or the delay line
    /// diverges; wet mix is a 0-1 blend.
    pub fn new(delay_seconds: f64, feedback: f32, wet_mix: f32) -> Result<Self> {
        if delay_seconds <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "delay {delay_seconds} s must be positive"
            )));
        }
        if !(0.0..1.0).contains(&feedback) {
            return Err(Error::InvalidParameter(format!(
                "feedback {feedback} must be in [0, 1)"
            )));
        }
        if !(0.0..=1.0).contains(&wet_mix) {
            return Err(Error::InvalidParameter(format!(
                "wet mix {wet_mix} must be in [0, 1]"
            )));
        }
        Ok(Self {
            delay_seconds,
            feedback,
            wet_mix,
        })
    }

    /// Apply in place. Sample count and rate are unchanged.
    pub fn process(&self, buffer: &mut AudioBuffer) {
        let frames = buffer.sample_count();
        let delay_samples = (self.delay_seconds * buffer.sample_rate() as f64) as usize;
        if delay_samples == 0 || delay_samples >= frames {
            return;
        }

        for channel in 0..CHANNELS {
            let dry: Vec<f32> = (0..frames).map(|f| buffer.sample(f, channel)).collect();
            let mut delayed = vec![0.0f32; frames];

            for i in delay_samples..frames {
                delayed[i] = dry[i - delay_samples] + self.feedback * delayed[i - delay_samples];
            }
            for i in 0..frames {
                buffer.set_sample(i, channel, dry[i] + self.wet_mix * delayed[i]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_buffer(frames: usize, sample_rate: u32) -> AudioBuffer {
        let mut buf = AudioBuffer::silent(frames, sample_rate);
        buf.set_sample(0, 0, 1.0);
        buf.set_sample(0, 1, 1.0);
        buf
    }

    #[test]
    fn test_echo_lands_at_delay_offset() {
        let mut buf = impulse_buffer(44100, 44100);
        FeedbackDelayReverb::default().process(&mut buf);

        // 30 ms delay at 44.1 kHz = 1323 samples
        approx::assert_relative_eq!(buf.sample(0, 0), 1.0, epsilon = 1e-6);
        approx::assert_relative_eq!(buf.sample(1323, 0), 0.2, epsilon = 1e-6);
        // Second echo attenuated by the feedback gain
        approx::assert_relative_eq!(buf.sample(2646, 0), 0.2 * 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_channels_processed_independently() {
        let mut buf = AudioBuffer::silent(44100, 44100);
        buf.set_sample(0, 0, 1.0);
        FeedbackDelayReverb::default().process(&mut buf);

        assert!(buf.sample(1323, 0) > 0.0);
        assert_eq!(buf.sample(1323, 1), 0.0);
    }

    #[test]
    fn test_sample_count_unchanged() {
        let mut buf = impulse_buffer(1000, 44100);
        FeedbackDelayReverb::default().process(&mut buf);
        assert_eq!(buf.sample_count(), 1000);
    }

    #[test]
    fn test_rejects_unstable_feedback() {
        assert!(FeedbackDelayReverb::new(0.03, 1.0, 0.2).is_err());
        assert!(FeedbackDelayReverb::new(0.0, 0.3, 0.2).is_err());
        assert!(FeedbackDelayReverb::new(0.03, 0.3, 1.5).is_err());
    }

    #[test]
    fn test_short_buffer_passes_through() {
        // Buffer shorter than the delay line: nothing to echo
        let mut buf = impulse_buffer(100, 44100);
        let before = buf.clone();
        FeedbackDelayReverb::default().process(&mut buf);
        assert_eq!(buf, before);
    }
}
