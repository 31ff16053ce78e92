//! Sample-wise dynamics: compressor and peak limiter.

use crate::error::{Error, Result};
use cadenza_core::AudioBuffer;

/// Sample-wise compressor.
///
/// Amplitudes above the threshold are attenuated toward
/// `threshold + (|x| - threshold) / ratio`, sign preserved. Samples below the
/// threshold pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftCompressor {
    threshold: f32,
    ratio: f32,
}

impl Default for SoftCompressor {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            ratio: 4.0,
        }
    }
}

impl SoftCompressor {
    pub fn new(threshold: f32, ratio: f32) -> Result<Self> {
        if threshold <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "threshold {threshold} must be positive"
            )));
        }
        if ratio < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "ratio {ratio} must be >= 1.0"
            )));
        }
        Ok(Self { threshold, ratio })
    }

    /// Apply in place.
    pub fn process(&self, buffer: &mut AudioBuffer) {
        for sample in buffer.samples_mut() {
            let amplitude = sample.abs();
            if amplitude > self.threshold {
                let compressed = self.threshold + (amplitude - self.threshold) / self.ratio;
                *sample = sample.signum() * compressed;
            }
        }
    }
}

/// Uniform peak limiter.
///
/// If the peak absolute amplitude exceeds the ceiling, the entire buffer is
/// scaled down so the peak lands exactly on the ceiling. Relative levels are
/// preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakLimiter {
    ceiling: f32,
}

impl Default for PeakLimiter {
    fn default() -> Self {
        Self { ceiling: 0.95 }
    }
}

impl PeakLimiter {
    pub fn new(ceiling: f32) -> Result<Self> {
        if ceiling <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "ceiling {ceiling} must be positive"
            )));
        }
        Ok(Self { ceiling })
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Apply in place.
    pub fn process(&self, buffer: &mut AudioBuffer) {
        let peak = buffer.peak();
        if peak > self.ceiling {
            buffer.scale(self.ceiling / peak);
        }
    }
}
