//! Stereo audio buffer with PCM and streaming conversion.

use serde::{Deserialize, Serialize};

/// Output channel count. Only stereo is supported.
pub const CHANNELS: usize = 2;

/// Sample format for PCM byte conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    /// 16-bit signed integer PCM
    Int16,
    /// 24-bit signed integer PCM (packed, 3 bytes per sample)
    Int24,
    /// 32-bit IEEE float PCM
    Float32,
}

impl BitDepth {
    pub fn bits(&self) -> u32 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            BitDepth::Int16 => 2,
            BitDepth::Int24 => 3,
            BitDepth::Float32 => 4,
        }
    }
}

/// Interleaved stereo sample store.
///
/// Single writer-owner at any time: the synthesis engine fills it, hands it to
/// post-processing by move, which hands it to the caller. `sample_count` is
/// per-channel frames; the interleaved store holds `sample_count * 2` floats.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Allocate a zero-filled buffer of `sample_count` frames.
    pub fn silent(sample_count: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; sample_count * CHANNELS],
            sample_rate,
        }
    }

    /// Frames per channel.
    pub fn sample_count(&self) -> usize {
        self.samples.len() / CHANNELS
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        self.sample_count() as f64 / self.sample_rate as f64
    }

    #[inline]
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        self.samples[frame * CHANNELS + channel]
    }

    #[inline]
    pub fn set_sample(&mut self, frame: usize, channel: usize, value: f32) {
        self.samples[frame * CHANNELS + channel] = value;
    }

    /// Additively mix a value into one frame of one channel.
    #[inline]
    pub fn add_sample(&mut self, frame: usize, channel: usize, value: f32) {
        self.samples[frame * CHANNELS + channel] += value;
    }

    /// Raw interleaved samples `[L, R, L, R, ...]`.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Peak absolute amplitude across both channels.
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
    }

    /// Scale every sample uniformly.
    pub fn scale(&mut self, factor: f32) {
        for s in &mut self.samples {
            *s *= factor;
        }
    }

    /// RMS energy of one channel over a frame range (clamped to length).
    pub fn rms(&self, channel: usize, start_frame: usize, end_frame: usize) -> f32 {
        let end = end_frame.min(self.sample_count());
        if start_frame >= end {
            return 0.0;
        }
        let sum: f32 = (start_frame..end)
            .map(|f| {
                let s = self.sample(f, channel);
                s * s
            })
            .sum();
        (sum / (end - start_frame) as f32).sqrt()
    }

    /// Convert to an interleaved PCM byte stream at the given bit depth.
    ///
    /// Samples are clamped to [-1, 1] before integer quantization.
    pub fn to_pcm_bytes(&self, depth: BitDepth) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * depth.bytes_per_sample());
        match depth {
            BitDepth::Int16 => {
                for s in &self.samples {
                    let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    bytes.extend_from_slice(&v.to_le_bytes());
                }
            }
            BitDepth::Int24 => {
                for s in &self.samples {
                    let v = (s.clamp(-1.0, 1.0) * 8_388_607.0) as i32;
                    bytes.extend_from_slice(&v.to_le_bytes()[..3]);
                }
            }
            BitDepth::Float32 => {
                for s in &self.samples {
                    bytes.extend_from_slice(&s.to_le_bytes());
                }
            }
        }
        bytes
    }

    /// Fixed-size interleaved chunks for streaming playback.
    ///
    /// Each chunk holds `frames_per_chunk * 2` floats except possibly the last.
    pub fn chunks(&self, frames_per_chunk: usize) -> impl Iterator<Item = &[f32]> {
        self.samples.chunks(frames_per_chunk * CHANNELS)
    }
}
