//! The fixed post-processing chain: reverb -> compressor -> limiter.

use crate::dynamics::{PeakLimiter, SoftCompressor};
use crate::reverb::FeedbackDelayReverb;
use cadenza_core::{AudioBuffer, PostStages};

/// Applies the enabled stages in fixed order, in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PostChain {
    reverb: Option<FeedbackDelayReverb>,
    compressor: Option<SoftCompressor>,
    limiter: Option<PeakLimiter>,
}

impl Default for PostChain {
    fn default() -> Self {
        Self::from_stages(PostStages::default())
    }
}

impl PostChain {
    /// Build the chain from the enabled-stage flags, using each stage's
    /// default parameters.
    pub fn from_stages(stages: PostStages) -> Self {
        Self {
            reverb: stages.reverb.then(FeedbackDelayReverb::default),
            compressor: stages.compressor.then(SoftCompressor::default),
            limiter: stages.limiter.then(PeakLimiter::default),
        }
    }

    /// Replace the reverb stage.
    pub fn with_reverb(mut self, reverb: FeedbackDelayReverb) -> Self {
        self.reverb = Some(reverb);
        self
    }

    /// Replace the compressor stage.
    pub fn with_compressor(mut self, compressor: SoftCompressor) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Replace the limiter stage.
    pub fn with_limiter(mut self, limiter: PeakLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Run the chain in place. Never changes sample count or sample rate.
    pub fn apply(&self, buffer: &mut AudioBuffer) {
        if let Some(reverb) = &self.reverb {
            reverb.process(buffer);
        }
        if let Some(compressor) = &self.compressor {
            compressor.process(buffer);
        }
        if let Some(limiter) = &self.limiter {
            limiter.process(buffer);
        }
    }
}
