//! Render configuration.
//!
//! `RenderSettings` configures exactly one render call and is never mutated
//! mid-render. It is produced by the render mode controller in the umbrella
//! crate, which validates and downgrades requests; nothing else should
//! construct one outside of tests.

use crate::buffer::BitDepth;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Operating mode for a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Bounded-latency preview: small quantum, capped rate/depth/polyphony
    RealTime,
    /// Offline render: full polyphony, up to 96 kHz / 32-bit
    HighQuality,
}

/// Playing-skill level gating which techniques are eligible.
///
/// Total order: each level unlocks everything below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    Basic,
    Advanced,
    Virtuoso,
    Superhuman,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Basic => "basic",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Virtuoso => "virtuoso",
            SkillLevel::Superhuman => "superhuman",
        }
    }
}

/// How often and how richly techniques are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DensityTier {
    Sparse,
    Moderate,
    Rich,
    Extreme,
}

/// Concrete knobs a density tier maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityParams {
    /// Per-note probability of applying a technique
    pub technique_probability: f64,
    /// Cap on parallel voices per note
    pub max_parallel_voices: usize,
    /// Probability of attaching an ornament when an ornament technique fires
    pub ornament_probability: f64,
    /// Ceiling on per-note complexity
    pub max_complexity: f32,
}

impl DensityTier {
    pub fn params(&self) -> DensityParams {
        match self {
            DensityTier::Sparse => DensityParams {
                technique_probability: 0.2,
                max_parallel_voices: 2,
                ornament_probability: 0.1,
                max_complexity: 2.0,
            },
            DensityTier::Moderate => DensityParams {
                technique_probability: 0.4,
                max_parallel_voices: 3,
                ornament_probability: 0.25,
                max_complexity: 3.0,
            },
            DensityTier::Rich => DensityParams {
                technique_probability: 0.7,
                max_parallel_voices: 5,
                ornament_probability: 0.5,
                max_complexity: 4.0,
            },
            DensityTier::Extreme => DensityParams {
                technique_probability: 0.9,
                max_parallel_voices: 8,
                ornament_probability: 0.8,
                max_complexity: 5.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DensityTier::Sparse => "sparse",
            DensityTier::Moderate => "moderate",
            DensityTier::Rich => "rich",
            DensityTier::Extreme => "extreme",
        }
    }
}

/// Which post-processing stages run, in fixed chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStages {
    pub reverb: bool,
    pub compressor: bool,
    pub limiter: bool,
}

impl Default for PostStages {
    fn default() -> Self {
        Self {
            reverb: true,
            compressor: true,
            limiter: true,
        }
    }
}

impl PostStages {
    /// All stages disabled (dry output).
    pub fn none() -> Self {
        Self {
            reverb: false,
            compressor: false,
            limiter: false,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.reverb || self.compressor || self.limiter
    }
}

/// Complete configuration for one render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub mode: RenderMode,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// PCM conversion format
    pub bit_depth: BitDepth,
    /// Processing quantum in frames
    pub buffer_quantum: usize,
    /// Maximum simultaneous voices; excess is stolen
    pub max_polyphony: usize,
    /// Cap on parallel voices per performance note
    pub max_parallel_voices: usize,
    /// Latency budget for RealTime mode, milliseconds
    pub latency_target_ms: f32,
    /// Enabled post-processing stages
    pub stages: PostStages,
    /// Technique density tier
    pub density: DensityTier,
}

impl RenderSettings {
    /// Validate fatal preconditions. Called before any buffer allocation.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidSettings("sample_rate must be nonzero".into()));
        }
        if self.buffer_quantum == 0 {
            return Err(Error::InvalidSettings(
                "buffer_quantum must be nonzero".into(),
            ));
        }
        if self.max_polyphony == 0 {
            return Err(Error::InvalidSettings(
                "max_polyphony must be nonzero".into(),
            ));
        }
        if self.latency_target_ms <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "latency_target_ms {} must be positive",
                self.latency_target_ms
            )));
        }
        Ok(())
    }

    /// Silent tail appended after the last note end: one second of samples.
    pub fn tail_samples(&self) -> usize {
        self.sample_rate as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RenderSettings {
        RenderSettings {
            mode: RenderMode::RealTime,
            sample_rate: 44100,
            bit_depth: BitDepth::Int16,
            buffer_quantum: 512,
            max_polyphony: 64,
            max_parallel_voices: 3,
            latency_target_ms: 50.0,
            stages: PostStages::default(),
            density: DensityTier::Moderate,
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_zero_sample_rate_is_fatal() {
        let mut s = settings();
        s.sample_rate = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_zero_polyphony_is_fatal() {
        let mut s = settings();
        s.max_polyphony = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_skill_levels_are_ordered() {
        assert!(SkillLevel::Basic < SkillLevel::Advanced);
        assert!(SkillLevel::Virtuoso < SkillLevel::Superhuman);
    }

    #[test]
    fn test_density_params_scale_with_tier() {
        let sparse = DensityTier::Sparse.params();
        let extreme = DensityTier::Extreme.params();
        assert!(sparse.technique_probability < extreme.technique_probability);
        assert_eq!(sparse.max_parallel_voices, 2);
        assert_eq!(extreme.max_parallel_voices, 8);
    }

    #[test]
    fn test_tail_is_one_second() {
        assert_eq!(settings().tail_samples(), 44100);
    }
}
