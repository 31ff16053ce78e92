//! Render mode controller: the only component that constructs
//! [`RenderSettings`].
//!
//! The controller validates a [`RenderRequest`] against the selected mode's
//! budget and downgrades (never silently upgrades) mismatched fields,
//! reporting every adjustment.

use crate::Result;
use cadenza_core::{
    Adjustment, BitDepth, DensityTier, PostStages, RenderMode, RenderSettings, SkillLevel,
};

/// RealTime mode caps.
const RT_MAX_SAMPLE_RATE: u32 = 44_100;
const RT_MAX_POLYPHONY: usize = 64;
const RT_MAX_DENSITY: DensityTier = DensityTier::Moderate;

/// HighQuality mode caps.
const HQ_MAX_SAMPLE_RATE: u32 = 96_000;
const HQ_MAX_POLYPHONY: usize = 256;

/// What a caller asks for. The controller resolves it into validated
/// [`RenderSettings`] plus a list of downgrades.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub mode: RenderMode,
    pub skill: SkillLevel,
    pub density: DensityTier,
    pub sample_rate: u32,
    pub bit_depth: BitDepth,
    pub buffer_quantum: usize,
    pub max_polyphony: usize,
    pub latency_target_ms: f32,
    pub stages: PostStages,
    /// Expression contour name ("natural", "dramatic", "mechanical",
    /// "ethereal")
    pub contour: String,
    /// Explicit technique list; `None` selects automatically from the
    /// composition style
    pub techniques: Option<Vec<String>>,
}

impl RenderRequest {
    /// Fast preview: 22.05 kHz, sparse techniques, no effects.
    pub fn draft() -> Self {
        Self {
            mode: RenderMode::RealTime,
            skill: SkillLevel::Advanced,
            density: DensityTier::Sparse,
            sample_rate: 22_050,
            bit_depth: BitDepth::Int16,
            buffer_quantum: 1024,
            max_polyphony: 32,
            latency_target_ms: 100.0,
            stages: PostStages::none(),
            contour: "natural".into(),
            techniques: None,
        }
    }

    /// Default real-time preview: CD rate, moderate density, full chain.
    pub fn standard() -> Self {
        Self {
            mode: RenderMode::RealTime,
            skill: SkillLevel::Advanced,
            density: DensityTier::Moderate,
            sample_rate: 44_100,
            bit_depth: BitDepth::Int16,
            buffer_quantum: 512,
            max_polyphony: 64,
            latency_target_ms: 50.0,
            stages: PostStages::default(),
            contour: "natural".into(),
            techniques: None,
        }
    }

    /// Offline render: 48 kHz / 24-bit, rich techniques.
    pub fn high() -> Self {
        Self {
            mode: RenderMode::HighQuality,
            skill: SkillLevel::Superhuman,
            density: DensityTier::Rich,
            sample_rate: 48_000,
            bit_depth: BitDepth::Int24,
            buffer_quantum: 256,
            max_polyphony: 128,
            latency_target_ms: 20.0,
            stages: PostStages::default(),
            contour: "natural".into(),
            techniques: None,
        }
    }

    /// Top-quality offline render: 96 kHz / 32-bit float, extreme density.
    pub fn studio() -> Self {
        Self {
            mode: RenderMode::HighQuality,
            skill: SkillLevel::Superhuman,
            density: DensityTier::Extreme,
            sample_rate: 96_000,
            bit_depth: BitDepth::Float32,
            buffer_quantum: 128,
            max_polyphony: 256,
            latency_target_ms: 10.0,
            stages: PostStages::default(),
            contour: "natural".into(),
            techniques: None,
        }
    }

    /// Set the expression contour by name.
    pub fn with_contour(mut self, name: impl Into<String>) -> Self {
        self.contour = name.into();
        self
    }

    /// Use an explicit technique list instead of automatic selection.
    pub fn with_techniques(mut self, techniques: Vec<String>) -> Self {
        self.techniques = Some(techniques);
        self
    }

    pub fn with_skill(mut self, skill: SkillLevel) -> Self {
        self.skill = skill;
        self
    }

    pub fn with_density(mut self, density: DensityTier) -> Self {
        self.density = density;
        self
    }
}

/// Resolves requests into validated settings.
pub struct RenderModeController;

impl RenderModeController {
    /// Validate a request and build the settings for it.
    ///
    /// Fatal problems (zero sample rate, zero polyphony) return an error
    /// before anything is allocated. Mode mismatches are downgraded and
    /// reported, never errors.
    pub fn resolve(request: &RenderRequest) -> Result<(RenderSettings, Vec<Adjustment>)> {
        let mut adjustments = Vec::new();

        let mut sample_rate = request.sample_rate;
        let mut bit_depth = request.bit_depth;
        let mut density = request.density;
        let mut max_polyphony = request.max_polyphony;
        let mut buffer_quantum = request.buffer_quantum;

        match request.mode {
            RenderMode::RealTime => {
                if sample_rate > RT_MAX_SAMPLE_RATE {
                    adjustments.push(Adjustment::new("sample_rate", sample_rate, RT_MAX_SAMPLE_RATE));
                    sample_rate = RT_MAX_SAMPLE_RATE;
                }
                if bit_depth != BitDepth::Int16 {
                    adjustments.push(Adjustment::new(
                        "bit_depth",
                        bit_depth.bits(),
                        BitDepth::Int16.bits(),
                    ));
                    bit_depth = BitDepth::Int16;
                }
                if density > RT_MAX_DENSITY {
                    adjustments.push(Adjustment::new(
                        "density",
                        density.as_str(),
                        RT_MAX_DENSITY.as_str(),
                    ));
                    density = RT_MAX_DENSITY;
                }
                if max_polyphony > RT_MAX_POLYPHONY {
                    adjustments.push(Adjustment::new("max_polyphony", max_polyphony, RT_MAX_POLYPHONY));
                    max_polyphony = RT_MAX_POLYPHONY;
                }

                // The quantum must fit the latency budget.
                if sample_rate > 0 && request.latency_target_ms > 0.0 {
                    let budget_frames =
                        (request.latency_target_ms as f64 / 1000.0 * sample_rate as f64) as usize;
                    if buffer_quantum > budget_frames && budget_frames > 0 {
                        adjustments.push(Adjustment::new("buffer_quantum", buffer_quantum, budget_frames));
                        buffer_quantum = budget_frames;
                    }
                }
            }
            RenderMode::HighQuality => {
                if sample_rate > HQ_MAX_SAMPLE_RATE {
                    adjustments.push(Adjustment::new("sample_rate", sample_rate, HQ_MAX_SAMPLE_RATE));
                    sample_rate = HQ_MAX_SAMPLE_RATE;
                }
                if max_polyphony > HQ_MAX_POLYPHONY {
                    adjustments.push(Adjustment::new("max_polyphony", max_polyphony, HQ_MAX_POLYPHONY));
                    max_polyphony = HQ_MAX_POLYPHONY;
                }
            }
        }

        let settings = RenderSettings {
            mode: request.mode,
            sample_rate,
            bit_depth,
            buffer_quantum,
            max_polyphony,
            max_parallel_voices: density.params().max_parallel_voices,
            latency_target_ms: request.latency_target_ms,
            stages: request.stages,
            density,
        };
        settings.validate()?;

        Ok((settings, adjustments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_request_resolves_unchanged() {
        let (settings, adjustments) = RenderModeController::resolve(&RenderRequest::standard()).unwrap();
        assert!(adjustments.is_empty());
        assert_eq!(settings.sample_rate, 44_100);
        assert_eq!(settings.max_parallel_voices, 3);
    }

    #[test]
    fn test_realtime_downgrades_rate_depth_density() {
        let mut request = RenderRequest::standard();
        request.sample_rate = 96_000;
        request.bit_depth = BitDepth::Float32;
        request.density = DensityTier::Extreme;
        request.max_polyphony = 256;

        let (settings, adjustments) = RenderModeController::resolve(&request).unwrap();

        assert_eq!(settings.sample_rate, 44_100);
        assert_eq!(settings.bit_depth, BitDepth::Int16);
        assert_eq!(settings.density, DensityTier::Moderate);
        assert_eq!(settings.max_polyphony, 64);
        assert_eq!(adjustments.len(), 4);
    }

    #[test]
    fn test_high_quality_keeps_studio_settings() {
        let (settings, adjustments) = RenderModeController::resolve(&RenderRequest::studio()).unwrap();
        assert!(adjustments.is_empty());
        assert_eq!(settings.sample_rate, 96_000);
        assert_eq!(settings.bit_depth, BitDepth::Float32);
        assert_eq!(settings.density, DensityTier::Extreme);
        assert_eq!(settings.max_parallel_voices, 8);
    }

    #[test]
    fn test_never_upgrades() {
        // A modest request in HighQuality mode stays modest.
        let mut request = RenderRequest::high();
        request.sample_rate = 44_100;
        request.density = DensityTier::Sparse;

        let (settings, adjustments) = RenderModeController::resolve(&request).unwrap();
        assert!(adjustments.is_empty());
        assert_eq!(settings.sample_rate, 44_100);
        assert_eq!(settings.density, DensityTier::Sparse);
    }

    #[test]
    fn test_zero_sample_rate_is_fatal() {
        let mut request = RenderRequest::standard();
        request.sample_rate = 0;
        assert!(RenderModeController::resolve(&request).is_err());
    }

    #[test]
    fn test_quantum_shrinks_to_latency_budget() {
        let mut request = RenderRequest::standard();
        request.buffer_quantum = 8192;
        request.latency_target_ms = 10.0;

        let (settings, adjustments) = RenderModeController::resolve(&request).unwrap();

        // 10 ms at 44.1 kHz = 441 frames
        assert_eq!(settings.buffer_quantum, 441);
        assert!(adjustments.iter().any(|a| a.field == "buffer_quantum"));
    }
}
