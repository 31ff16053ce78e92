//! Top-level pipeline driver.
//!
//! Wires the full chain for one render call: mode resolution, performance
//! rendering, flattening, synthesis, post-processing.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::builder::CadenzaRendererBuilder;
use crate::controller::{RenderModeController, RenderRequest};
use crate::Result;
use cadenza_core::{AudioBuffer, RenderReport, RenderWarning};
use cadenza_dsp::PostChain;
use cadenza_perform::{
    flatten, ExpressionContour, PerformanceRenderer, PerformanceStatistics, PerformanceStats,
    TechniqueCatalog,
};
use cadenza_synth::{SynthesisEngine, ToneGenerator};

/// Pipeline stage a progress report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Performing,
    Synthesizing,
    PostProcessing,
}

/// Progress report delivered between event batches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderProgress {
    pub stage: PipelineStage,
    /// Completion of the current stage, 0.0 to 1.0
    pub completion: f32,
}

/// Per-call options: cancellation and progress reporting.
#[derive(Default, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Checked between event batches; on cancellation the partial mix is
    /// returned with `report.incomplete` set.
    pub cancel: Option<&'a AtomicBool>,
    pub progress: Option<&'a (dyn Fn(RenderProgress) + Send + Sync)>,
}

/// Everything a successful render returns: the buffer plus performance
/// metadata and the non-fatal warning report.
#[derive(Debug)]
pub struct RenderOutput {
    pub buffer: AudioBuffer,
    pub stats: PerformanceStats,
    pub statistics: PerformanceStatistics,
    pub report: RenderReport,
}

/// The complete performance-to-audio renderer.
///
/// Owns the technique catalog and the tone generator; everything per-render
/// (mode, skill, density, seed) arrives as explicit call arguments, never
/// from ambient state.
pub struct CadenzaRenderer {
    pub(crate) catalog: TechniqueCatalog,
    pub(crate) tone: Arc<dyn ToneGenerator>,
}

impl Default for CadenzaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CadenzaRenderer {
    /// Renderer with the built-in catalog and harmonic tone model.
    pub fn new() -> Self {
        Self {
            catalog: TechniqueCatalog::builtin(),
            tone: Arc::new(cadenza_synth::HarmonicTone::default()),
        }
    }

    pub fn builder() -> CadenzaRendererBuilder {
        CadenzaRendererBuilder::default()
    }

    pub fn catalog(&self) -> &TechniqueCatalog {
        &self.catalog
    }

    /// Render a composition to audio.
    ///
    /// `seed` drives all technique and expression randomness: identical
    /// composition, request and seed produce a bit-identical buffer.
    pub fn render(
        &self,
        composition: &cadenza_core::Composition,
        request: &RenderRequest,
        seed: u64,
    ) -> Result<RenderOutput> {
        self.render_with(composition, request, seed, RenderOptions::default())
    }

    /// Render with cancellation and progress options.
    pub fn render_with(
        &self,
        composition: &cadenza_core::Composition,
        request: &RenderRequest,
        seed: u64,
        options: RenderOptions<'_>,
    ) -> Result<RenderOutput> {
        let (settings, adjustments) = RenderModeController::resolve(request)?;
        for adjustment in &adjustments {
            debug!(%adjustment, "request downgraded for mode");
        }
        let mut report = RenderReport {
            adjustments,
            ..Default::default()
        };

        let contour = match ExpressionContour::by_name(&request.contour) {
            Ok(contour) => contour,
            Err(e) => {
                warn!(error = %e, "falling back to default contour");
                report.warnings.push(RenderWarning::UnknownContour {
                    name: request.contour.clone(),
                });
                ExpressionContour::default()
            }
        };

        if let Some(callback) = options.progress {
            callback(RenderProgress {
                stage: PipelineStage::Performing,
                completion: 0.0,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let renderer = PerformanceRenderer::new(request.skill, settings.density)
            .with_contour(contour)
            .with_max_parallel_voices(settings.max_parallel_voices);
        let (performance, perform_warnings) = renderer.render(
            composition,
            &self.catalog,
            request.techniques.as_deref(),
            &mut rng,
        );
        report.warnings.extend(perform_warnings);

        if let Some(callback) = options.progress {
            callback(RenderProgress {
                stage: PipelineStage::Performing,
                completion: 1.0,
            });
        }

        let events = flatten(&performance);
        debug!(
            notes = performance.note_count(),
            events = events.len(),
            "performance flattened"
        );

        let engine = SynthesisEngine::with_tone_generator(settings.clone(), Arc::clone(&self.tone));
        let synth_out = match options.progress {
            Some(callback) => {
                let adapter = |completion: f32| {
                    callback(RenderProgress {
                        stage: PipelineStage::Synthesizing,
                        completion,
                    })
                };
                engine.synthesize_with(&events, options.cancel, Some(&adapter))?
            }
            None => engine.synthesize_with(&events, options.cancel, None)?,
        };

        let mut buffer = synth_out.buffer;
        report.merge(synth_out.report);

        // A cancelled render returns the raw partial mix immediately.
        if !report.incomplete && settings.stages.any_enabled() {
            if let Some(callback) = options.progress {
                callback(RenderProgress {
                    stage: PipelineStage::PostProcessing,
                    completion: 0.0,
                });
            }
            PostChain::from_stages(settings.stages).apply(&mut buffer);
            if let Some(callback) = options.progress {
                callback(RenderProgress {
                    stage: PipelineStage::PostProcessing,
                    completion: 1.0,
                });
            }
        }

        Ok(RenderOutput {
            statistics: performance.statistics(),
            stats: performance.stats,
            buffer,
            report,
        })
    }
}
