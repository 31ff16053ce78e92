//! Builder for configuring and constructing a [`CadenzaRenderer`].

use std::sync::Arc;

use crate::engine::CadenzaRenderer;
use crate::{Error, Result};
use cadenza_perform::TechniqueCatalog;
use cadenza_synth::{HarmonicTone, ToneGenerator};

/// Configures catalog and tone source for a [`CadenzaRenderer`].
///
/// By default the built-in technique catalog and harmonic tone model are
/// used. An external tone generator (e.g. a sample-based synthesizer) can
/// replace the built-in model; disabling the built-in fallback without
/// supplying one is a fatal configuration error.
#[derive(Default)]
pub struct CadenzaRendererBuilder {
    catalog: Option<TechniqueCatalog>,
    tone: Option<Arc<dyn ToneGenerator>>,
    disable_builtin_tone: bool,
}

impl CadenzaRendererBuilder {
    /// Replace the built-in technique catalog.
    pub fn catalog(mut self, catalog: TechniqueCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Delegate per-event waveform generation to an external tone source.
    pub fn tone_generator(mut self, tone: Arc<dyn ToneGenerator>) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Refuse to fall back to the built-in harmonic model. With no external
    /// tone generator supplied, `build` fails.
    pub fn without_builtin_tone(mut self) -> Self {
        self.disable_builtin_tone = true;
        self
    }

    pub fn build(self) -> Result<CadenzaRenderer> {
        let tone: Arc<dyn ToneGenerator> = match (self.tone, self.disable_builtin_tone) {
            (Some(tone), _) => tone,
            (None, false) => Arc::new(HarmonicTone::default()),
            (None, true) => return Err(Error::Synth(cadenza_synth::Error::NoToneSource)),
        };

        Ok(CadenzaRenderer {
            catalog: self.catalog.unwrap_or_else(TechniqueCatalog::builtin),
            tone,
        })
    }
}
