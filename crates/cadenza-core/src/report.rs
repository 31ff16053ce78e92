//! Render metadata: non-fatal warnings and mode adjustments.
//!
//! Per the error taxonomy, recoverable-local failures and degraded results
//! never abort a render; they are collected here and attached to the output.

use std::fmt;

/// A non-fatal condition encountered during a render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderWarning {
    /// A technique name was not found in the catalog; rendering proceeded
    /// without it.
    UnknownTechnique { name: String },
    /// Applying a technique to one note failed; the note fell back to its
    /// unmodified form.
    TechniqueFailed {
        technique: String,
        note_index: usize,
        reason: String,
    },
    /// A sound event had a non-positive frequency or duration and was skipped.
    MalformedEvent { index: usize, reason: String },
    /// Voice stealing dropped events beyond the polyphony cap.
    VoicesDropped { count: usize },
    /// The requested expression contour was unknown; the default was used.
    UnknownContour { name: String },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::UnknownTechnique { name } => {
                write!(f, "unknown technique '{name}', skipped")
            }
            RenderWarning::TechniqueFailed {
                technique,
                note_index,
                reason,
            } => write!(
                f,
                "technique '{technique}' failed on note {note_index}: {reason}"
            ),
            RenderWarning::MalformedEvent { index, reason } => {
                write!(f, "event {index} skipped: {reason}")
            }
            RenderWarning::VoicesDropped { count } => {
                write!(f, "{count} voice(s) dropped by polyphony cap")
            }
            RenderWarning::UnknownContour { name } => {
                write!(f, "unknown expression contour '{name}', using default")
            }
        }
    }
}

/// A request field the mode controller downgraded to fit the selected mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub field: &'static str,
    pub requested: String,
    pub applied: String,
}

impl Adjustment {
    pub fn new(
        field: &'static str,
        requested: impl fmt::Display,
        applied: impl fmt::Display,
    ) -> Self {
        Self {
            field,
            requested: requested.to_string(),
            applied: applied.to_string(),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downgraded from {} to {}",
            self.field, self.requested, self.applied
        )
    }
}

/// Metadata attached to every successful render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub warnings: Vec<RenderWarning>,
    pub adjustments: Vec<Adjustment>,
    /// Events dropped by voice stealing (also reported as a warning)
    pub dropped_voices: usize,
    /// True when the render was cancelled and the buffer holds a partial mix
    pub incomplete: bool,
}

impl RenderReport {
    pub fn merge(&mut self, other: RenderReport) {
        self.warnings.extend(other.warnings);
        self.adjustments.extend(other.adjustments);
        self.dropped_voices += other.dropped_voices;
        self.incomplete |= other.incomplete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = RenderWarning::MalformedEvent {
            index: 3,
            reason: "frequency -10 Hz".into(),
        };
        assert_eq!(w.to_string(), "event 3 skipped: frequency -10 Hz");
    }

    #[test]
    fn test_report_merge() {
        let mut a = RenderReport {
            warnings: vec![RenderWarning::VoicesDropped { count: 2 }],
            dropped_voices: 2,
            ..Default::default()
        };
        let b = RenderReport {
            incomplete: true,
            dropped_voices: 1,
            ..Default::default()
        };
        a.merge(b);
        assert_eq!(a.dropped_voices, 3);
        assert!(a.incomplete);
        assert_eq!(a.warnings.len(), 1);
    }
}
