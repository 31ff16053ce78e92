//! Expression contours: named dynamic-shaping profiles applied as a second
//! pass over every performance note.

use crate::error::{Error, Result};

/// Where a contour places its phrase emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseShaping {
    /// Emphasis through the middle of the phrase
    Gentle,
    /// Emphasis at phrase edges
    Bold,
    /// No phrase shaping
    Flat,
    /// Every note tagged ethereal
    Floating,
}

/// A global expression profile: bounded random velocity perturbation, a
/// phrase-shaping rule, and a periodic accent boost.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionContour {
    pub name: String,
    /// Velocity perturbation range as a fraction (0.15 = plus or minus 15%)
    pub velocity_variation: f32,
    pub shaping: PhraseShaping,
    /// Velocity multiplier on accent positions; values <= 1.0 disable accents
    pub accent_strength: f32,
}

impl ExpressionContour {
    pub fn natural() -> Self {
        Self {
            name: "natural".into(),
            velocity_variation: 0.15,
            shaping: PhraseShaping::Gentle,
            accent_strength: 1.2,
        }
    }

    pub fn dramatic() -> Self {
        Self {
            name: "dramatic".into(),
            velocity_variation: 0.4,
            shaping: PhraseShaping::Bold,
            accent_strength: 1.8,
        }
    }

    pub fn mechanical() -> Self {
        Self {
            name: "mechanical".into(),
            velocity_variation: 0.05,
            shaping: PhraseShaping::Flat,
            accent_strength: 1.0,
        }
    }

    pub fn ethereal() -> Self {
        Self {
            name: "ethereal".into(),
            velocity_variation: 0.25,
            shaping: PhraseShaping::Floating,
            accent_strength: 0.8,
        }
    }

    /// Select a contour by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "natural" => Ok(Self::natural()),
            "dramatic" => Ok(Self::dramatic()),
            "mechanical" => Ok(Self::mechanical()),
            "ethereal" => Ok(Self::ethereal()),
            other => Err(Error::UnknownContour(other.to_string())),
        }
    }
}

impl Default for ExpressionContour {
    fn default() -> Self {
        Self::natural()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_round_trips() {
        for name in ["natural", "dramatic", "mechanical", "ethereal"] {
            assert_eq!(ExpressionContour::by_name(name).unwrap().name, name);
        }
    }

    #[test]
    fn test_unknown_contour() {
        assert!(matches!(
            ExpressionContour::by_name("stoic"),
            Err(Error::UnknownContour(_))
        ));
    }

    #[test]
    fn test_mechanical_has_no_accent() {
        let c = ExpressionContour::mechanical();
        assert!(c.accent_strength <= 1.0);
        assert_eq!(c.shaping, PhraseShaping::Flat);
    }
}
