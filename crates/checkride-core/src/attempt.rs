//! Scored attempt facts.
//!
//! Attempts are append-only records produced by the external assessment
//! step; the grading engine only reads them. When one element is probed
//! more than once, the last attempt supersedes the earlier ones.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyllabusError;
use crate::syllabus::ElementCode;

/// Point value of a satisfactory answer.
pub const SATISFACTORY_POINTS: f64 = 1.0;
/// Point value of a partially satisfactory answer.
pub const PARTIAL_POINTS: f64 = 0.7;
/// Point value of an unsatisfactory answer.
pub const UNSATISFACTORY_POINTS: f64 = 0.0;
/// Point value of an element credited by incidental mention.
pub const CREDITED_POINTS: f64 = 1.0;

/// Assessment outcome for a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptScore {
    Satisfactory,
    Partial,
    Unsatisfactory,
}

impl AttemptScore {
    /// The fixed point value used by every score computation.
    pub fn points(&self) -> f64 {
        match self {
            AttemptScore::Satisfactory => SATISFACTORY_POINTS,
            AttemptScore::Partial => PARTIAL_POINTS,
            AttemptScore::Unsatisfactory => UNSATISFACTORY_POINTS,
        }
    }
}

impl fmt::Display for AttemptScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptScore::Satisfactory => write!(f, "satisfactory"),
            AttemptScore::Partial => write!(f, "partial"),
            AttemptScore::Unsatisfactory => write!(f, "unsatisfactory"),
        }
    }
}

impl FromStr for AttemptScore {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "satisfactory" => Ok(AttemptScore::Satisfactory),
            "partial" => Ok(AttemptScore::Partial),
            "unsatisfactory" => Ok(AttemptScore::Unsatisfactory),
            other => Err(SyllabusError::UnknownScore(other.to_string())),
        }
    }
}

/// One scored interaction with the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementAttempt {
    /// The element that was probed.
    pub element_code: ElementCode,
    /// The assessment outcome.
    pub score: AttemptScore,
}

impl ElementAttempt {
    pub fn new(element_code: ElementCode, score: AttemptScore) -> Self {
        Self {
            element_code,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_values_are_fixed() {
        assert_eq!(AttemptScore::Satisfactory.points(), 1.0);
        assert_eq!(AttemptScore::Partial.points(), 0.7);
        assert_eq!(AttemptScore::Unsatisfactory.points(), 0.0);
        assert_eq!(CREDITED_POINTS, 1.0);
    }

    #[test]
    fn score_display_and_parse() {
        assert_eq!(AttemptScore::Partial.to_string(), "partial");
        assert_eq!(
            "Satisfactory".parse::<AttemptScore>().unwrap(),
            AttemptScore::Satisfactory
        );
        assert!("excellent".parse::<AttemptScore>().is_err());
    }

    #[test]
    fn attempt_serde_roundtrip() {
        let attempt = ElementAttempt::new(
            "PA.I.A.K1".parse().unwrap(),
            AttemptScore::Unsatisfactory,
        );
        let json = serde_json::to_string(&attempt).unwrap();
        let back: ElementAttempt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.element_code, attempt.element_code);
        assert_eq!(back.score, AttemptScore::Unsatisfactory);
    }
}
