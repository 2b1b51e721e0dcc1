//! Ingestion error types.
//!
//! Parsing a syllabus is the only place this subsystem can reject input.
//! Everything downstream of ingestion (planning, queueing, grading) is
//! total over well-typed data and never errors.

use thiserror::Error;

/// Errors raised while parsing syllabus elements and related identifiers.
#[derive(Debug, Error)]
pub enum SyllabusError {
    /// An element code did not have the expected dotted structure.
    #[error("malformed element code '{code}': {reason}")]
    MalformedCode { code: String, reason: String },

    /// An element type string was not one of knowledge/risk/skill.
    #[error("unknown element type: {0}")]
    UnknownElementType(String),

    /// A difficulty string was not recognized.
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// A study mode string was not recognized.
    #[error("unknown study mode: {0}")]
    UnknownStudyMode(String),

    /// An attempt score string was not recognized.
    #[error("unknown attempt score: {0}")]
    UnknownScore(String),

    /// A completion trigger string was not recognized.
    #[error("unknown completion trigger: {0}")]
    UnknownTrigger(String),

    /// A rating string was not recognized.
    #[error("unknown rating: {0}")]
    UnknownRating(String),
}

impl SyllabusError {
    pub(crate) fn malformed(code: &str, reason: impl Into<String>) -> Self {
        SyllabusError::MalformedCode {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}
