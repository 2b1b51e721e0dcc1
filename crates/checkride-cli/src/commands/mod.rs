//! CLI subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use checkride_core::attempt::ElementAttempt;
use checkride_core::plan::CoveragePlan;
use checkride_core::result::CompletionTrigger;
use checkride_core::syllabus::Rating;

pub mod compare;
pub mod grade;
pub mod init;
pub mod queue;
pub mod validate;

/// On-disk session snapshot exchanged with the orchestrator.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionFile {
    /// The coverage plan as last persisted.
    pub plan: CoveragePlan,
    /// All scored attempts, oldest first.
    #[serde(default)]
    pub attempts: Vec<ElementAttempt>,
    /// Why the session ended (for grading).
    pub trigger: CompletionTrigger,
    /// The candidate's target rating, if known.
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// Load a session snapshot from JSON.
pub fn load_session(path: &Path) -> Result<SessionFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session from {}", path.display()))?;
    let session: SessionFile =
        serde_json::from_str(&content).context("failed to parse session JSON")?;
    Ok(session)
}
