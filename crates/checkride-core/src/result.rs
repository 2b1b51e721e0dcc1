//! Exam result types with JSON persistence and progress comparison.
//!
//! An `ExamResult` is the terminal artifact of a session: produced once at
//! close, never mutated. Re-grading a session means calling the engine
//! again with updated inputs and getting a new result.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attempt::AttemptScore;
use crate::error::SyllabusError;
use crate::syllabus::{AreaId, ElementCode};

/// Bump when the serialized result layout changes.
pub const RESULT_SCHEMA_VERSION: u32 = 1;

/// The session-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pass,
    Fail,
    Incomplete,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallStatus::Pass => write!(f, "pass"),
            OverallStatus::Fail => write!(f, "fail"),
            OverallStatus::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionTrigger {
    /// Every planned element was addressed.
    AllTasksCovered,
    /// The question budget ran out.
    QuestionLimitReached,
    /// The candidate chose to stop.
    UserEnded,
    /// The session went silent and was closed by the orchestrator.
    Abandoned,
}

impl CompletionTrigger {
    /// Early stops carry less evidence; grading treats them differently
    /// when very few elements were asked.
    pub fn is_early_stop(&self) -> bool {
        matches!(self, CompletionTrigger::UserEnded | CompletionTrigger::Abandoned)
    }
}

impl fmt::Display for CompletionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionTrigger::AllTasksCovered => write!(f, "all_tasks_covered"),
            CompletionTrigger::QuestionLimitReached => write!(f, "question_limit_reached"),
            CompletionTrigger::UserEnded => write!(f, "user_ended"),
            CompletionTrigger::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl FromStr for CompletionTrigger {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all_tasks_covered" => Ok(CompletionTrigger::AllTasksCovered),
            "question_limit_reached" => Ok(CompletionTrigger::QuestionLimitReached),
            "user_ended" => Ok(CompletionTrigger::UserEnded),
            "abandoned" => Ok(CompletionTrigger::Abandoned),
            other => Err(SyllabusError::UnknownTrigger(other.to_string())),
        }
    }
}

/// Area-level gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaGate {
    Pass,
    Fail,
    /// Too few asked elements in the area to judge it; excluded from
    /// pass/fail consequences.
    InsufficientData,
}

/// How urgently an element needs remediation.
///
/// Declaration order is severity order: unsatisfactory answers outrank
/// partial ones, which outrank elements never asked at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakSeverity {
    Unsatisfactory,
    Partial,
    NotAsked,
}

/// An element flagged for remediation. Credited and skipped elements are
/// never flagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakElement {
    pub code: ElementCode,
    pub area: AreaId,
    /// The final deduped score, if the element was scored at all.
    pub score: Option<AttemptScore>,
    pub severity: WeakSeverity,
}

/// Full count breakdown across the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounts {
    /// Gradable elements in the plan (skipped excluded).
    pub total_in_plan: u32,
    /// Elements with a recorded score.
    pub asked: u32,
    pub satisfactory: u32,
    pub partial: u32,
    pub unsatisfactory: u32,
    /// Elements credited by incidental mention.
    pub credited: u32,
    /// Gradable elements never scored.
    pub not_asked: u32,
    /// Elements explicitly excluded from scoring.
    pub skipped: u32,
}

/// Derived per-area aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaBreakdown {
    pub area: AreaId,
    /// Gradable elements planned in this area.
    pub planned: u32,
    pub asked: u32,
    pub satisfactory: u32,
    pub partial: u32,
    pub unsatisfactory: u32,
    pub credited: u32,
    /// Normalized area score over asked plus credited elements.
    pub score: f64,
    pub gate: AreaGate,
    /// Human-readable reason when the gate is not a plain pass.
    #[serde(default)]
    pub reason: Option<String>,
}

/// The terminal, immutable grading artifact for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    /// Serialized layout version.
    pub schema_version: u32,
    /// The plan this result was graded from.
    pub plan_id: Uuid,
    pub status: OverallStatus,
    /// Plan-based score: asked plus credited points over the full gradable
    /// plan. Drives the pass/fail decision.
    pub overall_score: f64,
    /// Asked-only score, reported for diagnostic comparison. Never drives
    /// gating.
    pub asked_score: f64,
    pub counts: ScoreCounts,
    /// Per-area breakdowns in Roman-numeral order, unrecognized areas last.
    pub areas: Vec<AreaBreakdown>,
    /// Remediation list, most urgent first.
    pub weak_elements: Vec<WeakElement>,
    /// Areas gated `fail`.
    pub failed_areas: Vec<AreaId>,
    pub completion_trigger: CompletionTrigger,
    /// Whether the plan itself ran out, as opposed to an early stop.
    pub plan_exhausted: bool,
    pub graded_at: DateTime<Utc>,
}

impl ExamResult {
    /// Save the result as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: ExamResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }

    /// Compare this result against an earlier grading of the same syllabus
    /// to see where the candidate moved.
    pub fn compare(&self, baseline: &ExamResult, threshold: f64) -> ProgressReport {
        let baseline_scores: Vec<(&AreaId, f64)> =
            baseline.areas.iter().map(|a| (&a.area, a.score)).collect();

        let mut improved = Vec::new();
        let mut regressed = Vec::new();
        let mut unchanged = 0usize;
        let mut new_areas = 0usize;

        for current in &self.areas {
            match baseline_scores
                .iter()
                .find(|(area, _)| **area == current.area)
            {
                Some((_, baseline_score)) => {
                    let delta = current.score - baseline_score;
                    let record = AreaDelta {
                        area: current.area.clone(),
                        baseline_score: *baseline_score,
                        current_score: current.score,
                        delta,
                    };
                    if delta < -threshold {
                        regressed.push(record);
                    } else if delta > threshold {
                        improved.push(record);
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_areas += 1,
            }
        }

        let removed_areas = baseline
            .areas
            .iter()
            .filter(|b| !self.areas.iter().any(|c| c.area == b.area))
            .count();

        ProgressReport {
            improved,
            regressed,
            unchanged,
            new_areas,
            removed_areas,
        }
    }
}

/// Result of comparing two gradings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Areas where the score went up.
    pub improved: Vec<AreaDelta>,
    /// Areas where the score went down.
    pub regressed: Vec<AreaDelta>,
    /// Areas with no significant change.
    pub unchanged: usize,
    /// Areas in the current result but not the baseline.
    pub new_areas: usize,
    /// Areas in the baseline but not the current result.
    pub removed_areas: usize,
}

/// One area's score movement between two gradings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaDelta {
    pub area: AreaId,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressed, {} improved, {} unchanged\n\n",
            self.regressed.len(),
            self.improved.len(),
            self.unchanged
        ));

        if !self.regressed.is_empty() {
            md.push_str("### Regressed areas\n\n");
            md.push_str("| Area | Baseline | Current | Delta |\n");
            md.push_str("|------|----------|---------|-------|\n");
            for d in &self.regressed {
                md.push_str(&format!(
                    "| {} | {:.0}% | {:.0}% | {:.0}% |\n",
                    d.area,
                    d.baseline_score * 100.0,
                    d.current_score * 100.0,
                    d.delta * 100.0
                ));
            }
            md.push('\n');
        }

        if !self.improved.is_empty() {
            md.push_str("### Improved areas\n\n");
            md.push_str("| Area | Baseline | Current | Delta |\n");
            md.push_str("|------|----------|---------|-------|\n");
            for d in &self.improved {
                md.push_str(&format!(
                    "| {} | {:.0}% | {:.0}% | +{:.0}% |\n",
                    d.area,
                    d.baseline_score * 100.0,
                    d.current_score * 100.0,
                    d.delta * 100.0
                ));
            }
        }

        md
    }

    /// Returns `true` if any area regressed.
    pub fn has_regressions(&self) -> bool {
        !self.regressed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_breakdown(area: &str, score: f64) -> AreaBreakdown {
        AreaBreakdown {
            area: AreaId::parse(area),
            planned: 4,
            asked: 4,
            satisfactory: 4,
            partial: 0,
            unsatisfactory: 0,
            credited: 0,
            score,
            gate: AreaGate::Pass,
            reason: None,
        }
    }

    fn make_result(areas: Vec<AreaBreakdown>) -> ExamResult {
        ExamResult {
            schema_version: RESULT_SCHEMA_VERSION,
            plan_id: Uuid::nil(),
            status: OverallStatus::Pass,
            overall_score: 1.0,
            asked_score: 1.0,
            counts: ScoreCounts::default(),
            areas,
            weak_elements: vec![],
            failed_areas: vec![],
            completion_trigger: CompletionTrigger::AllTasksCovered,
            plan_exhausted: true,
            graded_at: Utc::now(),
        }
    }

    #[test]
    fn weak_severity_order() {
        assert!(WeakSeverity::Unsatisfactory < WeakSeverity::Partial);
        assert!(WeakSeverity::Partial < WeakSeverity::NotAsked);
    }

    #[test]
    fn compare_detects_regression_and_improvement() {
        let baseline = make_result(vec![area_breakdown("I", 0.9), area_breakdown("II", 0.5)]);
        let current = make_result(vec![area_breakdown("I", 0.6), area_breakdown("II", 0.8)]);

        let report = current.compare(&baseline, 0.05);
        assert_eq!(report.regressed.len(), 1);
        assert_eq!(report.regressed[0].area, AreaId::Numbered(1));
        assert_eq!(report.improved.len(), 1);
        assert_eq!(report.improved[0].area, AreaId::Numbered(2));
        assert!(report.has_regressions());
    }

    #[test]
    fn compare_small_deltas_are_unchanged() {
        let baseline = make_result(vec![area_breakdown("I", 0.80)]);
        let current = make_result(vec![area_breakdown("I", 0.82)]);

        let report = current.compare(&baseline, 0.05);
        assert!(report.regressed.is_empty());
        assert!(report.improved.is_empty());
        assert_eq!(report.unchanged, 1);
    }

    #[test]
    fn compare_counts_new_and_removed_areas() {
        let baseline = make_result(vec![area_breakdown("I", 0.8)]);
        let current = make_result(vec![area_breakdown("II", 0.8)]);

        let report = current.compare(&baseline, 0.05);
        assert_eq!(report.new_areas, 1);
        assert_eq!(report.removed_areas, 1);
    }

    #[test]
    fn json_roundtrip() {
        let result = make_result(vec![area_breakdown("I", 0.75)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        result.save_json(&path).unwrap();
        let loaded = ExamResult::load_json(&path).unwrap();

        assert_eq!(loaded.plan_id, result.plan_id);
        assert_eq!(loaded.areas.len(), 1);
        assert_eq!(loaded.areas[0].area, AreaId::Numbered(1));
    }

    #[test]
    fn markdown_output_lists_regressions() {
        let baseline = make_result(vec![area_breakdown("I", 0.9)]);
        let current = make_result(vec![area_breakdown("I", 0.4)]);

        let md = current.compare(&baseline, 0.05).to_markdown();
        assert!(md.contains("Regressed areas"));
        assert!(md.contains("| I |"));
    }

    #[test]
    fn trigger_parse_and_early_stop() {
        assert_eq!(
            "user_ended".parse::<CompletionTrigger>().unwrap(),
            CompletionTrigger::UserEnded
        );
        assert!(CompletionTrigger::UserEnded.is_early_stop());
        assert!(CompletionTrigger::Abandoned.is_early_stop());
        assert!(!CompletionTrigger::AllTasksCovered.is_early_stop());
        assert!("timeout".parse::<CompletionTrigger>().is_err());
    }
}
