//! The grading engine.
//!
//! `compute_result` is a single pure function from the accumulated
//! attempts and the final coverage plan to the terminal `ExamResult`. It is
//! total over well-typed input: an empty plan, unknown area numerals, or a
//! rating with no critical-area entry all produce a result, never an error.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::attempt::{AttemptScore, CREDITED_POINTS, ElementAttempt};
use crate::plan::{CoveragePlan, CoverageStatus};
use crate::result::{
    AreaBreakdown, AreaGate, CompletionTrigger, ExamResult, OverallStatus, ScoreCounts,
    WeakElement, WeakSeverity, RESULT_SCHEMA_VERSION,
};
use crate::syllabus::{AreaId, Rating};

/// Fewest asked elements for an early-stopped session to be gradable at all.
const MIN_ASKED_FOR_EARLY_STOP: u32 = 3;

/// Thresholds and critical-area configuration for gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatingConfig {
    /// Plan-based score below this fails the session.
    pub overall_pass_threshold: f64,
    /// Area score below this fails the area.
    pub area_pass_threshold: f64,
    /// Areas with fewer asked elements than this are insufficient data.
    pub min_area_attempts: u32,
    /// Explicit critical-area override; `None` falls back to the rating's
    /// default list.
    #[serde(default)]
    pub critical_areas: Option<Vec<AreaId>>,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            overall_pass_threshold: 0.70,
            area_pass_threshold: 0.60,
            min_area_attempts: 2,
            critical_areas: None,
        }
    }
}

/// Running tally for one area while grading.
#[derive(Default)]
struct AreaTally {
    planned: u32,
    asked: u32,
    satisfactory: u32,
    partial: u32,
    unsatisfactory: u32,
    credited: u32,
    asked_points: f64,
}

/// Round a normalized score to two decimal places.
fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Grade a session.
///
/// Attempts are deduplicated by element code (last write wins) before any
/// counting; attempts on codes outside the plan are ignored. Calling this
/// twice with identical inputs yields an identical result apart from
/// `graded_at`.
pub fn compute_result(
    attempts: &[ElementAttempt],
    plan: &CoveragePlan,
    trigger: CompletionTrigger,
    rating: Option<Rating>,
    config: &GatingConfig,
) -> ExamResult {
    let plan_exhausted = trigger == CompletionTrigger::AllTasksCovered || plan.pending_count() == 0;

    if plan.is_empty() {
        return ExamResult {
            schema_version: RESULT_SCHEMA_VERSION,
            plan_id: plan.id,
            status: OverallStatus::Incomplete,
            overall_score: 0.0,
            asked_score: 0.0,
            counts: ScoreCounts::default(),
            areas: Vec::new(),
            weak_elements: Vec::new(),
            failed_areas: Vec::new(),
            completion_trigger: trigger,
            plan_exhausted,
            graded_at: Utc::now(),
        };
    }

    // Last write wins; the plan is the denominator authority, so attempts
    // on codes outside it are dropped here.
    let mut final_scores = BTreeMap::new();
    for attempt in attempts {
        if plan.status(&attempt.element_code).is_some() {
            final_scores.insert(&attempt.element_code, attempt.score);
        }
    }

    let critical_areas: Vec<AreaId> = config
        .critical_areas
        .clone()
        .or_else(|| rating.map(|r| r.critical_areas()))
        .unwrap_or_default();

    let mut counts = ScoreCounts::default();
    let mut tallies: BTreeMap<AreaId, AreaTally> = BTreeMap::new();
    let mut weak_elements = Vec::new();
    let mut asked_points = 0.0;

    for (code, status) in plan.coverage() {
        let tally = tallies.entry(code.area().clone()).or_default();
        match status {
            CoverageStatus::Skipped => {
                counts.skipped += 1;
            }
            CoverageStatus::CreditedByMention => {
                counts.total_in_plan += 1;
                counts.credited += 1;
                tally.planned += 1;
                tally.credited += 1;
            }
            CoverageStatus::Pending | CoverageStatus::Asked => {
                counts.total_in_plan += 1;
                tally.planned += 1;
                match final_scores.get(code) {
                    Some(score) => {
                        counts.asked += 1;
                        tally.asked += 1;
                        tally.asked_points += score.points();
                        asked_points += score.points();
                        match score {
                            AttemptScore::Satisfactory => {
                                counts.satisfactory += 1;
                                tally.satisfactory += 1;
                            }
                            AttemptScore::Partial => {
                                counts.partial += 1;
                                tally.partial += 1;
                                weak_elements.push(WeakElement {
                                    code: code.clone(),
                                    area: code.area().clone(),
                                    score: Some(*score),
                                    severity: WeakSeverity::Partial,
                                });
                            }
                            AttemptScore::Unsatisfactory => {
                                counts.unsatisfactory += 1;
                                tally.unsatisfactory += 1;
                                weak_elements.push(WeakElement {
                                    code: code.clone(),
                                    area: code.area().clone(),
                                    score: Some(*score),
                                    severity: WeakSeverity::Unsatisfactory,
                                });
                            }
                        }
                    }
                    None => {
                        counts.not_asked += 1;
                        weak_elements.push(WeakElement {
                            code: code.clone(),
                            area: code.area().clone(),
                            score: None,
                            severity: WeakSeverity::NotAsked,
                        });
                    }
                }
            }
        }
    }

    // Most urgent first; the sort is stable, so elements keep code order
    // within a severity.
    weak_elements.sort_by_key(|w| w.severity);

    let plan_points = asked_points + f64::from(counts.credited) * CREDITED_POINTS;
    let overall_score = if counts.total_in_plan == 0 {
        0.0
    } else {
        round2(plan_points / f64::from(counts.total_in_plan))
    };
    let asked_score = if counts.asked == 0 {
        0.0
    } else {
        round2(asked_points / f64::from(counts.asked))
    };

    let mut areas = Vec::with_capacity(tallies.len());
    let mut failed_areas = Vec::new();
    for (area, tally) in tallies {
        if tally.planned == 0 {
            // Area held only skipped elements; nothing gradable to report.
            continue;
        }
        let scored = tally.asked + tally.credited;
        let score = if scored == 0 {
            0.0
        } else {
            round2(
                (tally.asked_points + f64::from(tally.credited) * CREDITED_POINTS)
                    / f64::from(scored),
            )
        };

        let (gate, reason) = if tally.asked < config.min_area_attempts {
            (
                AreaGate::InsufficientData,
                Some(format!(
                    "only {} of the {} attempts needed to judge this area",
                    tally.asked, config.min_area_attempts
                )),
            )
        } else if score < config.area_pass_threshold {
            (
                AreaGate::Fail,
                Some(format!(
                    "area score {:.2} below pass threshold {:.2}",
                    score, config.area_pass_threshold
                )),
            )
        } else if critical_areas.contains(&area) && tally.unsatisfactory > 0 {
            // Zero tolerance: a single unsatisfactory element fails a
            // critical area no matter the aggregate score. Credited
            // elements are exempt by construction (a mention cannot be
            // unsatisfactory).
            (
                AreaGate::Fail,
                Some(format!(
                    "Critical area {area} contains an unsatisfactory element"
                )),
            )
        } else {
            (AreaGate::Pass, None)
        };

        if gate == AreaGate::Fail {
            failed_areas.push(area.clone());
        }

        areas.push(AreaBreakdown {
            area,
            planned: tally.planned,
            asked: tally.asked,
            satisfactory: tally.satisfactory,
            partial: tally.partial,
            unsatisfactory: tally.unsatisfactory,
            credited: tally.credited,
            score,
            gate,
            reason,
        });
    }

    let status = if counts.asked == 0 {
        OverallStatus::Incomplete
    } else if trigger.is_early_stop() && counts.asked < MIN_ASKED_FOR_EARLY_STOP {
        OverallStatus::Incomplete
    } else if overall_score < config.overall_pass_threshold {
        OverallStatus::Fail
    } else if !failed_areas.is_empty() {
        OverallStatus::Fail
    } else {
        OverallStatus::Pass
    };

    ExamResult {
        schema_version: RESULT_SCHEMA_VERSION,
        plan_id: plan.id,
        status,
        overall_score,
        asked_score,
        counts,
        areas,
        weak_elements,
        failed_areas,
        completion_trigger: trigger,
        plan_exhausted,
        graded_at: Utc::now(),
    }
}
