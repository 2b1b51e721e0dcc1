//! Next-question ordering.
//!
//! `build_queue` is a pure function of the plan, the syllabus subset, and
//! historical performance. It never mutates the plan; callers re-invoke it
//! as attempts are recorded.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::attempt::AttemptScore;
use crate::history::PerformanceHistory;
use crate::plan::{CoveragePlan, CoverageStatus, StudyMode};
use crate::syllabus::{AreaId, ElementCode, SyllabusElement};

/// Produce the ordered element codes to ask next.
///
/// Only elements still pending in the plan are candidates, each code
/// appears at most once, and an exhausted plan yields an empty queue (it is
/// the orchestrator's job to check `is_exhausted` and end the session
/// rather than loop).
pub fn build_queue(
    plan: &CoveragePlan,
    elements: &[SyllabusElement],
    history: &PerformanceHistory,
) -> Vec<ElementCode> {
    if plan.is_exhausted() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let candidates: Vec<&SyllabusElement> = elements
        .iter()
        .filter(|e| plan.status(&e.code) == Some(CoverageStatus::Pending))
        .filter(|e| seen.insert(e.code.clone()))
        .collect();

    match plan.mode {
        StudyMode::Linear => candidates.iter().map(|e| e.code.clone()).collect(),
        StudyMode::CrossAcs => round_robin_by_area(&candidates),
        StudyMode::WeakAreas => weakest_first(&candidates, history),
        StudyMode::QuickDrill => quick_drill(&candidates, history),
    }
}

/// Interleave areas so no single area gets a long run: take one element
/// from each area in Roman order, then wrap around.
fn round_robin_by_area(candidates: &[&SyllabusElement]) -> Vec<ElementCode> {
    let mut by_area: BTreeMap<AreaId, VecDeque<&SyllabusElement>> = BTreeMap::new();
    for &element in candidates {
        by_area
            .entry(element.code.area().clone())
            .or_default()
            .push_back(element);
    }

    let mut queue = Vec::with_capacity(candidates.len());
    while by_area.values().any(|q| !q.is_empty()) {
        for area_queue in by_area.values_mut() {
            if let Some(element) = area_queue.pop_front() {
                queue.push(element.code.clone());
            }
        }
    }
    queue
}

/// Ascending historical satisfactory rate; never-attempted elements rate
/// 0.0 and come first. Ties keep syllabus order.
fn weakest_first(
    candidates: &[&SyllabusElement],
    history: &PerformanceHistory,
) -> Vec<ElementCode> {
    let mut ordered: Vec<&SyllabusElement> = candidates.to_vec();
    ordered.sort_by(|a, b| {
        history
            .satisfactory_rate(&a.code)
            .total_cmp(&history.satisfactory_rate(&b.code))
    });
    ordered.iter().map(|e| e.code.clone()).collect()
}

/// Drop elements whose most recent score was satisfactory; the remainder
/// (latest unsatisfactory/partial and never-attempted) stay in syllabus
/// order, prioritized equally. Falls back to the full candidate set rather
/// than stalling when everything was recently satisfactory.
fn quick_drill(
    candidates: &[&SyllabusElement],
    history: &PerformanceHistory,
) -> Vec<ElementCode> {
    let drill: Vec<ElementCode> = candidates
        .iter()
        .filter(|e| history.latest(&e.code) != Some(AttemptScore::Satisfactory))
        .map(|e| e.code.clone())
        .collect();

    if drill.is_empty() && !candidates.is_empty() {
        tracing::debug!(
            candidates = candidates.len(),
            "quick_drill exclusion emptied the queue, falling back to all pending elements"
        );
        return candidates.iter().map(|e| e.code.clone()).collect();
    }
    drill
}
