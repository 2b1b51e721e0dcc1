//! Session coverage state and question budgets.
//!
//! A `CoveragePlan` is created once at session start from a syllabus
//! subset, mutated exactly once per turn by the orchestrator, and handed
//! intact to the grading engine at session close. It is the durable record
//! of what the session was supposed to cover and what actually happened.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SyllabusError;
use crate::syllabus::{ElementCode, SyllabusElement};

/// Bump when the serialized plan layout changes.
pub const PLAN_SCHEMA_VERSION: u32 = 1;

/// Where one element stands within one session.
///
/// `CreditedByMention` and `Skipped` are terminal: once set, recording an
/// attempt leaves them untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    /// Not yet addressed.
    Pending,
    /// A score was recorded directly.
    Asked,
    /// Demonstrated unprompted during another exchange; counts as
    /// satisfactory but consumes no question budget.
    CreditedByMention,
    /// Explicitly excluded from scoring (e.g. inapplicable equipment).
    Skipped,
}

/// How the queue builder orders the next questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Syllabus definition order, area by area.
    Linear,
    /// Round-robin across areas to avoid long single-area runs.
    CrossAcs,
    /// Weakest historical performance first.
    WeakAreas,
    /// Only elements not recently answered satisfactorily.
    QuickDrill,
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyMode::Linear => write!(f, "linear"),
            StudyMode::CrossAcs => write!(f, "cross_acs"),
            StudyMode::WeakAreas => write!(f, "weak_areas"),
            StudyMode::QuickDrill => write!(f, "quick_drill"),
        }
    }
}

impl FromStr for StudyMode {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(StudyMode::Linear),
            "cross_acs" => Ok(StudyMode::CrossAcs),
            "weak_areas" => Ok(StudyMode::WeakAreas),
            "quick_drill" => Ok(StudyMode::QuickDrill),
            other => Err(SyllabusError::UnknownStudyMode(other.to_string())),
        }
    }
}

/// Question budget limits for a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Target number of direct asks.
    pub planned_question_count: u32,
    /// Extra questions allowed beyond the plan (follow-ups on weak answers).
    pub bonus_question_max: u32,
    /// Cap on repeated probing of one element.
    pub follow_up_max_per_element: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            planned_question_count: 20,
            bonus_question_max: 5,
            follow_up_max_per_element: 2,
        }
    }
}

/// The per-session coverage state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveragePlan {
    /// Serialized layout version.
    pub schema_version: u32,
    /// Session-scoped identifier, carried into the exam result.
    pub id: Uuid,
    /// The ordering mode for this session.
    pub mode: StudyMode,
    /// Budget limits.
    pub config: PlanConfig,
    /// Direct asks recorded so far.
    pub asked_count: u32,
    /// Bonus questions consumed by follow-ups.
    pub bonus_used: u32,
    coverage: BTreeMap<ElementCode, CoverageStatus>,
    #[serde(default)]
    attempts_per_element: BTreeMap<ElementCode, u32>,
}

impl CoveragePlan {
    /// Build a plan with every element pending and counters zeroed.
    ///
    /// An empty element list produces a valid but degenerate plan; grading
    /// it yields the `incomplete` result.
    pub fn new(elements: &[SyllabusElement], mode: StudyMode, config: PlanConfig) -> Self {
        let coverage = elements
            .iter()
            .map(|e| (e.code.clone(), CoverageStatus::Pending))
            .collect();
        Self {
            schema_version: PLAN_SCHEMA_VERSION,
            id: Uuid::new_v4(),
            mode,
            config,
            asked_count: 0,
            bonus_used: 0,
            coverage,
            attempts_per_element: BTreeMap::new(),
        }
    }

    /// Coverage status for an element, if it is in the plan.
    pub fn status(&self, code: &ElementCode) -> Option<CoverageStatus> {
        self.coverage.get(code).copied()
    }

    /// The full coverage map, ordered by element code.
    pub fn coverage(&self) -> &BTreeMap<ElementCode, CoverageStatus> {
        &self.coverage
    }

    /// Attempts recorded against one element so far.
    pub fn attempts_on(&self, code: &ElementCode) -> u32 {
        self.attempts_per_element.get(code).copied().unwrap_or(0)
    }

    /// Whether another ask on this element stays within the follow-up and
    /// bonus budgets. Advisory: the plan reports the cap, the queue builder
    /// and orchestrator obey it.
    pub fn can_follow_up(&self, code: &ElementCode) -> bool {
        self.attempts_on(code) <= self.config.follow_up_max_per_element
            && self.bonus_used < self.config.bonus_question_max
    }

    /// Record that an element was asked.
    ///
    /// Transitions `pending` to `asked` and increments `asked_count`.
    /// A repeat ask on the same element draws on the bonus budget while the
    /// per-element follow-up cap and the bonus maximum allow it. Elements
    /// already credited or skipped are left untouched, as is a code not in
    /// the plan.
    pub fn record_attempt(&mut self, code: &ElementCode) {
        let Some(status) = self.coverage.get_mut(code) else {
            return;
        };
        if matches!(
            status,
            CoverageStatus::CreditedByMention | CoverageStatus::Skipped
        ) {
            return;
        }

        let prior = self.attempts_per_element.entry(code.clone()).or_insert(0);
        if *prior > 0
            && *prior <= self.config.follow_up_max_per_element
            && self.bonus_used < self.config.bonus_question_max
        {
            self.bonus_used += 1;
        }
        *prior += 1;

        *status = CoverageStatus::Asked;
        self.asked_count += 1;
    }

    /// Mark an element as demonstrated unprompted. Only a pending element
    /// can be credited.
    pub fn credit_mention(&mut self, code: &ElementCode) {
        if let Some(status) = self.coverage.get_mut(code) {
            if *status == CoverageStatus::Pending {
                *status = CoverageStatus::CreditedByMention;
            }
        }
    }

    /// Exclude a pending element from scoring.
    pub fn skip(&mut self, code: &ElementCode) {
        if let Some(status) = self.coverage.get_mut(code) {
            if *status == CoverageStatus::Pending {
                *status = CoverageStatus::Skipped;
            }
        }
    }

    /// True when nothing remains to ask: every element has left `pending`,
    /// or the direct-ask budget (plan plus consumed bonus) is spent.
    pub fn is_exhausted(&self) -> bool {
        let none_pending = self
            .coverage
            .values()
            .all(|s| *s != CoverageStatus::Pending);
        none_pending || self.asked_count >= self.config.planned_question_count + self.bonus_used
    }

    /// Elements still pending.
    pub fn pending_count(&self) -> usize {
        self.coverage
            .values()
            .filter(|s| **s == CoverageStatus::Pending)
            .count()
    }

    /// Total elements in the plan, including skipped ones.
    pub fn len(&self) -> usize {
        self.coverage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syllabus::Difficulty;

    fn element(code: &str) -> SyllabusElement {
        let code: ElementCode = code.parse().unwrap();
        SyllabusElement {
            task_id: code.task_id(),
            element_type: code.element_type(),
            difficulty: Difficulty::Basic,
            description: format!("element {code}"),
            weight: 1.0,
            code,
        }
    }

    fn plan_of(codes: &[&str], config: PlanConfig) -> CoveragePlan {
        let elements: Vec<SyllabusElement> = codes.iter().map(|c| element(c)).collect();
        CoveragePlan::new(&elements, StudyMode::Linear, config)
    }

    #[test]
    fn new_plan_all_pending() {
        let plan = plan_of(&["PA.I.A.K1", "PA.I.A.K2"], PlanConfig::default());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.pending_count(), 2);
        assert_eq!(plan.asked_count, 0);
        assert_eq!(plan.bonus_used, 0);
        assert!(!plan.is_exhausted());
    }

    #[test]
    fn record_attempt_transitions_and_counts() {
        let mut plan = plan_of(&["PA.I.A.K1", "PA.I.A.K2"], PlanConfig::default());
        let code: ElementCode = "PA.I.A.K1".parse().unwrap();

        plan.record_attempt(&code);
        assert_eq!(plan.status(&code), Some(CoverageStatus::Asked));
        assert_eq!(plan.asked_count, 1);
        assert_eq!(plan.bonus_used, 0);
    }

    #[test]
    fn follow_up_draws_bonus_until_cap() {
        let config = PlanConfig {
            planned_question_count: 10,
            bonus_question_max: 5,
            follow_up_max_per_element: 2,
        };
        let mut plan = plan_of(&["PA.I.A.K1"], config);
        let code: ElementCode = "PA.I.A.K1".parse().unwrap();

        plan.record_attempt(&code); // direct ask
        assert_eq!(plan.bonus_used, 0);
        plan.record_attempt(&code); // follow-up 1
        assert_eq!(plan.bonus_used, 1);
        plan.record_attempt(&code); // follow-up 2, at the per-element cap
        assert_eq!(plan.bonus_used, 2);
        assert!(!plan.can_follow_up(&code));
        plan.record_attempt(&code); // beyond the cap: counted, no bonus
        assert_eq!(plan.bonus_used, 2);
        assert_eq!(plan.asked_count, 4);
    }

    #[test]
    fn bonus_budget_never_exceeds_max() {
        let config = PlanConfig {
            planned_question_count: 10,
            bonus_question_max: 1,
            follow_up_max_per_element: 5,
        };
        let mut plan = plan_of(&["PA.I.A.K1", "PA.I.A.K2"], config);
        let k1: ElementCode = "PA.I.A.K1".parse().unwrap();
        let k2: ElementCode = "PA.I.A.K2".parse().unwrap();

        plan.record_attempt(&k1);
        plan.record_attempt(&k1);
        plan.record_attempt(&k2);
        plan.record_attempt(&k2);
        assert_eq!(plan.bonus_used, 1);
    }

    #[test]
    fn credited_and_skipped_are_terminal() {
        let mut plan = plan_of(&["PA.I.A.K1", "PA.I.A.K2"], PlanConfig::default());
        let k1: ElementCode = "PA.I.A.K1".parse().unwrap();
        let k2: ElementCode = "PA.I.A.K2".parse().unwrap();

        plan.credit_mention(&k1);
        plan.skip(&k2);
        plan.record_attempt(&k1);
        plan.record_attempt(&k2);

        assert_eq!(plan.status(&k1), Some(CoverageStatus::CreditedByMention));
        assert_eq!(plan.status(&k2), Some(CoverageStatus::Skipped));
        assert_eq!(plan.asked_count, 0);
    }

    #[test]
    fn exhausted_when_nothing_pending() {
        let mut plan = plan_of(&["PA.I.A.K1", "PA.I.A.K2"], PlanConfig::default());
        plan.record_attempt(&"PA.I.A.K1".parse().unwrap());
        plan.skip(&"PA.I.A.K2".parse().unwrap());
        assert!(plan.is_exhausted());
    }

    #[test]
    fn exhausted_when_budget_spent() {
        let config = PlanConfig {
            planned_question_count: 1,
            bonus_question_max: 0,
            follow_up_max_per_element: 0,
        };
        let mut plan = plan_of(&["PA.I.A.K1", "PA.I.A.K2"], config);
        plan.record_attempt(&"PA.I.A.K1".parse().unwrap());
        assert!(plan.is_exhausted());
        assert_eq!(plan.pending_count(), 1);
    }

    #[test]
    fn unknown_code_is_ignored() {
        let mut plan = plan_of(&["PA.I.A.K1"], PlanConfig::default());
        plan.record_attempt(&"PA.IX.Z.K9".parse().unwrap());
        assert_eq!(plan.asked_count, 0);
    }

    #[test]
    fn study_mode_display_and_parse() {
        assert_eq!(StudyMode::CrossAcs.to_string(), "cross_acs");
        assert_eq!("quick_drill".parse::<StudyMode>().unwrap(), StudyMode::QuickDrill);
        assert!("random".parse::<StudyMode>().is_err());
    }

    #[test]
    fn plan_serde_roundtrip() {
        let mut plan = plan_of(&["PA.I.A.K1", "PA.II.B.R1"], PlanConfig::default());
        plan.record_attempt(&"PA.I.A.K1".parse().unwrap());

        let json = serde_json::to_string(&plan).unwrap();
        let back: CoveragePlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, plan.id);
        assert_eq!(back.asked_count, 1);
        assert_eq!(
            back.status(&"PA.I.A.K1".parse().unwrap()),
            Some(CoverageStatus::Asked)
        );
    }
}
