//! Per-element historical performance.
//!
//! The adaptive queue modes (`weak_areas`, `quick_drill`) rank elements by
//! how the candidate has done on them before. That history is passed in
//! explicitly as a value, so the queue builder stays a pure function with
//! no ambient store lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attempt::{AttemptScore, ElementAttempt};
use crate::syllabus::ElementCode;

/// Accumulated performance on one element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementHistory {
    /// Total attempts recorded.
    pub attempts: u32,
    /// How many of those were satisfactory.
    pub satisfactory_count: u32,
    /// The most recent score.
    pub latest: Option<AttemptScore>,
}

impl ElementHistory {
    /// Fraction of attempts that were satisfactory; 0.0 when never attempted.
    pub fn satisfactory_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.satisfactory_count) / f64::from(self.attempts)
        }
    }

    fn record(&mut self, score: AttemptScore) {
        self.attempts += 1;
        if score == AttemptScore::Satisfactory {
            self.satisfactory_count += 1;
        }
        self.latest = Some(score);
    }
}

/// Historical performance across elements, keyed by element code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceHistory {
    elements: BTreeMap<ElementCode, ElementHistory>,
}

impl PerformanceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a flat attempt list (oldest first) into per-element stats.
    pub fn from_attempts(attempts: &[ElementAttempt]) -> Self {
        let mut history = Self::new();
        for attempt in attempts {
            history.record(&attempt.element_code, attempt.score);
        }
        history
    }

    pub fn record(&mut self, code: &ElementCode, score: AttemptScore) {
        self.elements.entry(code.clone()).or_default().record(score);
    }

    pub fn get(&self, code: &ElementCode) -> Option<&ElementHistory> {
        self.elements.get(code)
    }

    /// The most recent score on an element, if it was ever attempted.
    pub fn latest(&self, code: &ElementCode) -> Option<AttemptScore> {
        self.elements.get(code).and_then(|h| h.latest)
    }

    /// Satisfactory rate for an element; never-attempted elements rate 0.0.
    pub fn satisfactory_rate(&self, code: &ElementCode) -> f64 {
        self.elements
            .get(code)
            .map(ElementHistory::satisfactory_rate)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ElementCode {
        s.parse().unwrap()
    }

    #[test]
    fn from_attempts_keeps_latest_and_counts() {
        let attempts = vec![
            ElementAttempt::new(code("PA.I.A.K1"), AttemptScore::Unsatisfactory),
            ElementAttempt::new(code("PA.I.A.K1"), AttemptScore::Satisfactory),
            ElementAttempt::new(code("PA.I.A.K2"), AttemptScore::Partial),
        ];
        let history = PerformanceHistory::from_attempts(&attempts);

        let k1 = history.get(&code("PA.I.A.K1")).unwrap();
        assert_eq!(k1.attempts, 2);
        assert_eq!(k1.satisfactory_count, 1);
        assert_eq!(k1.latest, Some(AttemptScore::Satisfactory));
        assert_eq!(k1.satisfactory_rate(), 0.5);

        assert_eq!(history.latest(&code("PA.I.A.K2")), Some(AttemptScore::Partial));
    }

    #[test]
    fn never_attempted_rates_zero() {
        let history = PerformanceHistory::new();
        assert_eq!(history.satisfactory_rate(&code("PA.I.A.K1")), 0.0);
        assert_eq!(history.latest(&code("PA.I.A.K1")), None);
    }
}
