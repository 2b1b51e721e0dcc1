//! Markdown debrief generator.

use checkride_core::result::{AreaGate, ExamResult, OverallStatus};

/// Generate a Markdown debrief from an exam result.
pub fn generate_markdown(result: &ExamResult) -> String {
    let mut md = String::new();

    let verdict = match result.status {
        OverallStatus::Pass => "PASS",
        OverallStatus::Fail => "FAIL",
        OverallStatus::Incomplete => "INCOMPLETE",
    };
    md.push_str(&format!("# Checkride debrief — {verdict}\n\n"));
    md.push_str(&format!(
        "Graded {} | session ended: {} | plan exhausted: {}\n\n",
        result.graded_at.format("%Y-%m-%d %H:%M UTC"),
        result.completion_trigger,
        if result.plan_exhausted { "yes" } else { "no" }
    ));

    md.push_str("## Scores\n\n");
    md.push_str(&format!(
        "- **Overall (plan-based):** {:.0}%\n",
        result.overall_score * 100.0
    ));
    md.push_str(&format!(
        "- **Asked-only:** {:.0}%\n",
        result.asked_score * 100.0
    ));
    md.push_str(&format!(
        "- **Coverage:** {} of {} elements asked, {} credited, {} skipped\n\n",
        result.counts.asked,
        result.counts.total_in_plan,
        result.counts.credited,
        result.counts.skipped
    ));

    if !result.areas.is_empty() {
        md.push_str("## Areas of operation\n\n");
        md.push_str("| Area | Asked | Sat | Partial | Unsat | Credited | Score | Gate |\n");
        md.push_str("|------|-------|-----|---------|-------|----------|-------|------|\n");
        for area in &result.areas {
            let gate = match area.gate {
                AreaGate::Pass => "pass",
                AreaGate::Fail => "**fail**",
                AreaGate::InsufficientData => "insufficient data",
            };
            md.push_str(&format!(
                "| {} | {}/{} | {} | {} | {} | {} | {:.0}% | {} |\n",
                area.area,
                area.asked,
                area.planned,
                area.satisfactory,
                area.partial,
                area.unsatisfactory,
                area.credited,
                area.score * 100.0,
                gate
            ));
        }
        md.push('\n');

        for area in &result.areas {
            if let Some(reason) = &area.reason {
                md.push_str(&format!("- Area {}: {}\n", area.area, reason));
            }
        }
        md.push('\n');
    }

    if !result.weak_elements.is_empty() {
        md.push_str("## Study list\n\n");
        for weak in &result.weak_elements {
            let note = match weak.score {
                Some(score) => score.to_string(),
                None => "not asked".to_string(),
            };
            md.push_str(&format!("- `{}` — {}\n", weak.code, note));
        }
        md.push('\n');
    }

    md
}
