//! The `checkride grade` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use checkride_core::grading::{compute_result, GatingConfig};
use checkride_core::result::{AreaGate, ExamResult};
use checkride_core::syllabus::Rating;
use checkride_report::html::write_html_debrief;
use checkride_report::markdown::generate_markdown;

use super::load_session;

pub fn execute(
    session_path: PathBuf,
    rating_str: Option<String>,
    overall_threshold: f64,
    area_threshold: f64,
    min_area_attempts: u32,
    output: PathBuf,
    format: String,
) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&overall_threshold),
        "overall threshold must be between 0.0 and 1.0"
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&area_threshold),
        "area threshold must be between 0.0 and 1.0"
    );

    let session = load_session(&session_path)?;

    // The flag wins over the rating stored in the session.
    let rating = match rating_str {
        Some(r) => Some(r.parse::<Rating>()?),
        None => session.rating,
    };

    let config = GatingConfig {
        overall_pass_threshold: overall_threshold,
        area_pass_threshold: area_threshold,
        min_area_attempts,
        critical_areas: None,
    };

    let result = compute_result(
        &session.attempts,
        &session.plan,
        session.trigger,
        rating,
        &config,
    );
    tracing::debug!(plan_id = %session.plan.id, status = %result.status, "graded session");

    print_summary(&result);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown", "html"]
    } else {
        format.split(',').collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("result-{timestamp}.json"));
                result.save_json(&path)?;
                eprintln!("Result saved to: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("result-{timestamp}.md"));
                std::fs::write(&path, generate_markdown(&result))?;
                eprintln!("Markdown debrief: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("result-{timestamp}.html"));
                write_html_debrief(&result, &path)?;
                eprintln!("HTML debrief: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(result: &ExamResult) {
    println!(
        "Overall: {} | plan-based {:.0}% | asked-only {:.0}% | {} of {} asked",
        result.status,
        result.overall_score * 100.0,
        result.asked_score * 100.0,
        result.counts.asked,
        result.counts.total_in_plan,
    );

    if result.areas.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Area", "Asked", "Score", "Gate", "Reason"]);

    for area in &result.areas {
        let gate = match area.gate {
            AreaGate::Pass => "pass",
            AreaGate::Fail => "FAIL",
            AreaGate::InsufficientData => "insufficient",
        };
        table.add_row(vec![
            Cell::new(&area.area),
            Cell::new(format!("{}/{}", area.asked, area.planned)),
            Cell::new(format!("{:.0}%", area.score * 100.0)),
            Cell::new(gate),
            Cell::new(area.reason.as_deref().unwrap_or("")),
        ]);
    }

    println!("{table}");

    if !result.weak_elements.is_empty() {
        println!("\nStudy list ({} elements):", result.weak_elements.len());
        for weak in &result.weak_elements {
            let note = match weak.score {
                Some(score) => score.to_string(),
                None => "not asked".to_string(),
            };
            println!("  {} ({note})", weak.code);
        }
    }
}
