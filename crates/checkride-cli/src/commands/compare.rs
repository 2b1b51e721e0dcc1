//! The `checkride compare` command.

use std::path::PathBuf;

use anyhow::Result;

use checkride_core::result::ExamResult;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = ExamResult::load_json(&baseline_path)?;
    let current = ExamResult::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Progress: {} regressed, {} improved, {} unchanged",
                report.regressed.len(),
                report.improved.len(),
                report.unchanged
            );

            if !report.regressed.is_empty() {
                println!("\nRegressed areas:");
                for d in &report.regressed {
                    println!(
                        "  Area {} {:.0}% -> {:.0}% ({:+.0}%)",
                        d.area,
                        d.baseline_score * 100.0,
                        d.current_score * 100.0,
                        d.delta * 100.0
                    );
                }
            }

            if !report.improved.is_empty() {
                println!("\nImproved areas:");
                for d in &report.improved {
                    println!(
                        "  Area {} {:.0}% -> {:.0}% (+{:.0}%)",
                        d.area,
                        d.baseline_score * 100.0,
                        d.current_score * 100.0,
                        d.delta * 100.0
                    );
                }
            }

            if report.new_areas > 0 {
                println!("\n{} new area(s)", report.new_areas);
            }
            if report.removed_areas > 0 {
                println!("{} removed area(s)", report.removed_areas);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
