//! The `checkride queue` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use checkride_core::history::PerformanceHistory;
use checkride_core::plan::StudyMode;
use checkride_core::queue::build_queue;

use super::load_session;

pub fn execute(
    session_path: PathBuf,
    syllabus_path: PathBuf,
    mode_str: Option<String>,
    history_path: Option<PathBuf>,
    limit: usize,
) -> Result<()> {
    let mut session = load_session(&session_path)?;
    let syllabus = checkride_core::parser::parse_syllabus(&syllabus_path)?;

    if let Some(mode) = mode_str {
        session.plan.mode = mode.parse::<StudyMode>()?;
    }

    // Cross-session history file if provided, otherwise what this session
    // has already seen.
    let history = match history_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read history from {}", path.display()))?;
            serde_json::from_str::<PerformanceHistory>(&content)
                .context("failed to parse history JSON")?
        }
        None => PerformanceHistory::from_attempts(&session.attempts),
    };

    let queue = build_queue(&session.plan, &syllabus.elements, &history);

    if queue.is_empty() {
        println!(
            "Nothing to ask: the plan is exhausted ({} of {} asked).",
            session.plan.asked_count,
            session.plan.len()
        );
        return Ok(());
    }

    println!(
        "Next questions ({} mode, {} pending):",
        session.plan.mode,
        queue.len()
    );

    let mut table = Table::new();
    table.set_header(vec!["#", "Element", "Type", "Description"]);

    for (i, code) in queue.iter().take(limit).enumerate() {
        let description = syllabus
            .element(code)
            .map(|e| e.description.as_str())
            .unwrap_or("");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(code),
            Cell::new(code.element_type()),
            Cell::new(description),
        ]);
    }

    println!("{table}");

    if queue.len() > limit {
        println!("... and {} more", queue.len() - limit);
    }

    Ok(())
}
