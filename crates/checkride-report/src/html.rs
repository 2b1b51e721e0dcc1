//! HTML debrief generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::path::Path;

use anyhow::Result;

use checkride_core::result::{AreaGate, ExamResult, OverallStatus, WeakSeverity};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML debrief from an exam result.
pub fn generate_html(result: &ExamResult) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>checkride debrief</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    let (verdict, verdict_class) = match result.status {
        OverallStatus::Pass => ("PASS", "pass"),
        OverallStatus::Fail => ("FAIL", "fail"),
        OverallStatus::Incomplete => ("INCOMPLETE", "incomplete"),
    };
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>Checkride debrief <span class=\"verdict {verdict_class}\">{verdict}</span></h1>\n"
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Graded {} | session ended: {} | plan exhausted: {}</p>\n",
        result.graded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        result.completion_trigger,
        if result.plan_exhausted { "yes" } else { "no" }
    ));
    html.push_str("</header>\n");

    // Score dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Scores</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Overall (plan-based)</th><th>Asked-only</th><th>Asked</th><th>Credited</th><th>Not asked</th><th>Skipped</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{:.0}%</td><td>{:.0}%</td><td>{}/{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        result.overall_score * 100.0,
        result.asked_score * 100.0,
        result.counts.asked,
        result.counts.total_in_plan,
        result.counts.credited,
        result.counts.not_asked,
        result.counts.skipped,
    ));
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Area table
    if !result.areas.is_empty() {
        html.push_str("<section class=\"areas\">\n");
        html.push_str("<h2>Areas of operation</h2>\n");
        html.push_str("<table class=\"areas-table\">\n");
        html.push_str("<thead><tr><th>Area</th><th>Asked</th><th>Satisfactory</th><th>Partial</th><th>Unsatisfactory</th><th>Credited</th><th>Score</th><th>Gate</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for area in &result.areas {
            let (gate_class, gate_text) = match area.gate {
                AreaGate::Pass => ("pass", "pass"),
                AreaGate::Fail => ("fail", "fail"),
                AreaGate::InsufficientData => ("incomplete", "insufficient data"),
            };
            let reason = area
                .reason
                .as_ref()
                .map(|r| format!(" title=\"{}\"", html_escape(r)))
                .unwrap_or_default();
            html.push_str(&format!(
                "<tr class=\"{}\"{}><td>{}</td><td>{}/{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.0}%</td><td class=\"{}\">{}</td></tr>\n",
                gate_class,
                reason,
                html_escape(&area.area.to_string()),
                area.asked,
                area.planned,
                area.satisfactory,
                area.partial,
                area.unsatisfactory,
                area.credited,
                area.score * 100.0,
                gate_class,
                gate_text,
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    // Study list
    if !result.weak_elements.is_empty() {
        html.push_str("<section class=\"study-list\">\n");
        html.push_str("<h2>Study list</h2>\n");
        html.push_str("<ul>\n");
        for weak in &result.weak_elements {
            let label = match weak.severity {
                WeakSeverity::Unsatisfactory => "unsatisfactory",
                WeakSeverity::Partial => "partial",
                WeakSeverity::NotAsked => "not asked",
            };
            html.push_str(&format!(
                "<li><code>{}</code> <span class=\"severity-{}\">{}</span></li>\n",
                html_escape(weak.code.as_str()),
                label.replace(' ', "-"),
                label
            ));
        }
        html.push_str("</ul>\n");
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(result)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML debrief to a file.
pub fn write_html_debrief(result: &ExamResult, path: &Path) -> Result<()> {
    let html = generate_html(result);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --incomplete: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --incomplete: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.verdict { padding: 0.2rem 0.8rem; border-radius: 8px; font-size: 1.2rem; vertical-align: middle; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.incomplete { background: var(--incomplete); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
ul { line-height: 1.8; }
.severity-unsatisfactory { color: #ef4444; }
.severity-partial { color: #eab308; }
.severity-not-asked { color: #6b7280; }
"#;
