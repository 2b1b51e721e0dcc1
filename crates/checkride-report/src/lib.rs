//! checkride-report — debrief rendering for exam results.
//!
//! Turns an immutable `ExamResult` into human-facing artifacts: a Markdown
//! debrief for terminals and chat, and a self-contained HTML page.

pub mod html;
pub mod markdown;
