//! checkride-core — Adaptive coverage planning and grading for simulated
//! oral examinations.
//!
//! This crate defines the syllabus data model, the per-session coverage
//! plan, the next-question queue builder, and the grading engine that turns
//! accumulated attempts into an auditable pass/fail result. Everything here
//! is a pure, synchronous computation over plain data: answer assessment,
//! persistence, and transport all live with external collaborators.

pub mod attempt;
pub mod error;
pub mod grading;
pub mod history;
pub mod parser;
pub mod plan;
pub mod queue;
pub mod result;
pub mod syllabus;
