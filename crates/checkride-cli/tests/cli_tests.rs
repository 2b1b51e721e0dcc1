//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn checkride() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("checkride").unwrap()
}

/// Run `init` in a fresh directory and hand the directory back.
fn init_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    checkride()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    checkride()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created syllabi/pa-oral.toml"))
        .stdout(predicate::str::contains("Created session.json"));

    assert!(dir.path().join("syllabi/pa-oral.toml").exists());
    assert!(dir.path().join("session.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = init_dir();

    checkride()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_starter_syllabus() {
    let dir = init_dir();

    checkride()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--syllabus")
        .arg("syllabi/pa-oral.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 elements"))
        .stdout(predicate::str::contains("All syllabi valid"));
}

#[test]
fn validate_directory() {
    let dir = init_dir();

    checkride()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--syllabus")
        .arg("syllabi")
        .assert()
        .success()
        .stdout(predicate::str::contains("Private Pilot Airplane Oral"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.toml");
    std::fs::write(
        &path,
        r#"
[syllabus]
id = "dupes"
name = "Dupes"

[[elements]]
code = "PA.I.A.K1"
description = "First"

[[elements]]
code = "PA.I.A.K1"
description = "Second"
"#,
    )
    .unwrap();

    checkride()
        .arg("validate")
        .arg("--syllabus")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate element code"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    checkride()
        .arg("validate")
        .arg("--syllabus")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn queue_lists_pending_elements() {
    let dir = init_dir();

    // The sample session has asked the three area-I knowledge elements and
    // credited PA.II.B.R1; the queue holds only what is still pending.
    checkride()
        .current_dir(dir.path())
        .arg("queue")
        .arg("--session")
        .arg("session.json")
        .arg("--syllabus")
        .arg("syllabi/pa-oral.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next questions"))
        .stdout(predicate::str::contains("PA.I.B.R1"))
        .stdout(predicate::str::contains("PA.VII.A.K1"))
        .stdout(predicate::str::contains("PA.I.A.K1").not())
        .stdout(predicate::str::contains("PA.II.B.R1").not());
}

#[test]
fn queue_mode_override() {
    let dir = init_dir();

    checkride()
        .current_dir(dir.path())
        .arg("queue")
        .arg("--session")
        .arg("session.json")
        .arg("--syllabus")
        .arg("syllabi/pa-oral.toml")
        .arg("--mode")
        .arg("cross_acs")
        .assert()
        .success()
        .stdout(predicate::str::contains("cross_acs mode"));
}

#[test]
fn grade_sample_session() {
    let dir = init_dir();

    // 1 + 0.7 + 0 asked points plus 1 credited over 8 planned: well under
    // the 0.70 bar.
    checkride()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--session")
        .arg("session.json")
        .arg("--output")
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall: fail"))
        .stdout(predicate::str::contains("Study list"));

    let entries: Vec<_> = std::fs::read_dir(dir.path().join("results"))
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn grade_writes_all_formats() {
    let dir = init_dir();

    checkride()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--session")
        .arg("session.json")
        .arg("--output")
        .arg("results")
        .arg("--format")
        .arg("all")
        .assert()
        .success();

    let entries: Vec<_> = std::fs::read_dir(dir.path().join("results"))
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 3);
}

#[test]
fn grade_rejects_bad_threshold() {
    let dir = init_dir();

    checkride()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--session")
        .arg("session.json")
        .arg("--overall-threshold")
        .arg("1.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn compare_results() {
    let dir = TempDir::new().unwrap();

    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");
    std::fs::write(&baseline_path, make_test_result(0.9)).unwrap();
    std::fs::write(&current_path, make_test_result(0.5)).unwrap();

    checkride()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 regressed"));
}

#[test]
fn compare_fail_on_regression() {
    let dir = TempDir::new().unwrap();

    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");
    std::fs::write(&baseline_path, make_test_result(0.9)).unwrap();
    std::fs::write(&current_path, make_test_result(0.5)).unwrap();

    checkride()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .arg("--fail-on-regression")
        .assert()
        .failure();
}

#[test]
fn compare_nonexistent_result() {
    checkride()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn help_output() {
    checkride()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Oral exam coverage planning and grading",
        ));
}

#[test]
fn version_output() {
    checkride()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("checkride"));
}

/// Create a minimal valid result JSON with one area at the given score.
fn make_test_result(area_score: f64) -> String {
    format!(
        r#"{{
    "schema_version": 1,
    "plan_id": "00000000-0000-0000-0000-000000000000",
    "status": "pass",
    "overall_score": {area_score},
    "asked_score": {area_score},
    "counts": {{
        "total_in_plan": 4,
        "asked": 4,
        "satisfactory": 3,
        "partial": 1,
        "unsatisfactory": 0,
        "credited": 0,
        "not_asked": 0,
        "skipped": 0
    }},
    "areas": [{{
        "area": "I",
        "planned": 4,
        "asked": 4,
        "satisfactory": 3,
        "partial": 1,
        "unsatisfactory": 0,
        "credited": 0,
        "score": {area_score},
        "gate": "pass",
        "reason": null
    }}],
    "weak_elements": [],
    "failed_areas": [],
    "completion_trigger": "all_tasks_covered",
    "plan_exhausted": true,
    "graded_at": "2025-01-01T00:00:00Z"
}}"#
    )
}
