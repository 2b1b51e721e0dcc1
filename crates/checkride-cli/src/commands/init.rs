//! The `checkride init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create starter syllabus
    std::fs::create_dir_all("syllabi")?;
    let syllabus_path = std::path::Path::new("syllabi/pa-oral.toml");
    if syllabus_path.exists() {
        println!("syllabi/pa-oral.toml already exists, skipping.");
    } else {
        std::fs::write(syllabus_path, STARTER_SYLLABUS)?;
        println!("Created syllabi/pa-oral.toml");
    }

    // Create sample session
    let session_path = std::path::Path::new("session.json");
    if session_path.exists() {
        println!("session.json already exists, skipping.");
    } else {
        std::fs::write(session_path, SAMPLE_SESSION)?;
        println!("Created session.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: checkride validate --syllabus syllabi/pa-oral.toml");
    println!("  2. Run: checkride queue --session session.json --syllabus syllabi/pa-oral.toml");
    println!("  3. Run: checkride grade --session session.json");

    Ok(())
}

const STARTER_SYLLABUS: &str = r#"[syllabus]
id = "pa-oral-starter"
name = "Private Pilot Airplane Oral (starter subset)"
description = "A small subset of the private pilot ACS for trying out checkride"
rating = "private"

[[elements]]
code = "PA.I.A.K1"
description = "Certification requirements, recency of experience, and recordkeeping"
difficulty = "basic"

[[elements]]
code = "PA.I.A.K2"
description = "Privileges and limitations of the private pilot certificate"
difficulty = "basic"

[[elements]]
code = "PA.I.B.K1"
description = "Required aircraft certificates and documents"
difficulty = "basic"

[[elements]]
code = "PA.I.B.R1"
type = "risk"
description = "Flying an aircraft with inoperative equipment"

[[elements]]
code = "PA.II.A.K1"
description = "Acceptable weather products for preflight planning"

[[elements]]
code = "PA.II.A.K2"
description = "Meteorology applicable to the departure, en route, and arrival phases"
difficulty = "advanced"

[[elements]]
code = "PA.II.B.R1"
type = "risk"
description = "Continuing flight into deteriorating weather"

[[elements]]
code = "PA.VII.A.K1"
description = "Immediate action items and emergency procedures"
"#;

const SAMPLE_SESSION: &str = r#"{
  "plan": {
    "schema_version": 1,
    "id": "3f1c9a52-7d42-4e8b-9a61-2e5f8c0b4d17",
    "mode": "linear",
    "config": {
      "planned_question_count": 8,
      "bonus_question_max": 2,
      "follow_up_max_per_element": 2
    },
    "asked_count": 3,
    "bonus_used": 0,
    "coverage": {
      "PA.I.A.K1": "asked",
      "PA.I.A.K2": "asked",
      "PA.I.B.K1": "asked",
      "PA.I.B.R1": "pending",
      "PA.II.A.K1": "pending",
      "PA.II.A.K2": "pending",
      "PA.II.B.R1": "credited_by_mention",
      "PA.VII.A.K1": "pending"
    },
    "attempts_per_element": {
      "PA.I.A.K1": 1,
      "PA.I.A.K2": 1,
      "PA.I.B.K1": 1
    }
  },
  "attempts": [
    { "element_code": "PA.I.A.K1", "score": "satisfactory" },
    { "element_code": "PA.I.A.K2", "score": "partial" },
    { "element_code": "PA.I.B.K1", "score": "unsatisfactory" }
  ],
  "trigger": "user_ended",
  "rating": "private"
}
"#;
