//! The `checkride validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(syllabus_path: PathBuf) -> Result<()> {
    let syllabi = if syllabus_path.is_dir() {
        checkride_core::parser::load_syllabus_directory(&syllabus_path)?
    } else {
        vec![checkride_core::parser::parse_syllabus(&syllabus_path)?]
    };

    let mut total_warnings = 0;

    for syllabus in &syllabi {
        println!("Syllabus: {} ({} elements)", syllabus.name, syllabus.len());

        let warnings = checkride_core::parser::validate_syllabus(syllabus);
        for w in &warnings {
            let prefix = w
                .code
                .as_ref()
                .map(|code| format!("  [{code}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All syllabi valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
