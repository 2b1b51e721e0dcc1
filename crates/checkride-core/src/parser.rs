//! TOML syllabus parser.
//!
//! Loads syllabus files and directories, and validates them for the common
//! authoring mistakes: duplicate codes, descriptions that were never
//! filled in, and metadata that disagrees with the element code.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::syllabus::{Difficulty, ElementCode, ElementType, Rating, Syllabus, SyllabusElement};

/// Intermediate TOML structure for parsing syllabus files.
#[derive(Debug, Deserialize)]
struct TomlSyllabusFile {
    syllabus: TomlSyllabusHeader,
    #[serde(default)]
    elements: Vec<TomlElement>,
}

#[derive(Debug, Deserialize)]
struct TomlSyllabusHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlElement {
    code: String,
    #[serde(default)]
    task_id: Option<String>,
    #[serde(rename = "type", default)]
    element_type: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    weight: Option<f64>,
}

/// Parse a single TOML file into a `Syllabus`.
pub fn parse_syllabus(path: &Path) -> Result<Syllabus> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read syllabus file: {}", path.display()))?;

    parse_syllabus_str(&content, path)
}

/// Parse a TOML string into a `Syllabus` (useful for testing).
pub fn parse_syllabus_str(content: &str, source_path: &Path) -> Result<Syllabus> {
    let parsed: TomlSyllabusFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let rating = parsed
        .syllabus
        .rating
        .map(|r| r.parse::<Rating>())
        .transpose()
        .with_context(|| format!("invalid rating in {}", source_path.display()))?;

    let elements = parsed
        .elements
        .into_iter()
        .map(|e| {
            let code: ElementCode = e
                .code
                .parse()
                .with_context(|| format!("invalid element code in {}", source_path.display()))?;

            // The code's tag letter is the authority when no type is given.
            let element_type = match e.element_type {
                Some(t) => t.parse::<ElementType>()?,
                None => code.element_type(),
            };
            let difficulty = match e.difficulty {
                Some(d) => d.parse::<Difficulty>()?,
                None => Difficulty::default(),
            };
            let task_id = e.task_id.unwrap_or_else(|| code.task_id());

            Ok(SyllabusElement {
                code,
                task_id,
                element_type,
                difficulty,
                description: e.description,
                weight: e.weight.unwrap_or(1.0),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Syllabus {
        id: parsed.syllabus.id,
        name: parsed.syllabus.name,
        description: parsed.syllabus.description,
        rating,
        elements,
    })
}

/// Recursively load all `.toml` syllabus files from a directory.
pub fn load_syllabus_directory(dir: &Path) -> Result<Vec<Syllabus>> {
    let mut syllabi = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            syllabi.extend(load_syllabus_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_syllabus(&path) {
                Ok(syllabus) => syllabi.push(syllabus),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(syllabi)
}

/// A warning from syllabus validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The element code (if applicable).
    pub code: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a syllabus for common authoring issues.
pub fn validate_syllabus(syllabus: &Syllabus) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate element codes
    let mut seen_codes = std::collections::HashSet::new();
    for element in &syllabus.elements {
        if !seen_codes.insert(&element.code) {
            warnings.push(ValidationWarning {
                code: Some(element.code.to_string()),
                message: format!("duplicate element code: {}", element.code),
            });
        }
    }

    // task_id that disagrees with the code
    for element in &syllabus.elements {
        if element.task_id != element.code.task_id() {
            warnings.push(ValidationWarning {
                code: Some(element.code.to_string()),
                message: format!(
                    "task_id '{}' does not match the code's task '{}'",
                    element.task_id,
                    element.code.task_id()
                ),
            });
        }
    }

    // Declared type that disagrees with the code's tag letter
    for element in &syllabus.elements {
        if element.element_type != element.code.element_type() {
            warnings.push(ValidationWarning {
                code: Some(element.code.to_string()),
                message: format!(
                    "declared type '{}' does not match the code's '{}' tag",
                    element.element_type,
                    element.code.element_type().letter()
                ),
            });
        }
    }

    // Empty descriptions
    for element in &syllabus.elements {
        if element.description.trim().is_empty() {
            warnings.push(ValidationWarning {
                code: Some(element.code.to_string()),
                message: "description is empty".into(),
            });
        }
    }

    // Non-positive weights
    for element in &syllabus.elements {
        if element.weight <= 0.0 {
            warnings.push(ValidationWarning {
                code: Some(element.code.to_string()),
                message: format!("weight {} is not positive", element.weight),
            });
        }
    }

    if syllabus.elements.is_empty() {
        warnings.push(ValidationWarning {
            code: None,
            message: "syllabus has no elements".into(),
        });
    }

    warnings
}
