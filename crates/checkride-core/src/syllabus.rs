//! Syllabus data model: element codes, areas, and the element catalog.
//!
//! An element code like `PA.I.A.K1` is parsed into its parts exactly once,
//! at ingestion. Call sites work with the parsed value and never re-split
//! the string.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SyllabusError;

/// Roman numerals for areas I through XII, in order.
const ROMAN_AREAS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// A top-level syllabus area, identified by a Roman numeral.
///
/// Numerals I through XII order numerically. Anything else keeps its raw
/// label and sorts after every recognized area, so a malformed code is
/// reported rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AreaId {
    Numbered(u8),
    Unrecognized(String),
}

impl AreaId {
    /// Parse an area segment. Never fails: unrecognized labels are kept.
    pub fn parse(segment: &str) -> Self {
        match ROMAN_AREAS.iter().position(|r| *r == segment) {
            Some(idx) => AreaId::Numbered(idx as u8 + 1),
            None => AreaId::Unrecognized(segment.to_string()),
        }
    }

    /// The ordinal for recognized areas (I = 1), or `None`.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            AreaId::Numbered(n) => Some(*n),
            AreaId::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaId::Numbered(n) => write!(f, "{}", ROMAN_AREAS[(*n - 1) as usize]),
            AreaId::Unrecognized(label) => write!(f, "{label}"),
        }
    }
}

impl From<&str> for AreaId {
    fn from(segment: &str) -> Self {
        AreaId::parse(segment)
    }
}

impl Ord for AreaId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AreaId::Numbered(a), AreaId::Numbered(b)) => a.cmp(b),
            (AreaId::Numbered(_), AreaId::Unrecognized(_)) => Ordering::Less,
            (AreaId::Unrecognized(_), AreaId::Numbered(_)) => Ordering::Greater,
            (AreaId::Unrecognized(a), AreaId::Unrecognized(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for AreaId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for AreaId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AreaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AreaId::parse(&s))
    }
}

/// The kind of certification element a code points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Knowledge,
    Risk,
    Skill,
}

impl ElementType {
    /// The single-letter tag used in element codes (K/R/S).
    pub fn letter(&self) -> char {
        match self {
            ElementType::Knowledge => 'K',
            ElementType::Risk => 'R',
            ElementType::Skill => 'S',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'K' => Some(ElementType::Knowledge),
            'R' => Some(ElementType::Risk),
            'S' => Some(ElementType::Skill),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Knowledge => write!(f, "knowledge"),
            ElementType::Risk => write!(f, "risk"),
            ElementType::Skill => write!(f, "skill"),
        }
    }
}

impl FromStr for ElementType {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "knowledge" => Ok(ElementType::Knowledge),
            "risk" => Ok(ElementType::Risk),
            "skill" => Ok(ElementType::Skill),
            other => Err(SyllabusError::UnknownElementType(other.to_string())),
        }
    }
}

/// Default difficulty attached to a syllabus element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Basic => write!(f, "basic"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Difficulty::Basic),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(SyllabusError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// A certification rating, used to select the critical-area list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Private,
    Commercial,
    Instrument,
    Atp,
}

impl Rating {
    /// Areas where any unsatisfactory element fails the session outright,
    /// regardless of the aggregate area score.
    pub fn critical_areas(&self) -> Vec<AreaId> {
        let ordinals: &[u8] = match self {
            Rating::Private => &[1],
            Rating::Commercial => &[1, 2],
            Rating::Instrument => &[1, 6],
            Rating::Atp => &[1, 2, 6],
        };
        ordinals.iter().map(|&n| AreaId::Numbered(n)).collect()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Private => write!(f, "private"),
            Rating::Commercial => write!(f, "commercial"),
            Rating::Instrument => write!(f, "instrument"),
            Rating::Atp => write!(f, "atp"),
        }
    }
}

impl FromStr for Rating {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Rating::Private),
            "commercial" => Ok(Rating::Commercial),
            "instrument" => Ok(Rating::Instrument),
            "atp" => Ok(Rating::Atp),
            other => Err(SyllabusError::UnknownRating(other.to_string())),
        }
    }
}

/// A parsed element code such as `PA.I.A.K1`.
///
/// Four dot-separated segments: certification standard, area (Roman
/// numeral), task letter, and the element tag (type letter + index).
/// The area segment is not validated — an unrecognized numeral still
/// parses and sorts after the recognized areas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementCode {
    raw: String,
    standard: String,
    area: AreaId,
    task: String,
    element_type: ElementType,
    index: u32,
}

impl ElementCode {
    /// The canonical dotted form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The certification standard prefix (e.g. `PA`).
    pub fn standard(&self) -> &str {
        &self.standard
    }

    /// The area parsed from the second segment.
    pub fn area(&self) -> &AreaId {
        &self.area
    }

    /// The task letter (third segment).
    pub fn task(&self) -> &str {
        &self.task
    }

    /// The element type parsed from the tag letter.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The element index within its task (the `1` in `K1`).
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The enclosing task id (e.g. `PA.I.A`).
    pub fn task_id(&self) -> String {
        format!("{}.{}.{}", self.standard, self.area, self.task)
    }
}

impl fmt::Display for ElementCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for ElementCode {
    type Err = SyllabusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() != 4 {
            return Err(SyllabusError::malformed(
                s,
                format!("expected 4 dot-separated segments, found {}", segments.len()),
            ));
        }
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(SyllabusError::malformed(s, "empty segment"));
        }

        let tag = segments[3];
        let type_letter = tag.chars().next().unwrap_or(' ');
        let element_type = ElementType::from_letter(type_letter).ok_or_else(|| {
            SyllabusError::malformed(s, format!("element tag must start with K, R, or S, found '{tag}'"))
        })?;
        let index: u32 = tag[1..].parse().map_err(|_| {
            SyllabusError::malformed(s, format!("element tag '{tag}' has no numeric index"))
        })?;

        Ok(ElementCode {
            raw: s.to_string(),
            standard: segments[0].to_string(),
            area: AreaId::parse(segments[1]),
            task: segments[2].to_string(),
            element_type,
            index,
        })
    }
}

impl Ord for ElementCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.area
            .cmp(&other.area)
            .then_with(|| self.task.cmp(&other.task))
            .then_with(|| self.element_type.cmp(&other.element_type))
            .then_with(|| self.index.cmp(&other.index))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for ElementCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for ElementCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ElementCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: SyllabusError| D::Error::custom(e.to_string()))
    }
}

/// One knowledge/risk/skill point in the certification syllabus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyllabusElement {
    /// The parsed element code.
    pub code: ElementCode,
    /// The enclosing task id (e.g. `PA.I.A`).
    pub task_id: String,
    /// Element type (matches the code's tag letter).
    pub element_type: ElementType,
    /// Default difficulty for question generation.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Free-text description of the element.
    pub description: String,
    /// Relative weight within the syllabus.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// An ordered element catalog. Definition order is the authority for
/// `linear` question ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Syllabus {
    /// Unique identifier for this syllabus.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this syllabus.
    #[serde(default)]
    pub description: String,
    /// The rating this syllabus prepares for.
    #[serde(default)]
    pub rating: Option<Rating>,
    /// The elements, in definition order.
    #[serde(default)]
    pub elements: Vec<SyllabusElement>,
}

impl Syllabus {
    /// Look up an element by code.
    pub fn element(&self, code: &ElementCode) -> Option<&SyllabusElement> {
        self.elements.iter().find(|e| &e.code == code)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_element_code() {
        let code: ElementCode = "PA.I.A.K1".parse().unwrap();
        assert_eq!(code.standard(), "PA");
        assert_eq!(code.area(), &AreaId::Numbered(1));
        assert_eq!(code.task(), "A");
        assert_eq!(code.element_type(), ElementType::Knowledge);
        assert_eq!(code.index(), 1);
        assert_eq!(code.task_id(), "PA.I.A");
        assert_eq!(code.to_string(), "PA.I.A.K1");
    }

    #[test]
    fn parse_risk_and_skill_tags() {
        let risk: ElementCode = "PA.II.B.R3".parse().unwrap();
        assert_eq!(risk.element_type(), ElementType::Risk);
        assert_eq!(risk.index(), 3);

        let skill: ElementCode = "PA.IV.A.S12".parse().unwrap();
        assert_eq!(skill.element_type(), ElementType::Skill);
        assert_eq!(skill.index(), 12);
    }

    #[test]
    fn malformed_codes_rejected() {
        assert!("PA.I.A".parse::<ElementCode>().is_err());
        assert!("PA.I.A.K1.X".parse::<ElementCode>().is_err());
        assert!("PA.I.A.Q1".parse::<ElementCode>().is_err());
        assert!("PA.I.A.K".parse::<ElementCode>().is_err());
        assert!("PA..A.K1".parse::<ElementCode>().is_err());
    }

    #[test]
    fn unrecognized_area_parses_and_sorts_last() {
        let code: ElementCode = "PA.ZZ.A.K1".parse().unwrap();
        assert_eq!(code.area(), &AreaId::Unrecognized("ZZ".into()));
        assert!(AreaId::Numbered(12) < AreaId::Unrecognized("ZZ".into()));
    }

    #[test]
    fn area_ordering_is_numeric_not_lexical() {
        // Lexically "IX" < "V"; numerically IX (9) comes after V (5).
        assert!(AreaId::parse("V") < AreaId::parse("IX"));
        assert!(AreaId::parse("II") < AreaId::parse("III"));
        assert!(AreaId::parse("X") < AreaId::parse("XII"));
    }

    #[test]
    fn element_code_ordering_groups_by_area_then_task() {
        let mut codes: Vec<ElementCode> = ["PA.II.A.K1", "PA.I.B.K2", "PA.I.A.K2", "PA.I.A.K1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        codes.sort();
        let sorted: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(sorted, vec!["PA.I.A.K1", "PA.I.A.K2", "PA.I.B.K2", "PA.II.A.K1"]);
    }

    #[test]
    fn element_code_serde_uses_dotted_string() {
        let code: ElementCode = "PA.I.A.K1".parse().unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"PA.I.A.K1\"");
        let back: ElementCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }

    #[test]
    fn rating_parse_and_critical_areas() {
        assert_eq!("private".parse::<Rating>().unwrap(), Rating::Private);
        assert_eq!("ATP".parse::<Rating>().unwrap(), Rating::Atp);
        assert!("sport".parse::<Rating>().is_err());
        assert_eq!(Rating::Private.critical_areas(), vec![AreaId::Numbered(1)]);
    }

    #[test]
    fn element_type_display_and_parse() {
        assert_eq!(ElementType::Knowledge.to_string(), "knowledge");
        assert_eq!("risk".parse::<ElementType>().unwrap(), ElementType::Risk);
        assert!("judgement".parse::<ElementType>().is_err());
    }
}
