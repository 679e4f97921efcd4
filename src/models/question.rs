//! Question-record view over decoded payloads.
//!
//! Questions are heterogeneous PHP arrays; field names vary between the
//! current closed/open types and the legacy quiz types, so access goes
//! through alternative-key lookups rather than a fixed struct.

use crate::php::PhpValue;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Closed and open questions declare how many sequential display numbers
/// they occupy; legacy records fall back to text heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionType {
    Closed,
    Open,
    Legacy(String),
    Unknown,
}

/// Borrowed view over one question element of a payload array
pub struct Question<'a> {
    value: &'a PhpValue,
}

impl<'a> Question<'a> {
    /// Wrap an array-typed payload element; non-arrays are not questions
    pub fn from_value(value: &'a PhpValue) -> Option<Self> {
        value.as_array().map(|_| Question { value })
    }

    pub fn type_name(&self) -> Option<&str> {
        self.value
            .get_any(&["type", "question_type"])
            .and_then(|v| v.as_str())
    }

    pub fn question_type(&self) -> QuestionType {
        match self.type_name() {
            Some("closed_question") => QuestionType::Closed,
            Some("open_question") => QuestionType::Open,
            Some(other) => QuestionType::Legacy(other.to_string()),
            None => QuestionType::Unknown,
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        self.value
            .get_any(&["question", "question_title"])
            .and_then(|v| v.as_str())
    }

    pub fn has_feedback(&self, field: &str, alternate: &str) -> bool {
        self.value.get_any(&[field, alternate]).is_some()
    }

    /// How many sequential display numbers this question occupies.
    ///
    /// Closed questions cover `correct_answer_count` numbers and open
    /// questions `field_count`. Legacy records carry neither, so "Choose
    /// TWO/THREE" prompt text decides, defaulting to one.
    pub fn numbers_covered(&self) -> usize {
        match self.question_type() {
            QuestionType::Closed => self
                .value
                .get("correct_answer_count")
                .and_then(|v| v.as_int())
                .map(|n| n.max(1) as usize)
                .unwrap_or_else(|| self.numbers_from_prompt()),
            QuestionType::Open => self
                .value
                .get("field_count")
                .and_then(|v| v.as_int())
                .map(|n| n.max(1) as usize)
                .unwrap_or(1),
            _ => self.numbers_from_prompt(),
        }
    }

    fn numbers_from_prompt(&self) -> usize {
        static CHOOSE: OnceLock<Regex> = OnceLock::new();
        let Some(text) = self.prompt() else { return 1 };
        let re = CHOOSE.get_or_init(|| Regex::new(r"(?i)choose\s+(two|three|2|3)").unwrap());
        match re.captures(text) {
            Some(cap) => match cap[1].to_lowercase().as_str() {
                "two" | "2" => 2,
                _ => 3,
            },
            None => 1,
        }
    }
}

/// Structural statistics for a decoded questions payload
#[derive(Debug, Default)]
pub struct PayloadStats {
    /// Number of payload array elements
    pub elements: usize,
    /// Total display numbers covered across all questions
    pub numbers_covered: usize,
    /// Element count per type discriminant
    pub type_tally: BTreeMap<String, usize>,
    /// Soft findings: missing discriminants, prompts, feedback fields
    pub warnings: Vec<String>,
    /// Hard findings: elements that are not question arrays at all
    pub issues: Vec<String>,
}

/// Analyze a decoded questions payload.
///
/// Missing fields are warnings, never hard failures; an element that is
/// not an array at all is a hard issue.
pub fn analyze(payload: &PhpValue) -> PayloadStats {
    let mut stats = PayloadStats::default();

    let Some(entries) = payload.as_array() else {
        stats
            .warnings
            .push("Questions data is not an array".to_string());
        return stats;
    };

    stats.elements = entries.len();

    for (idx, (_, element)) in entries.iter().enumerate() {
        let Some(question) = Question::from_value(element) else {
            stats
                .issues
                .push(format!("Question at index {} is not an array", idx));
            continue;
        };

        if question.type_name().is_none() {
            stats.warnings.push(format!(
                "Question {} missing 'type' or 'question_type' field",
                idx
            ));
        }
        if question.prompt().is_none() {
            stats.warnings.push(format!(
                "Question {} missing 'question' or 'question_title' field",
                idx
            ));
        }

        let type_name = question.type_name().unwrap_or("unknown").to_string();
        *stats.type_tally.entry(type_name).or_insert(0) += 1;
        stats.numbers_covered += question.numbers_covered();
    }

    stats
}
