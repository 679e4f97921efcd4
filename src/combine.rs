//! Merge per-section exports into one complete test document.
//!
//! Questions are concatenated in input order and reindexed to a
//! contiguous zero-based key sequence; transcripts are concatenated with
//! section labels. A missing or unparsable section is reported and
//! skipped, never fatal to the whole run.

use crate::php::{decode, serialize, PhpValue};
use crate::wxr::{extract, QuizDocument};
use crate::{Colorize, Result};
use std::path::{Path, PathBuf};

/// The four section files the original pipeline combines
pub const SECTION_FILES: [&str; 4] = [
    "Listening Test 6 Section 1.xml",
    "Listening Test 6 Section 2.xml",
    "Listening Test 6 Section 3.xml",
    "Listening Test 6 Section 4.xml",
];

pub const OUTPUT_FILE: &str = "Listening-Test-6-Complete-FIXED.xml";

pub const OUTPUT_TITLE: &str = "Listening Test 6 - Complete (All 40 Questions)";

#[derive(Debug)]
pub struct CombineResult {
    pub output_path: PathBuf,
    pub question_elements: usize,
    pub sections_used: usize,
    pub skipped: Vec<String>,
}

/// Extract the decoded questions array from one section document
fn section_questions(content: &str) -> Result<Option<Vec<PhpValue>>> {
    let Some(pair) = extract::find_meta(content, extract::QUESTIONS_KEY)? else {
        return Ok(None);
    };
    match decode(pair.value.as_bytes()) {
        Ok(PhpValue::Array(entries)) => {
            // array_values: keep order, drop the original keys
            Ok(Some(entries.into_iter().map(|(_, v)| v).collect()))
        }
        _ => Ok(None),
    }
}

/// Combine the section files found under `dir` into one document.
///
/// The combined payload is freshly serialized, so every length prefix is
/// regenerated even when a section was repaired along the way.
pub fn combine(dir: &Path) -> Result<CombineResult> {
    let mut all_questions: Vec<PhpValue> = Vec::new();
    let mut transcripts: Vec<String> = Vec::new();
    let mut sections_used = 0;
    let mut skipped = Vec::new();

    println!("{}", "Combining sections...".cyan());

    for (i, name) in SECTION_FILES.iter().enumerate() {
        let section_number = i + 1;
        let path = dir.join(name);
        print!("Processing Section {}... ", section_number);

        if !path.exists() {
            println!("{}", "NOT FOUND".yellow());
            skipped.push(format!("{}: not found", name));
            continue;
        }

        let content = std::fs::read_to_string(&path)?;
        match section_questions(&content)? {
            Some(questions) if !questions.is_empty() => {
                println!("{} questions", questions.len());
                all_questions.extend(questions);
                sections_used += 1;
            }
            _ => {
                println!("{}", "NO QUESTIONS".yellow());
                skipped.push(format!("{}: no decodable questions", name));
            }
        }

        if let Some(pair) = extract::find_meta(&content, extract::TRANSCRIPT_KEY)? {
            transcripts.push(format!(
                "<strong>SECTION {}</strong>\n{}",
                section_number, pair.value
            ));
        }
    }

    // Reindex from 0
    let question_elements = all_questions.len();
    let payload = serialize(&PhpValue::list(all_questions));
    let payload = String::from_utf8_lossy(&payload).into_owned();

    println!("\nTotal questions: {}", question_elements);

    let doc = QuizDocument {
        title: OUTPUT_TITLE.to_string(),
        questions_payload: payload,
        transcript: if transcripts.is_empty() {
            None
        } else {
            Some(transcripts.join("\n\n<hr />\n\n"))
        },
        ..Default::default()
    };

    let output_path = dir.join(OUTPUT_FILE);
    std::fs::write(&output_path, doc.to_xml())?;

    Ok(CombineResult {
        output_path,
        question_elements,
        sections_used,
        skipped,
    })
}
