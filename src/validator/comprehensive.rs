//! The deep, eight-check validator run before any import and after
//! every combine.

use crate::models::{analyze, Question, Report};
use crate::php::{decode, PhpValue};
use crate::wxr::extract;
use crate::{Colorize, Context, Result};
use regex::Regex;

const QUESTIONS_KEYS: [&str; 2] = [extract::QUESTIONS_KEY, "questions"];
const STARTING_NUMBER_KEYS: [&str; 2] = [extract::STARTING_NUMBER_KEY, "starting_question_number"];
const TRANSCRIPT_KEYS: [&str; 2] = [extract::TRANSCRIPT_KEY, "transcript_content"];

const FEEDBACK_FIELDS: [(&str, &str); 3] = [
    ("correct_feedback", "correct_answer_feedback"),
    ("incorrect_feedback", "incorrect_answer_feedback"),
    ("no_answer_feedback", "no_answer_feedback"),
];

/// Expected question count inferred from the item title.
///
/// Deliberately fragile heuristics kept as-is from the legacy tooling:
/// "40 Questions", "All 40", "Complete ... Test N" (a full test is 40),
/// "Section N" (a single section is 10).
pub fn expected_count_from_title(title: &str) -> Result<Option<usize>> {
    let n_questions =
        Regex::new(r"(?i)\b(\d+)\s+questions?\b").context("Failed to compile title regex")?;
    let all_n = Regex::new(r"(?i)\ball\s+(\d+)\b").context("Failed to compile title regex")?;
    let complete = Regex::new(r"(?i)complete").context("Failed to compile title regex")?;
    let test_n = Regex::new(r"(?i)test\s+\d+").context("Failed to compile title regex")?;
    let section_n = Regex::new(r"(?i)section\s+\d+").context("Failed to compile title regex")?;

    if let Some(cap) = n_questions.captures(title) {
        return Ok(cap[1].parse().ok());
    }
    if let Some(cap) = all_n.captures(title) {
        return Ok(cap[1].parse().ok());
    }
    if complete.is_match(title) && test_n.is_match(title) {
        return Ok(Some(40));
    }
    if section_n.is_match(title) {
        return Ok(Some(10));
    }
    Ok(None)
}

fn find_first_meta(content: &str, keys: &[&str]) -> Result<Option<extract::MetaPair>> {
    for key in keys {
        if let Some(pair) = extract::find_meta(content, key)? {
            return Ok(Some(pair));
        }
    }
    Ok(None)
}

/// Run the eight ordered checks over a document
pub fn validate(content: &str) -> Result<Report> {
    let mut report = Report::new();

    // Check 1: CDATA formatting
    println!("[1/8] Checking CDATA formatting...");
    if extract::has_cdata_whitespace(content)? {
        report.issue("Spaces found in CDATA sections (e.g., <![CDATA[ content ]])");
        println!("  {} Spaces in CDATA sections", "❌ FAIL:".red());
    } else {
        println!("  {} CDATA formatting correct", "✓ PASS:".green());
    }

    // Check 2: post type
    println!("\n[2/8] Checking post type...");
    match extract::post_type(content)? {
        Some(post_type) if post_type == "ielts_quiz" || post_type == "listening_practice" => {
            println!("  {} Post type is '{}'", "✓ PASS:".green(), post_type);
            report.note("Post type", &post_type);
        }
        Some(post_type) => {
            report.warn(format!("Unexpected post type: {}", post_type));
            println!("  {} Post type is '{}'", "⚠ WARNING:".yellow(), post_type);
        }
        None => {
            report.issue("No post_type found");
            println!("  {} No post_type found", "❌ FAIL:".red());
        }
    }

    // Check 3: required fields
    println!("\n[3/8] Checking required postmeta fields...");
    let questions_pair = find_first_meta(content, &QUESTIONS_KEYS)?;
    match &questions_pair {
        Some(pair) => println!("  {} {}", "✓ Found:".green(), pair.key),
        None => {
            report.issue("Missing required field: questions or _ielts_cm_questions");
            println!("  {} No questions field found", "❌ FAIL:".red());
        }
    }

    // Check 4: payload decodability
    println!("\n[4/8] Validating PHP serialized data...");
    let mut decoded_questions: Option<PhpValue> = None;
    if let Some(pair) = &questions_pair {
        match decode(pair.value.as_bytes()) {
            Ok(value) => {
                println!("  {} Questions data is valid serialized PHP", "✓ PASS:".green());
                decoded_questions = Some(value);
            }
            Err(_) => {
                report.issue(format!("Invalid serialized data in {}", pair.key));
                println!("  {} Cannot unserialize questions data", "❌ FAIL:".red());
                let preview: String = pair.value.chars().take(100).collect();
                println!("      First 100 chars: {}...", preview);
            }
        }
    } else {
        println!("  {} No questions data found to validate", "⚠ WARNING:".yellow());
    }

    let stats = decoded_questions.as_ref().map(analyze);

    if let (Some(value), Some(stats)) = (&decoded_questions, &stats) {
        if value.as_array().is_some() {
            report.note("Question count", stats.elements);
            println!("      Question elements found: {}", stats.elements);

            // Check 5: question-count consistency with the title
            println!("\n[5/8] Analyzing question structure...");
            println!("      Question elements: {}", stats.elements);
            println!("      Question numbers covered: {}", stats.numbers_covered);

            match extract::title(content)? {
                Some(title) => match expected_count_from_title(&title)? {
                    Some(expected) => {
                        println!("      Expected questions (from title): {}", expected);
                        if stats.numbers_covered != expected {
                            report.issue(format!(
                                "Question count mismatch: covers {} question numbers, expected {}",
                                stats.numbers_covered, expected
                            ));
                            println!(
                                "      {} Question numbers don't match expected",
                                "❌ FAIL:".red()
                            );
                        } else {
                            println!(
                                "      {} Question numbers match expected ({})",
                                "✓ PASS:".green(),
                                expected
                            );
                        }
                    }
                    None => println!(
                        "      ℹ INFO: Could not determine expected question count from title"
                    ),
                },
                None => {
                    println!("      ℹ INFO: No title found");
                }
            }

            // Check 6: per-question structure
            println!("\n[6/8] Validating question structure...");
            for issue in &stats.issues {
                report.issue(issue.clone());
                println!("      {} {}", "❌".red(), issue);
            }
            for warning in &stats.warnings {
                report.warn(warning.clone());
            }

            let mut feedback_warnings = 0;
            let entries = value.as_array().unwrap_or(&[]);
            for (idx, (_, element)) in entries.iter().enumerate() {
                if let Some(question) = Question::from_value(element) {
                    for (field, alternate) in FEEDBACK_FIELDS {
                        if !question.has_feedback(field, alternate) {
                            report.warn(format!("Question {} missing feedback field: {}", idx, field));
                            feedback_warnings += 1;
                        }
                    }
                }
            }

            if stats.issues.is_empty() && stats.warnings.is_empty() && feedback_warnings == 0 {
                println!("      {} All questions have required fields", "✓ PASS:".green());
            } else {
                println!("      {} Some questions missing fields", "⚠ WARNING:".yellow());
            }

            println!("      Question types distribution:");
            for (type_name, count) in &stats.type_tally {
                println!("        - {}: {}", type_name, count);
            }

            let mut numbering_info = Vec::new();
            for (idx, (_, element)) in entries.iter().enumerate() {
                let Some(question) = Question::from_value(element) else {
                    continue;
                };
                match question.type_name() {
                    Some("closed_question") => {
                        if let Some(n) = element.get("correct_answer_count").and_then(|v| v.as_int()) {
                            numbering_info
                                .push(format!("Question {} (closed): covers {} question number(s)", idx, n));
                        }
                    }
                    Some("open_question") => {
                        if let Some(n) = element.get("field_count").and_then(|v| v.as_int()) {
                            numbering_info
                                .push(format!("Question {} (open): covers {} question number(s)", idx, n));
                        }
                    }
                    _ => {}
                }
            }
            if !numbering_info.is_empty() {
                println!("      Special question numbering:");
                for line in &numbering_info {
                    println!("        - {}", line);
                }
            }
        } else {
            report.warn("Questions data is not an array");
            println!("      {} Questions data is not an array", "⚠ WARNING:".yellow());
        }
    }

    // Check 7: starting question number
    println!("\n[7/8] Checking starting question number...");
    match find_first_meta(content, &STARTING_NUMBER_KEYS)? {
        Some(pair) => match decode(pair.value.as_bytes()) {
            Ok(PhpValue::Int(start)) => {
                println!("  {} Starting question number is {}", "✓ Found:".green(), start);
                report.note("Starting number", start);
                if let Some(stats) = &stats {
                    if stats.elements > 0 {
                        let end = start + stats.elements as i64 - 1;
                        println!("      Question range: Q{} - Q{}", start, end);
                    }
                }
            }
            _ => {
                report.warn(format!("Starting question number in {} is not a serialized integer", pair.key));
                println!(
                    "  {} Could not read starting question number",
                    "⚠ WARNING:".yellow()
                );
            }
        },
        None => {
            println!("  ℹ INFO: No starting_question_number found (will default to 1)");
        }
    }

    // Check 8: transcript presence
    println!("\n[8/8] Checking for transcript...");
    if find_first_meta(content, &TRANSCRIPT_KEYS)?.is_some() {
        println!("  {} Transcript included", "✓ Found:".green());
    } else {
        report.warn("No transcript found");
        println!("  {} No transcript found", "⚠ WARNING:".yellow());
    }

    Ok(report)
}
