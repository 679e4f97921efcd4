//! Author a sample WXR exercise demonstrating the closed and open
//! question types and their question-number accounting.

use crate::models::Question;
use crate::php::{serialize, PhpKey, PhpValue};
use crate::wxr::QuizDocument;
use crate::{Colorize, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

fn entry(key: &str, value: PhpValue) -> (PhpKey, PhpValue) {
    (PhpKey::str(key), value)
}

fn option(text: &str, is_correct: bool) -> PhpValue {
    PhpValue::Array(vec![
        entry("text", PhpValue::str(text)),
        entry("is_correct", PhpValue::Bool(is_correct)),
    ])
}

/// The sample question set: single-select and multi-select closed
/// questions plus multi-field and single-field open questions
pub fn sample_questions() -> Vec<PhpValue> {
    vec![
        PhpValue::Array(vec![
            entry("type", PhpValue::str("closed_question")),
            entry("instructions", PhpValue::str("Choose the correct answer.")),
            entry("question", PhpValue::str("What is the capital of France?")),
            entry(
                "mc_options",
                PhpValue::list(vec![
                    option("London", false),
                    option("Berlin", false),
                    option("Paris", true),
                    option("Madrid", false),
                ]),
            ),
            entry("correct_answer_count", PhpValue::Int(1)),
            entry("correct_answer", PhpValue::str("2")),
            entry(
                "correct_feedback",
                PhpValue::str("Well done! Paris is the capital of France."),
            ),
            entry(
                "incorrect_feedback",
                PhpValue::str("Not quite. Paris is the capital of France."),
            ),
            entry(
                "no_answer_feedback",
                PhpValue::str("Please select an answer. The correct answer is Paris."),
            ),
            entry("points", PhpValue::Int(1)),
        ]),
        PhpValue::Array(vec![
            entry("type", PhpValue::str("closed_question")),
            entry("instructions", PhpValue::str("Choose TWO letters A-E.")),
            entry(
                "question",
                PhpValue::str("Which TWO of the following are European countries?"),
            ),
            entry(
                "mc_options",
                PhpValue::list(vec![
                    option("Japan", false),
                    option("Germany", true),
                    option("Brazil", false),
                    option("Italy", true),
                    option("Australia", false),
                ]),
            ),
            entry("correct_answer_count", PhpValue::Int(2)),
            // Pipe-separated indices of correct options
            entry("correct_answer", PhpValue::str("1|3")),
            entry(
                "correct_feedback",
                PhpValue::str("Excellent! Germany and Italy are both European countries."),
            ),
            entry(
                "incorrect_feedback",
                PhpValue::str("Not quite. The correct answers are Germany and Italy."),
            ),
            entry(
                "no_answer_feedback",
                PhpValue::str("Please select two answers. Germany and Italy are both European countries."),
            ),
            entry("points", PhpValue::Int(2)),
        ]),
        PhpValue::Array(vec![
            entry("type", PhpValue::str("open_question")),
            entry(
                "instructions",
                PhpValue::str("Complete the sentences using NO MORE THAN TWO WORDS."),
            ),
            entry(
                "question",
                PhpValue::str("Fill in the blanks about the solar system."),
            ),
            entry("field_count", PhpValue::Int(3)),
            entry(
                "field_labels",
                PhpValue::list(vec![
                    PhpValue::str("The largest planet in our solar system is ______."),
                    PhpValue::str("Earth has ______ moon(s)."),
                    PhpValue::str("The Sun is a ______."),
                ]),
            ),
            entry(
                "field_answers",
                PhpValue::list(vec![
                    PhpValue::str("Jupiter"),
                    // Pipe-delimited alternatives
                    PhpValue::str("one|1"),
                    PhpValue::str("star"),
                ]),
            ),
            entry("correct_feedback", PhpValue::str("Well done! Your answer is correct.")),
            entry("incorrect_feedback", PhpValue::str("Not quite. Please try again.")),
            entry("no_answer_feedback", PhpValue::str("Please provide an answer.")),
            entry("points", PhpValue::Int(3)),
        ]),
        PhpValue::Array(vec![
            entry("type", PhpValue::str("open_question")),
            entry("instructions", PhpValue::str("Write ONE WORD ONLY.")),
            entry("question", PhpValue::str("What is the opposite of hot?")),
            entry("field_count", PhpValue::Int(1)),
            entry("field_labels", PhpValue::list(vec![PhpValue::str("Answer:")])),
            entry("field_answers", PhpValue::list(vec![PhpValue::str("cold|cool")])),
            entry(
                "correct_feedback",
                PhpValue::str("Correct! Cold is the opposite of hot."),
            ),
            entry(
                "incorrect_feedback",
                PhpValue::str("Not quite. The answer is \"cold\"."),
            ),
            entry(
                "no_answer_feedback",
                PhpValue::str("Please provide an answer. The correct answer is \"cold\"."),
            ),
            entry("points", PhpValue::Int(1)),
        ]),
    ]
}

pub fn run(output: Option<&Path>) -> Result<()> {
    let questions = sample_questions();
    let starting_number = 1i64;

    let covered: usize = questions
        .iter()
        .filter_map(Question::from_value)
        .map(|q| q.numbers_covered())
        .sum();
    let count = questions.len();

    let payload = serialize(&PhpValue::list(questions));
    let doc = QuizDocument {
        title: "Sample Exercise - Closed and Open Questions".to_string(),
        content: "This is a sample exercise demonstrating the new question types.".to_string(),
        starting_question_number: starting_number,
        questions_payload: String::from_utf8_lossy(&payload).into_owned(),
        ..Default::default()
    };

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(format!(
            "sample-closed-open-questions-{}.xml",
            Utc::now().format("%Y-%m-%d")
        ))
    });

    std::fs::write(&output, doc.to_xml())?;

    println!(
        "{} XML file generated successfully: {}",
        "✓".green(),
        output.display()
    );
    println!("Total questions in XML: {}", count);
    println!("Total question numbers covered: {}", covered);
    println!(
        "Question number range: Q{} - Q{}",
        starting_number,
        starting_number + covered as i64 - 1
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php::decode;

    #[test]
    fn test_sample_questions_cover_seven_numbers() {
        // 1 + 2 (choose two) + 3 (fields) + 1
        let covered: usize = sample_questions()
            .iter()
            .filter_map(Question::from_value)
            .map(|q| q.numbers_covered())
            .sum();
        assert_eq!(covered, 7);
    }

    #[test]
    fn test_sample_payload_round_trips() {
        let value = PhpValue::list(sample_questions());
        assert_eq!(decode(&serialize(&value)).unwrap(), value);
    }
}
