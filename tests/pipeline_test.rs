//! End-to-end pipeline tests: author a document, corrupt it the way
//! upstream transcoding does, repair it, validate it, and combine
//! sections into a complete test.

use std::path::Path;
use tempfile::TempDir;
use wxrkit::php::{decode, serialize, PhpKey, PhpValue};
use wxrkit::repair::{repair_document, RepairOutcome};
use wxrkit::wxr::{extract, QuizDocument};
use wxrkit::{cli, combine, validator};

fn closed_question(prompt: &str, answers: i64) -> PhpValue {
    PhpValue::Array(vec![
        (PhpKey::str("type"), PhpValue::str("closed_question")),
        (PhpKey::str("question"), PhpValue::str(prompt)),
        (PhpKey::str("correct_answer_count"), PhpValue::Int(answers)),
        (PhpKey::str("correct_feedback"), PhpValue::str("Yes.")),
        (PhpKey::str("incorrect_feedback"), PhpValue::str("No.")),
        (PhpKey::str("no_answer_feedback"), PhpValue::str("Answer.")),
    ])
}

fn section_doc(title: &str, question_count: usize, transcript: &str) -> String {
    let questions: Vec<PhpValue> = (0..question_count)
        .map(|i| closed_question(&format!("Question {}?", i + 1), 1))
        .collect();
    let payload = serialize(&PhpValue::list(questions));
    QuizDocument {
        title: title.to_string(),
        questions_payload: String::from_utf8(payload).unwrap(),
        transcript: Some(transcript.to_string()),
        ..Default::default()
    }
    .to_xml()
}

#[test]
fn fix_command_repairs_corrupted_export() {
    let tmp = TempDir::new().unwrap();

    // Author a clean document with a hyphenated prompt, then corrupt it
    // the way transcoding does: the hyphen becomes an en-dash after the
    // string length prefix was computed
    let question = PhpValue::list(vec![closed_question("The well - known site?", 1)]);
    let payload = String::from_utf8(serialize(&question)).unwrap();
    let doc = QuizDocument {
        title: "Listening Test 6 Section 1".to_string(),
        questions_payload: payload.clone(),
        transcript: Some("transcript".to_string()),
        ..Default::default()
    }
    .to_xml();

    let corrupted = doc.replace("well - known", "well \u{2013} known");
    assert!(
        decode(
            extract::find_meta(&corrupted, extract::QUESTIONS_KEY)
                .unwrap()
                .unwrap()
                .value
                .as_bytes()
        )
        .is_err(),
        "injected en-dash must desynchronize the payload"
    );

    let input = tmp.path().join("section1.xml");
    std::fs::write(&input, &corrupted).unwrap();

    let repaired = cli::fix::run(&input, None).unwrap();
    assert!(repaired);

    let output = tmp.path().join("section1-fixed.xml");
    let fixed = std::fs::read_to_string(&output).unwrap();
    let fixed_payload = extract::find_meta(&fixed, extract::QUESTIONS_KEY)
        .unwrap()
        .unwrap()
        .value;

    // The en-dash came from a hyphen, so repair restores the original
    // byte-accurate payload
    assert_eq!(fixed_payload, payload);
    assert_eq!(decode(fixed_payload.as_bytes()).unwrap(), question);
}

#[test]
fn fix_command_reports_nothing_to_do_on_clean_file() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("clean.xml");
    std::fs::write(&input, section_doc("Section 1", 2, "text")).unwrap();

    // Exit code 1: no fixable characters found
    assert!(!cli::fix::run(&input, None).unwrap());
    assert!(!tmp.path().join("clean-fixed.xml").exists());
}

#[test]
fn repair_then_validate_round_trip() {
    let doc = section_doc("Mini Exercise", 3, "She said \u{201C}hello\u{201D}");
    let (fixed, report) = repair_document(&doc).unwrap();
    assert_eq!(report.outcome, RepairOutcome::Fixed);

    let (validation, _) = validator::validate_basic(&fixed, false).unwrap();
    assert!(validation.passed(), "findings: {:?}", validation.findings);

    // Repairing the repaired document is a no-op
    let (again, second) = repair_document(&fixed).unwrap();
    assert_eq!(second.outcome, RepairOutcome::NoIssues);
    assert_eq!(again, fixed);
}

#[test]
fn combine_four_sections_and_pass_comprehensive_validation() {
    let tmp = TempDir::new().unwrap();
    for (i, name) in combine::SECTION_FILES.iter().enumerate() {
        let doc = section_doc(
            name.trim_end_matches(".xml"),
            10,
            &format!("Section {} transcript", i + 1),
        );
        std::fs::write(tmp.path().join(name), doc).unwrap();
    }

    let result = combine::combine(tmp.path()).unwrap();
    assert_eq!(result.question_elements, 40);

    let combined = std::fs::read_to_string(&result.output_path).unwrap();

    // Title claims all 40 questions; 40 single-answer elements cover 40
    let report = validator::validate_comprehensive(&combined).unwrap();
    assert!(report.passed(), "findings: {:?}", report.findings);

    // Merged array is reindexed from key 0
    let payload = extract::find_meta(&combined, extract::QUESTIONS_KEY)
        .unwrap()
        .unwrap();
    let value = decode(payload.value.as_bytes()).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 40);
    assert_eq!(entries[0].0, PhpKey::Int(0));
    assert_eq!(entries[39].0, PhpKey::Int(39));
}

#[test]
fn validate_fix_normalizes_cdata_whitespace() {
    let tmp = TempDir::new().unwrap();
    let doc = section_doc("Exercise", 1, "text").replace(
        "<![CDATA[_ielts_cm_questions]]>",
        "<![CDATA[ _ielts_cm_questions ]]>",
    );
    let input = tmp.path().join("spaced.xml");
    std::fs::write(&input, doc).unwrap();

    assert!(cli::validate::run(&input, true).unwrap());

    let fixed = std::fs::read_to_string(tmp.path().join("spaced-fixed.xml")).unwrap();
    assert!(!extract::has_cdata_whitespace(&fixed).unwrap());
    let (report, _) = validator::validate_basic(&fixed, false).unwrap();
    assert!(report.passed());
}

#[test]
fn generate_writes_importable_sample() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("sample.xml");
    cli::generate::run(Some(Path::new(&output))).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    let (report, _) = validator::validate_basic(&content, false).unwrap();
    assert!(report.passed(), "findings: {:?}", report.findings);
}
