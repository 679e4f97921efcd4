//! Corruption detection and repair for serialized payloads.
//!
//! Upstream transcoding replaces ASCII punctuation with typographic
//! multi-byte UTF-8 characters inside CDATA, after the payload's string
//! length prefixes were already computed. Six sequences account for all
//! observed corruption. Repair substitutes them with single-byte
//! equivalents, then regenerates every length prefix by decoding and
//! re-serializing each payload; a payload that still fails to decode
//! keeps its original bytes and is only warned about.

use crate::php::{decode, serialize};
use crate::wxr::extract::{self, MetaPair};
use crate::Result;

/// The six known-offending sequences and their single-byte replacements
pub const REPLACEMENTS: [(&str, &str, &str); 6] = [
    ("\u{2013}", "-", "en-dash"),
    ("\u{2014}", "--", "em-dash"),
    ("\u{2018}", "'", "left single quote"),
    ("\u{2019}", "'", "right single quote"),
    ("\u{201C}", "\"", "left double quote"),
    ("\u{201D}", "\"", "right double quote"),
];

/// Per-sequence occurrence counts from a detection scan
#[derive(Debug, Default)]
pub struct ScanResult {
    pub counts: Vec<(&'static str, usize)>,
    pub total: usize,
}

/// Count occurrences of each offending sequence
pub fn scan(content: &str) -> ScanResult {
    let mut result = ScanResult::default();
    for (needle, _, name) in REPLACEMENTS {
        let count = content.matches(needle).count();
        if count > 0 {
            result.counts.push((name, count));
            result.total += count;
        }
    }
    result
}

/// Uniform substitution over the raw text.
///
/// This alone does not correct length prefixes computed before the
/// corruption; `repair_document` re-derives each payload afterwards.
pub fn substitute(content: &str) -> (String, usize) {
    let mut out = content.to_string();
    let mut replaced = 0;
    for (needle, replacement, _) in REPLACEMENTS {
        replaced += out.matches(needle).count();
        out = out.replace(needle, replacement);
    }
    (out, replaced)
}

/// Terminal state of a repair run
#[derive(Debug, PartialEq, Eq)]
pub enum RepairOutcome {
    /// No offending sequences found; the document was left untouched
    NoIssues,
    /// Substitution applied and every present payload re-serialized
    Fixed,
    /// Substitution applied but at least one payload still failed to
    /// decode and kept its original bytes
    Unfixable,
}

/// Full result of repairing one document
#[derive(Debug)]
pub struct RepairReport {
    pub outcome: RepairOutcome,
    /// Per-sequence counts found during the scan
    pub scan: ScanResult,
    /// Human-readable per-payload notes (byte sizes before/after)
    pub details: Vec<String>,
    /// Meta keys whose payloads could not be repaired
    pub warnings: Vec<String>,
}

/// Repair a whole document: scan, substitute, then decode and
/// re-serialize each payload field so its length prefixes are
/// regenerated.
///
/// Returns the output text alongside the report. When the outcome is
/// `NoIssues` the returned text is the input unchanged; a payload that
/// fails to decode after substitution is restored to its pre-substitution
/// bytes so a half-repaired payload is never produced.
pub fn repair_document(content: &str) -> Result<(String, RepairReport)> {
    let scan_result = scan(content);
    if scan_result.total == 0 {
        return Ok((
            content.to_string(),
            RepairReport {
                outcome: RepairOutcome::NoIssues,
                scan: scan_result,
                details: Vec::new(),
                warnings: Vec::new(),
            },
        ));
    }

    let originals: Vec<MetaPair> = extract::meta_pairs(content)?
        .into_iter()
        .filter(|p| extract::PAYLOAD_KEYS.contains(&p.key.as_str()))
        .collect();

    let (mut output, _) = substitute(content);
    let mut details = Vec::new();
    let mut warnings = Vec::new();

    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for original in &originals {
        // Re-locate the pair in the substituted text (spans shifted);
        // documents can carry the same key once per item
        let occurrence = seen.entry(original.key.clone()).or_insert(0);
        let Some(pair) = extract::meta_pairs(&output)?
            .into_iter()
            .filter(|p| p.key == original.key)
            .nth(*occurrence)
        else {
            continue;
        };
        *occurrence += 1;

        match decode(pair.value.as_bytes()) {
            Ok(value) => {
                let reserialized = serialize(&value);
                let reserialized = String::from_utf8_lossy(&reserialized).into_owned();
                details.push(format!(
                    "Fixed {} ({} -> {} bytes)",
                    pair.key,
                    original.value.len(),
                    reserialized.len()
                ));
                output = extract::replace_meta_value(&output, &pair, &reserialized);
            }
            Err(err) => {
                warnings.push(format!(
                    "Cannot unserialize {} ({}) - keeping original",
                    pair.key, err
                ));
                output = extract::replace_meta_value(&output, &pair, &original.value);
            }
        }
    }

    let outcome = if warnings.is_empty() {
        RepairOutcome::Fixed
    } else {
        RepairOutcome::Unfixable
    };

    Ok((
        output,
        RepairReport {
            outcome,
            scan: scan_result,
            details,
            warnings,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php::{PhpKey, PhpValue};
    use crate::wxr::QuizDocument;

    fn doc_with_payload(payload: &str) -> String {
        QuizDocument {
            title: "Section 1".to_string(),
            questions_payload: payload.to_string(),
            ..Default::default()
        }
        .to_xml()
    }

    /// Serialize a clean value, then corrupt it the way upstream
    /// transcoding does: swap a hyphen for an en-dash after the length
    /// prefix was computed.
    fn corrupted_payload() -> (String, PhpValue) {
        let clean = PhpValue::list(vec![PhpValue::Array(vec![
            (PhpKey::str("type"), PhpValue::str("open_question")),
            (PhpKey::str("question"), PhpValue::str("A well - known site")),
            (PhpKey::str("field_count"), PhpValue::Int(1)),
        ])]);
        let bytes = serialize(&clean);
        let text = String::from_utf8(bytes).unwrap();
        (text.replace("well - known", "well \u{2013} known"), clean)
    }

    #[test]
    fn test_scan_counts_sequences() {
        let result = scan("a \u{2013} b \u{2019}c\u{2019}");
        assert_eq!(result.total, 3);
        assert!(result.counts.contains(&("en-dash", 1)));
        assert!(result.counts.contains(&("right single quote", 2)));
    }

    #[test]
    fn test_corrupted_payload_fails_decode_then_repairs() {
        let (corrupted, clean) = corrupted_payload();
        assert!(decode(corrupted.as_bytes()).is_err());

        let doc = doc_with_payload(&corrupted);
        let (fixed, report) = repair_document(&doc).unwrap();
        assert_eq!(report.outcome, RepairOutcome::Fixed);

        let pair = extract::find_meta(&fixed, extract::QUESTIONS_KEY)
            .unwrap()
            .unwrap();
        let value = decode(pair.value.as_bytes()).unwrap();
        // The en-dash came from a hyphen, so repair restores the original
        assert_eq!(value, clean);
    }

    #[test]
    fn test_repair_is_noop_on_clean_document() {
        let payload = "a:1:{i:0;s:5:\"Paris\";}";
        let doc = doc_with_payload(payload);
        let (output, report) = repair_document(&doc).unwrap();
        assert_eq!(report.outcome, RepairOutcome::NoIssues);
        assert_eq!(output, doc);
    }

    #[test]
    fn test_repair_idempotent_on_already_correct_payload() {
        // En-dash in the title only; the payload is already consistent
        let mut doc = doc_with_payload("a:1:{i:0;s:5:\"Paris\";}");
        doc = doc.replace("Section 1", "Section \u{2013} 1");

        let (output, report) = repair_document(&doc).unwrap();
        assert_eq!(report.outcome, RepairOutcome::Fixed);
        let pair = extract::find_meta(&output, extract::QUESTIONS_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(pair.value, "a:1:{i:0;s:5:\"Paris\";}");
    }

    #[test]
    fn test_unfixable_payload_keeps_original_bytes() {
        // Truncated payload: substitution cannot make it decode
        let broken = "a:2:{i:0;s:9:\"x \u{2013} y\";";
        let doc = doc_with_payload(broken);
        let (output, report) = repair_document(&doc).unwrap();

        assert_eq!(report.outcome, RepairOutcome::Unfixable);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains(extract::QUESTIONS_KEY));

        let pair = extract::find_meta(&output, extract::QUESTIONS_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(pair.value, broken);
    }
}
