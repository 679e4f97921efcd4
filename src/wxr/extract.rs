//! Tolerant text-scan extraction of WXR postmeta pairs.
//!
//! This matches the legacy tooling rather than a DOM parser: meta keys
//! may be plain or CDATA-wrapped and may carry stray whitespace inside
//! the CDATA, so lookups trim the captured key before comparing.

use anyhow::{Context, Result};
use regex::Regex;

pub const QUESTIONS_KEY: &str = "_ielts_cm_questions";
pub const READING_TEXTS_KEY: &str = "_ielts_cm_reading_texts";
pub const TRANSCRIPT_KEY: &str = "_ielts_cm_transcript";
pub const STARTING_NUMBER_KEY: &str = "_ielts_cm_starting_question_number";
pub const PASS_PERCENTAGE_KEY: &str = "_ielts_cm_pass_percentage";
pub const LAYOUT_TYPE_KEY: &str = "_ielts_cm_layout_type";
pub const TIMER_MINUTES_KEY: &str = "_ielts_cm_timer_minutes";
pub const AUDIO_URL_KEY: &str = "_ielts_cm_audio_url";

/// Meta keys whose values hold PHP-serialized payloads
pub const PAYLOAD_KEYS: [&str; 2] = [QUESTIONS_KEY, READING_TEXTS_KEY];

/// One extracted `<wp:meta_key>/<wp:meta_value>` pair with the byte span
/// of the value's CDATA content, so a repaired payload can be spliced
/// back without re-encoding the rest of the document.
#[derive(Debug, Clone)]
pub struct MetaPair {
    pub key: String,
    pub value: String,
    pub value_start: usize,
    pub value_end: usize,
}

fn meta_pair_regex() -> Result<Regex> {
    Regex::new(
        r"(?s)<wp:meta_key>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</wp:meta_key>\s*<wp:meta_value><!\[CDATA\[(.*?)\]\]></wp:meta_value>",
    )
    .context("Failed to compile postmeta regex")
}

/// Extract every postmeta pair in document order
pub fn meta_pairs(content: &str) -> Result<Vec<MetaPair>> {
    let re = meta_pair_regex()?;
    let mut pairs = Vec::new();

    for cap in re.captures_iter(content) {
        let key = cap.get(1).unwrap().as_str().trim().to_string();
        let value = cap.get(2).unwrap();
        pairs.push(MetaPair {
            key,
            value: value.as_str().to_string(),
            value_start: value.start(),
            value_end: value.end(),
        });
    }

    Ok(pairs)
}

/// First postmeta pair with the given key, whitespace-tolerant
pub fn find_meta(content: &str, key: &str) -> Result<Option<MetaPair>> {
    Ok(meta_pairs(content)?.into_iter().find(|p| p.key == key))
}

/// Whether a meta key is present, regardless of its value
pub fn has_meta_key(content: &str, key: &str) -> Result<bool> {
    Ok(meta_pairs(content)?.iter().any(|p| p.key == key))
}

/// Splice a new value into a pair's CDATA span
pub fn replace_meta_value(content: &str, pair: &MetaPair, new_value: &str) -> String {
    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..pair.value_start]);
    out.push_str(new_value);
    out.push_str(&content[pair.value_end..]);
    out
}

/// The item's post type, CDATA-unwrapped
pub fn post_type(content: &str) -> Result<Option<String>> {
    let re = Regex::new(r"(?is)<wp:post_type><!\[CDATA\[(.*?)\]\]></wp:post_type>")
        .context("Failed to compile post_type regex")?;
    Ok(re
        .captures(content)
        .map(|cap| cap[1].trim().to_string()))
}

/// The item's title text with any CDATA wrapper removed
pub fn title(content: &str) -> Result<Option<String>> {
    let re = Regex::new(r"(?is)<title>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>")
        .context("Failed to compile title regex")?;
    // The channel-level <title> comes first in full exports; prefer the
    // item title when both exist by taking the last match.
    Ok(re
        .captures_iter(content)
        .last()
        .map(|cap| cap[1].trim().to_string()))
}

/// Leading/trailing whitespace inside any CDATA section is a hard
/// formatting failure for importers
pub fn has_cdata_whitespace(content: &str) -> Result<bool> {
    let open = Regex::new(r"<!\[CDATA\[\s+").context("Failed to compile CDATA regex")?;
    let close = Regex::new(r"\s+\]\]>").context("Failed to compile CDATA regex")?;
    Ok(open.is_match(content) || close.is_match(content))
}

/// Normalize `<![CDATA[ x ]]>` to `<![CDATA[x]]>` across the document
pub fn normalize_cdata(content: &str) -> Result<String> {
    let open = Regex::new(r"<!\[CDATA\[\s+").context("Failed to compile CDATA regex")?;
    let close = Regex::new(r"\s+\]\]>").context("Failed to compile CDATA regex")?;
    let fixed = open.replace_all(content, "<![CDATA[");
    Ok(close.replace_all(&fixed, "]]>").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<item>
<title><![CDATA[Listening Test 6 Section 1]]></title>
<wp:post_type><![CDATA[ielts_quiz]]></wp:post_type>
<wp:postmeta>
<wp:meta_key><![CDATA[ _ielts_cm_questions ]]></wp:meta_key>
<wp:meta_value><![CDATA[a:1:{i:0;s:5:"Paris";}]]></wp:meta_value>
</wp:postmeta>
<wp:postmeta>
<wp:meta_key><![CDATA[_ielts_cm_pass_percentage]]></wp:meta_key>
<wp:meta_value><![CDATA[i:60;]]></wp:meta_value>
</wp:postmeta>
</item>"#;

    #[test]
    fn test_meta_pairs_trim_key_whitespace() {
        let pairs = meta_pairs(DOC).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].key, QUESTIONS_KEY);
        assert_eq!(pairs[0].value, "a:1:{i:0;s:5:\"Paris\";}");
        assert_eq!(pairs[1].key, PASS_PERCENTAGE_KEY);
    }

    #[test]
    fn test_find_meta_and_replace() {
        let pair = find_meta(DOC, QUESTIONS_KEY).unwrap().unwrap();
        let replaced = replace_meta_value(DOC, &pair, "a:0:{}");
        assert!(replaced.contains("<wp:meta_value><![CDATA[a:0:{}]]></wp:meta_value>"));
        assert!(replaced.contains("i:60;"));
    }

    #[test]
    fn test_post_type_and_title() {
        assert_eq!(post_type(DOC).unwrap().as_deref(), Some("ielts_quiz"));
        assert_eq!(
            title(DOC).unwrap().as_deref(),
            Some("Listening Test 6 Section 1")
        );
    }

    #[test]
    fn test_plain_meta_key_without_cdata() {
        let doc = "<wp:meta_key>_ielts_cm_transcript</wp:meta_key>\n<wp:meta_value><![CDATA[hello]]></wp:meta_value>";
        let pair = find_meta(doc, TRANSCRIPT_KEY).unwrap().unwrap();
        assert_eq!(pair.value, "hello");
    }

    #[test]
    fn test_cdata_whitespace_detection_and_fix() {
        let doc = "<title><![CDATA[ x ]]></title>";
        assert!(has_cdata_whitespace(doc).unwrap());
        let fixed = normalize_cdata(doc).unwrap();
        assert_eq!(fixed, "<title><![CDATA[x]]></title>");
        assert!(!has_cdata_whitespace(&fixed).unwrap());
    }
}
