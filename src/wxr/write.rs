//! WXR document emission for the combiner and the sample generator.

use super::extract;
use chrono::Utc;

/// One quiz item rendered into a WordPress eXtended RSS document.
///
/// Payload fields hold already-serialized bytes as text; the writer never
/// re-encodes them, so a combined payload lands byte-identical in CDATA.
#[derive(Debug, Clone)]
pub struct QuizDocument {
    pub title: String,
    pub content: String,
    pub post_type: String,
    pub pass_percentage: i64,
    pub layout_type: String,
    pub timer_minutes: i64,
    pub starting_question_number: i64,
    pub questions_payload: String,
    pub reading_texts_payload: String,
    pub transcript: Option<String>,
    pub audio_url: Option<String>,
}

impl Default for QuizDocument {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            post_type: "ielts_quiz".to_string(),
            pass_percentage: 60,
            layout_type: "listening_practice".to_string(),
            timer_minutes: 40,
            starting_question_number: 1,
            questions_payload: "a:0:{}".to_string(),
            reading_texts_payload: "a:0:{}".to_string(),
            transcript: None,
            audio_url: None,
        }
    }
}

impl QuizDocument {
    pub fn to_xml(&self) -> String {
        let now = Utc::now();
        let date = now.format("%Y-%m-%d %H:%M:%S");

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!("<!-- Generated on {} -->\n", date));
        xml.push_str(concat!(
            "<rss version=\"2.0\" ",
            "xmlns:excerpt=\"http://wordpress.org/export/1.2/excerpt/\" ",
            "xmlns:content=\"http://purl.org/rss/1.0/modules/content/\" ",
            "xmlns:wfw=\"http://wellformedweb.org/CommentAPI/\" ",
            "xmlns:dc=\"http://purl.org/dc/elements/1.1/\" ",
            "xmlns:wp=\"http://wordpress.org/export/1.2/\">\n",
        ));
        xml.push_str("<channel>\n");
        xml.push_str("\t<title>IELTS Course</title>\n");
        xml.push_str("\t<link>http://example.com</link>\n");
        xml.push_str("\t<description>IELTS Preparation Course</description>\n");
        xml.push_str(&format!("\t<pubDate>{}</pubDate>\n", now.to_rfc2822()));
        xml.push_str("\t<language>en</language>\n");
        xml.push_str("\t<wp:wxr_version>1.2</wp:wxr_version>\n");
        xml.push_str("\t<wp:base_site_url>http://example.com</wp:base_site_url>\n");
        xml.push_str("\t<wp:base_blog_url>http://example.com</wp:base_blog_url>\n\n");

        xml.push_str("\t<item>\n");
        xml.push_str(&format!("\t\t<title><![CDATA[{}]]></title>\n", self.title));
        xml.push_str("\t\t<link>http://example.com/exercise</link>\n");
        xml.push_str("\t\t<dc:creator><![CDATA[admin]]></dc:creator>\n");
        xml.push_str(&format!(
            "\t\t<content:encoded><![CDATA[{}]]></content:encoded>\n",
            self.content
        ));
        xml.push_str(&format!("\t\t<wp:post_date><![CDATA[{}]]></wp:post_date>\n", date));
        xml.push_str("\t\t<wp:status><![CDATA[publish]]></wp:status>\n");
        xml.push_str(&format!(
            "\t\t<wp:post_type><![CDATA[{}]]></wp:post_type>\n",
            self.post_type
        ));

        self.push_meta(
            &mut xml,
            extract::PASS_PERCENTAGE_KEY,
            &format!("i:{};", self.pass_percentage),
        );
        self.push_meta(&mut xml, extract::LAYOUT_TYPE_KEY, &self.layout_type);
        self.push_meta(
            &mut xml,
            extract::TIMER_MINUTES_KEY,
            &format!("i:{};", self.timer_minutes),
        );
        self.push_meta(
            &mut xml,
            extract::STARTING_NUMBER_KEY,
            &format!("i:{};", self.starting_question_number),
        );
        self.push_meta(&mut xml, extract::QUESTIONS_KEY, &self.questions_payload);
        self.push_meta(
            &mut xml,
            extract::READING_TEXTS_KEY,
            &self.reading_texts_payload,
        );
        if let Some(transcript) = &self.transcript {
            self.push_meta(&mut xml, extract::TRANSCRIPT_KEY, transcript);
        }
        if let Some(audio_url) = &self.audio_url {
            self.push_meta(&mut xml, extract::AUDIO_URL_KEY, audio_url);
        }

        xml.push_str("\t</item>\n");
        xml.push_str("</channel>\n");
        xml.push_str("</rss>\n");
        xml
    }

    fn push_meta(&self, xml: &mut String, key: &str, value: &str) {
        xml.push_str("\t\t<wp:postmeta>\n");
        xml.push_str(&format!(
            "\t\t\t<wp:meta_key><![CDATA[{}]]></wp:meta_key>\n",
            key
        ));
        xml.push_str(&format!(
            "\t\t\t<wp:meta_value><![CDATA[{}]]></wp:meta_value>\n",
            value
        ));
        xml.push_str("\t\t</wp:postmeta>\n");
    }
}
