//! Scripture replies: the shape the model is asked to produce, how its raw
//! text is cleaned and validated, and the fixed passages used when it fails.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prayer::PrayerType;

/// A scripture citation bundle produced for a question or a prayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureResponse {
    pub verse: String,
    pub text: String,
    pub context: String,
    pub application: String,
}

impl ScriptureResponse {
    fn new(verse: &str, text: &str, context: &str, application: &str) -> Self {
        Self {
            verse: verse.to_string(),
            text: text.to_string(),
            context: context.to_string(),
            application: application.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply is missing required field `{0}`")]
    MissingField(&'static str),
}

// Loose mirror of ScriptureResponse so a missing or blank field can be
// reported by name instead of as a generic serde error.
#[derive(Deserialize)]
struct RawReply {
    verse: Option<String>,
    text: Option<String>,
    context: Option<String>,
    application: Option<String>,
}

lazy_static::lazy_static! {
    pub static ref FALLBACK_SCRIPTURE: ScriptureResponse = ScriptureResponse::new(
        "Matthew 7:7-8",
        "Ask and it will be given to you; seek and you will find; knock and the door will be opened to you. For everyone who asks receives; the one who seeks finds; and to the one who knocks, the door will be opened.",
        "Jesus teaches about the importance of seeking divine guidance through persistent prayer and faith.",
        "When facing challenges or decisions, maintain persistent faith and prayer, trusting that God will provide guidance and answers in His time.",
    );

    static ref CURATED_SCRIPTURES: HashMap<PrayerType, ScriptureResponse> = {
        let mut m = HashMap::new();
        m.insert(PrayerType::Praise, ScriptureResponse::new(
            "Psalm 150:6",
            "Let everything that has breath praise the Lord! Praise the Lord!",
            "A powerful reminder that praise is the natural response of all creation to God's glory.",
            "Express your joy and gratitude to God through worship and praise.",
        ));
        m.insert(PrayerType::Gratitude, ScriptureResponse::new(
            "1 Thessalonians 5:18",
            "Give thanks in all circumstances; for this is the will of God in Christ Jesus for you.",
            "Reminds us to maintain gratitude even in difficult situations, trusting God's plan.",
            "Practice gratitude daily, acknowledging God's blessings in all circumstances.",
        ));
        m.insert(PrayerType::Support, ScriptureResponse::new(
            "Philippians 4:6-7",
            "Do not be anxious about anything, but in everything by prayer and supplication with thanksgiving let your requests be made known to God.",
            "Encourages us to bring all our concerns to God through prayer.",
            "Turn your worries into prayers, trusting God's peace and provision.",
        ));
        m.insert(PrayerType::Testimony, ScriptureResponse::new(
            "Psalm 66:16",
            "Come and hear, all you who fear God, and I will tell what he has done for my soul.",
            "Encourages sharing personal experiences of God's work in our lives.",
            "Share your experiences of God's faithfulness to encourage others.",
        ));
        m.insert(PrayerType::Encouragement, ScriptureResponse::new(
            "Joshua 1:9",
            "Be strong and courageous. Do not be frightened, and do not be dismayed, for the Lord your God is with you wherever you go.",
            "A reminder of God's constant presence and support in our journey.",
            "Face challenges with confidence, knowing God is always with you.",
        ));
        m.insert(PrayerType::General, ScriptureResponse::new(
            "Jeremiah 29:11",
            "For I know the plans I have for you, declares the Lord, plans for welfare and not for evil, to give you a future and a hope.",
            "Assures us of God's good plans for our lives.",
            "Trust in God's good plans for your life, even in uncertain times.",
        ));
        m
    };
}

/// Remove markdown code fences the model tends to wrap JSON in.
///
/// Drops every "```json" marker (with one following newline, if any) and
/// every "```" marker (with one preceding newline, if any), then trims.
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("```json") {
            rest = after.strip_prefix('\n').unwrap_or(after);
        } else if let Some(after) = rest.strip_prefix("\n```") {
            rest = after;
        } else if let Some(after) = rest.strip_prefix("```") {
            rest = after;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out.trim().to_string()
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ReplyError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ReplyError::MissingField(field)),
    }
}

/// Parse the model's raw reply into a [`ScriptureResponse`].
pub fn parse_reply(raw: &str) -> Result<ScriptureResponse, ReplyError> {
    let cleaned = strip_code_fences(raw);
    let reply: RawReply = serde_json::from_str(&cleaned)?;

    Ok(ScriptureResponse {
        verse: required(reply.verse, "verse")?,
        text: required(reply.text, "text")?,
        context: required(reply.context, "context")?,
        application: required(reply.application, "application")?,
    })
}

/// Parse the reply, or fall back to [`FALLBACK_SCRIPTURE`] when it is
/// unusable. The failure is only visible in the logs.
pub fn reply_or_fallback(raw: &str) -> ScriptureResponse {
    match parse_reply(raw) {
        Ok(scripture) => {
            debug!(verse = %scripture.verse, "Parsed scripture reply");
            scripture
        }
        Err(e) => {
            warn!(error = %e, raw_content = %raw, "Unusable scripture reply, returning fallback");
            FALLBACK_SCRIPTURE.clone()
        }
    }
}

/// Fixed passage for a prayer category, used when the provider cannot be reached.
pub fn curated_scripture(prayer_type: PrayerType) -> ScriptureResponse {
    CURATED_SCRIPTURES
        .get(&prayer_type)
        .cloned()
        .unwrap_or_else(|| FALLBACK_SCRIPTURE.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "verse": "Matthew 6:14",
        "text": "For if you forgive other people when they sin against you, your heavenly Father will also forgive you.",
        "context": "Part of the Sermon on the Mount.",
        "application": "Release resentment and extend grace."
    }"#;

    #[test]
    fn test_strip_code_fences_json_block() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_plain_block() {
        let raw = "```\n{\"a\": 1}\n```\n";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_reply_valid() {
        let scripture = parse_reply(VALID).unwrap();
        assert_eq!(scripture.verse, "Matthew 6:14");
        assert_eq!(scripture.application, "Release resentment and extend grace.");
    }

    #[test]
    fn test_parse_reply_fenced() {
        let raw = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_reply(&raw).unwrap(), parse_reply(VALID).unwrap());
    }

    #[test]
    fn test_parse_reply_missing_field() {
        let raw = r#"{"verse": "John 3:16", "text": "For God so loved the world", "context": "Nicodemus"}"#;
        match parse_reply(raw) {
            Err(ReplyError::MissingField(field)) => assert_eq!(field, "application"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_blank_field() {
        let raw = r#"{"verse": "", "text": "t", "context": "c", "application": "a"}"#;
        assert!(matches!(parse_reply(raw), Err(ReplyError::MissingField("verse"))));
    }

    #[test]
    fn test_parse_reply_non_string_field() {
        let raw = r#"{"verse": 42, "text": "t", "context": "c", "application": "a"}"#;
        assert!(matches!(parse_reply(raw), Err(ReplyError::Json(_))));
        assert_eq!(reply_or_fallback(raw), *FALLBACK_SCRIPTURE);
    }

    #[test]
    fn test_parse_reply_not_json() {
        assert!(matches!(
            parse_reply("Here is a verse for you: John 3:16"),
            Err(ReplyError::Json(_))
        ));
    }

    #[test]
    fn test_reply_or_fallback() {
        assert_eq!(reply_or_fallback("not json at all"), *FALLBACK_SCRIPTURE);
        assert_eq!(reply_or_fallback(""), *FALLBACK_SCRIPTURE);
        assert_eq!(reply_or_fallback(VALID).verse, "Matthew 6:14");
    }

    #[test]
    fn test_curated_scripture_per_type() {
        assert_eq!(curated_scripture(PrayerType::Praise).verse, "Psalm 150:6");
        assert_eq!(curated_scripture(PrayerType::General).verse, "Jeremiah 29:11");
        for prayer_type in PrayerType::ALL {
            let s = curated_scripture(prayer_type);
            assert!(!s.verse.is_empty() && !s.text.is_empty());
        }
    }
}
