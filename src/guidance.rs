// Request validation and the ask → clean → parse → fallback pipeline shared
// by the guidance and scripture endpoints and the `ask` command.

use thiserror::Error;
use tracing::{info, instrument};

use crate::constants::MIN_QUESTION_CHARS;
use crate::llm_interaction::{AnthropicClient, LlmError};
use crate::prompts;
use crate::scripture::{reply_or_fallback, ScriptureResponse};

#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Upstream(#[from] LlmError),
}

/// Check a guidance question: non-empty and at least three characters once
/// trimmed. Length is counted in UTF-16 code units, as browser clients count it.
pub fn validate_question(question: Option<&str>) -> Result<&str, GuidanceError> {
    let question = match question {
        Some(q) if !q.is_empty() => q,
        _ => return Err(GuidanceError::InvalidInput("Question must be a non-empty string")),
    };
    if question.trim().encode_utf16().count() < MIN_QUESTION_CHARS {
        return Err(GuidanceError::InvalidInput(
            "Question must be at least 3 characters long",
        ));
    }
    Ok(question)
}

/// Check a prayer submission: content and type both non-empty. Whitespace is
/// trimmed later, when the prompt is built.
pub fn validate_prayer<'a>(
    content: Option<&'a str>,
    prayer_type: Option<&'a str>,
) -> Result<(&'a str, &'a str), GuidanceError> {
    match (content, prayer_type) {
        (Some(c), Some(t)) if !c.is_empty() && !t.is_empty() => Ok((c, t)),
        _ => Err(GuidanceError::InvalidInput(
            "Prayer content and type must be non-empty strings",
        )),
    }
}

/// Scripture-based guidance for a question. Provider failures are errors; an
/// unusable reply becomes the fallback passage.
#[instrument(skip(client))]
pub async fn ask_guidance(
    client: &AnthropicClient,
    question: Option<&str>,
) -> Result<ScriptureResponse, GuidanceError> {
    let question = validate_question(question)?;
    info!("Sending question to Anthropic");

    let reply = client
        .complete(prompts::GUIDANCE_SYSTEM_PROMPT, &prompts::guidance_prompt(question))
        .await?;
    Ok(reply_or_fallback(&reply))
}

/// A scripture passage that mirrors a prayer of the given category.
#[instrument(skip(client))]
pub async fn find_scripture_for_prayer(
    client: &AnthropicClient,
    content: Option<&str>,
    prayer_type: Option<&str>,
) -> Result<ScriptureResponse, GuidanceError> {
    let (content, prayer_type) = validate_prayer(content, prayer_type)?;
    info!("Sending prayer to Anthropic");

    let reply = client
        .complete(
            prompts::PRAYER_SYSTEM_PROMPT,
            &prompts::prayer_prompt(prayer_type, content),
        )
        .await?;
    Ok(reply_or_fallback(&reply))
}
