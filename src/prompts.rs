// Prompt templates sent to the provider. Both ask for the same JSON shape
// so one parser handles either reply.

pub const GUIDANCE_SYSTEM_PROMPT: &str = "You are a compassionate Christian AI assistant with deep knowledge of Jesus' teachings. \
Your role is to help people find relevant guidance from Jesus' direct teachings in the Gospels for their modern-day situations. \
Always maintain a respectful, empathetic tone and focus on practical applications of Jesus' wisdom.";

pub const PRAYER_SYSTEM_PROMPT: &str = "You are a compassionate Christian AI assistant with deep knowledge of the Bible, particularly focused on prayer and worship. \
Your role is to find scripture that resonates with people's prayers, offering comfort, encouragement, and spiritual connection. \
For each prayer, find a Bible verse that mirrors the prayer's heart and intention, helping to deepen their connection with God through scripture.";

/// User turn for a guidance question. The question is trimmed before embedding.
pub fn guidance_prompt(question: &str) -> String {
    format!(
        r#"Given this modern situation or question: "{}"

I need guidance based on Jesus' teachings. Please:
1. Find a relevant Bible verse where Jesus directly teaches about this topic or a similar situation
2. Provide the full text of the verse
3. Explain the historical and spiritual context of Jesus' teaching
4. Show how to apply this teaching to the modern situation

Format your response as valid JSON like this:
{{
  "verse": "Book Chapter:Verse",
  "text": "The full Bible verse text",
  "context": "Brief explanation of the historical and spiritual context",
  "application": "How to apply this teaching today"
}}"#,
        question.trim()
    )
}

/// User turn for a prayer of the given category.
pub fn prayer_prompt(prayer_type: &str, content: &str) -> String {
    format!(
        r#"Given this heartfelt {} prayer:
"{}"

Please:
1. Find a Bible verse that echoes the spirit and intention of this prayer
2. Share the complete verse text
3. Explain the spiritual significance and context of this scripture
4. Show how this verse connects with and amplifies their prayer's meaning

Format your response as valid JSON like this:
{{
  "verse": "Book Chapter:Verse",
  "text": "The full Bible verse text",
  "context": "Brief explanation of the spiritual significance and biblical context",
  "application": "How this scripture resonates with and strengthens their prayer"
}}"#,
        prayer_type.trim(),
        content.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guidance_prompt_embeds_trimmed_question() {
        let prompt = guidance_prompt("   How do I find peace?  \n");
        assert!(prompt.contains("\"How do I find peace?\""));
        assert!(prompt.contains("\"application\""));
    }

    #[test]
    fn test_prayer_prompt_embeds_type_and_content() {
        let prompt = prayer_prompt("gratitude", " Thank you for my family ");
        assert!(prompt.starts_with("Given this heartfelt gratitude prayer:"));
        assert!(prompt.contains("\"Thank you for my family\""));
        assert!(prompt.contains("\"verse\": \"Book Chapter:Verse\""));
    }
}
