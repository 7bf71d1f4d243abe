//! Wire types for the chat-completions response, and the extraction chain
//! that pulls usable plan text out of a variably-shaped payload.
//!
//! Providers disagree on where generated text lives: most put it in
//! `choices[0].message.content`, reasoning-model variants sometimes leave
//! `content` empty and fill `message.reasoning`, and older completion-style
//! endpoints use a bare `choices[0].text`. Every field is optional here so a
//! missing one deserializes instead of erroring; the chain decides afterwards
//! whether anything usable arrived.

use serde::Deserialize;

/// Top-level completion response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One generation candidate.
#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
    /// Legacy completion-style field, present on some providers.
    #[serde(default)]
    pub text: Option<String>,
}

/// The assistant message of a chat-style choice.
#[derive(Debug, Default, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
    /// Populated by some reasoning-model variants instead of `content`.
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Accept a candidate only if it has content after trimming.
fn non_empty(candidate: Option<&str>) -> Option<String> {
    candidate
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Extract plan text from a completion response.
///
/// Tries, in order, on the first choice: `message.content`, then
/// `message.reasoning`, then `text`. The first non-empty candidate wins.
/// Returns `None` when there are no choices or every candidate is empty.
pub fn extract_plan_text(response: &ChatCompletionResponse) -> Option<String> {
    let choice = response.choices.first()?;
    [
        choice.message.as_ref().and_then(|m| m.content.as_deref()),
        choice.message.as_ref().and_then(|m| m.reasoning.as_deref()),
        choice.text.as_deref(),
    ]
    .into_iter()
    .find_map(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).expect("response should deserialize")
    }

    #[test]
    fn prefers_message_content() {
        let response = parse(
            r#"{"choices":[{"message":{"content":"the plan","reasoning":"thinking"},"text":"legacy"}]}"#,
        );
        assert_eq!(extract_plan_text(&response).as_deref(), Some("the plan"));
    }

    #[test]
    fn falls_back_to_reasoning_when_content_empty() {
        let response =
            parse(r#"{"choices":[{"message":{"content":"","reasoning":"reasoned plan"}}]}"#);
        assert_eq!(
            extract_plan_text(&response).as_deref(),
            Some("reasoned plan")
        );
    }

    #[test]
    fn falls_back_to_reasoning_when_content_absent() {
        let response = parse(r#"{"choices":[{"message":{"reasoning":"reasoned plan"}}]}"#);
        assert_eq!(
            extract_plan_text(&response).as_deref(),
            Some("reasoned plan")
        );
    }

    #[test]
    fn falls_back_to_text_field() {
        let response = parse(r#"{"choices":[{"text":"legacy text"}]}"#);
        assert_eq!(extract_plan_text(&response).as_deref(), Some("legacy text"));
    }

    #[test]
    fn all_candidates_empty_yields_none() {
        let response =
            parse(r#"{"choices":[{"message":{"content":"  ","reasoning":""},"text":"\n"}]}"#);
        assert_eq!(extract_plan_text(&response), None);
    }

    #[test]
    fn no_choices_yields_none() {
        let response = parse(r#"{"choices":[]}"#);
        assert_eq!(extract_plan_text(&response), None);
    }

    #[test]
    fn missing_choices_field_deserializes() {
        let response = parse(r#"{"id":"cmpl-123"}"#);
        assert_eq!(extract_plan_text(&response), None);
    }

    #[test]
    fn extracted_text_is_trimmed() {
        let response = parse(r#"{"choices":[{"message":{"content":"  padded plan \n"}}]}"#);
        assert_eq!(extract_plan_text(&response).as_deref(), Some("padded plan"));
    }

    #[test]
    fn only_first_choice_is_considered() {
        let response = parse(
            r#"{"choices":[{"message":{"content":""}},{"message":{"content":"second choice"}}]}"#,
        );
        assert_eq!(extract_plan_text(&response), None);
    }
}
