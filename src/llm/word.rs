//! Secret word generation prompt and verdict parsing

use super::{GenerateRequest, LlmError, LlmResult};
use serde::Deserialize;
use std::time::Duration;

/// Instructions for turning a free-text topic into a secret word
pub const WORD_SYSTEM_PROMPT: &str = r#"You are an expert board game designer.
Your task is to pick the secret word for the party game "The Impostor", based on a topic the players give you.

Validation rules:
1. The word must be a common noun or a very well-known proper name.
2. It must be easy to hint at with one word but not obvious (for the topic "Nature", "Water" is good, "H2O" is bad).
3. It must not be a phrase: a single word, or two for a short compound name.
4. It must be suitable for all audiences unless the topic is explicitly about adults.
5. If the topic is incoherent or inappropriate, set "valid" to false and explain why in "reason".

Answer ONLY with a JSON object of the form:
{"word": "<the word>", "valid": true|false, "reason": "<why it is not valid, if applicable>"}"#;

/// Most words allowed in a generated secret word
const MAX_WORD_PARTS: usize = 3;

/// The model's answer to a topic
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WordVerdict {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl WordVerdict {
    /// The usable word, if the verdict is positive and the word looks like a word
    pub fn accepted_word(&self) -> Option<String> {
        let word = self.word.trim();
        let parts = word.split_whitespace().count();
        (self.valid && !word.is_empty() && parts <= MAX_WORD_PARTS).then(|| word.to_string())
    }
}

/// Build the provider request for a topic
pub(super) fn word_request(topic: &str, timeout: Duration, max_tokens: u32) -> GenerateRequest {
    GenerateRequest {
        system_prompt: WORD_SYSTEM_PROMPT.to_string(),
        prompt: format!("Topic: \"{}\"", topic.trim()),
        max_tokens: Some(max_tokens),
        timeout,
        model_override: None,
        json_output: true,
    }
}

/// Parse the model output into a verdict.
///
/// Models like to wrap JSON in code fences or chatter around it, so this
/// looks for the outermost `{...}` before giving up.
pub fn parse_verdict(text: &str) -> LlmResult<WordVerdict> {
    let trimmed = text.trim();
    if let Ok(verdict) = serde_json::from_str::<WordVerdict>(trimmed) {
        return Ok(verdict);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str::<WordVerdict>(&trimmed[start..=end])
                .map_err(|e| LlmError::ParseError(e.to_string()))
        }
        _ => Err(LlmError::ParseError(format!(
            "No JSON object in response: {}",
            trimmed.chars().take(80).collect::<String>()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let verdict = parse_verdict(r#"{"word": "Penguin", "valid": true}"#).unwrap();
        assert_eq!(verdict.word, "Penguin");
        assert!(verdict.valid);
        assert_eq!(verdict.accepted_word().as_deref(), Some("Penguin"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Sure! Here it is:\n```json\n{\"word\": \" Lighthouse \", \"valid\": true}\n```";
        let verdict = parse_verdict(text).unwrap();
        assert_eq!(verdict.accepted_word().as_deref(), Some("Lighthouse"));
    }

    #[test]
    fn test_parse_rejection() {
        let verdict = parse_verdict(
            r#"{"word": "", "valid": false, "reason": "The topic is not coherent."}"#,
        )
        .unwrap();
        assert!(verdict.accepted_word().is_none());
        assert_eq!(verdict.reason.as_deref(), Some("The topic is not coherent."));
    }

    #[test]
    fn test_valid_but_empty_word_not_accepted() {
        let verdict = WordVerdict {
            word: "   ".to_string(),
            valid: true,
            reason: None,
        };
        assert!(verdict.accepted_word().is_none());
    }

    #[test]
    fn test_phrase_not_accepted() {
        let verdict = WordVerdict {
            word: "the tallest mountain in the world".to_string(),
            valid: true,
            reason: None,
        };
        assert!(verdict.accepted_word().is_none());

        let verdict = WordVerdict {
            word: "New York".to_string(),
            valid: true,
            reason: None,
        };
        assert_eq!(verdict.accepted_word().as_deref(), Some("New York"));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_verdict("no idea, sorry"),
            Err(LlmError::ParseError(_))
        ));
        assert!(matches!(
            parse_verdict("{not json}"),
            Err(LlmError::ParseError(_))
        ));
    }

    #[test]
    fn test_request_carries_topic_and_json_flag() {
        let request = word_request("  space travel ", Duration::from_secs(3), 40);
        assert_eq!(request.prompt, "Topic: \"space travel\"");
        assert!(request.json_output);
        assert_eq!(request.max_tokens, Some(40));
        assert!(request.system_prompt.contains("\"valid\""));
    }
}
