//! Word sources: where the secret word comes from before a game starts.
//!
//! Manual and local pools resolve immediately and cannot fail (beyond an
//! empty entry or a locked mature category). Generated words go through the
//! configured LLM providers and may be rejected or unavailable.

mod gate;
mod pools;

pub use gate::MatureGate;
pub use pools::{pick_from, pick_random, random_pool, Category};

use crate::llm::LlmManager;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shown when the model turns a topic down without saying why
pub const DEFAULT_REJECTION: &str =
    "The topic you gave does not allow a valid word for the game. Try another one.";
/// Shown on transport failures; never leaks provider details to players
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the word generation service. Try a simpler topic or another mode.";

/// How the secret word should be chosen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WordRequest {
    /// Typed in by the group
    Manual { word: String },
    /// Any family-friendly word
    Random,
    /// A word from one themed list
    Category { category: Category },
    /// Generated by an LLM from a free-text topic
    Generated { topic: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordSourceError {
    #[error("Write a secret word or pick a random one")]
    EmptyWord,

    #[error("Write a topic for the word generator")]
    EmptyTopic,

    #[error("The adults-only category needs to be confirmed first")]
    MatureLocked,

    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Unavailable(String),
}

impl WordSourceError {
    /// Errors the player fixes by editing the pre-game form
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            WordSourceError::EmptyWord | WordSourceError::EmptyTopic | WordSourceError::MatureLocked
        )
    }
}

/// LLM-backed generator with its request budget
pub struct WordGenerator {
    manager: LlmManager,
    timeout: Duration,
    max_tokens: u32,
}

impl WordGenerator {
    pub fn new(manager: LlmManager, timeout: Duration, max_tokens: u32) -> Self {
        Self {
            manager,
            timeout,
            max_tokens,
        }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.manager.provider_names()
    }

    /// Turn a topic into a word, or a human-readable reason why not
    pub async fn generate(&self, topic: &str) -> Result<String, WordSourceError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(WordSourceError::EmptyTopic);
        }

        match self
            .manager
            .generate_word(topic, self.timeout, self.max_tokens)
            .await
        {
            Ok(verdict) => match verdict.accepted_word() {
                Some(word) => {
                    tracing::info!("Generated a secret word for topic {:?}", topic);
                    Ok(word)
                }
                None => {
                    let reason = verdict
                        .reason
                        .map(|r| r.trim().to_string())
                        .filter(|r| !r.is_empty())
                        .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
                    tracing::warn!("Topic {:?} rejected: {}", topic, reason);
                    Err(WordSourceError::Rejected(reason))
                }
            },
            Err(e) => {
                tracing::error!("Word generation failed: {}", e);
                Err(WordSourceError::Unavailable(CONNECTIVITY_MESSAGE.to_string()))
            }
        }
    }
}

/// Resolves a [`WordRequest`] into the secret word for the next game
pub struct WordResolver {
    generator: Option<WordGenerator>,
}

impl WordResolver {
    pub fn new(generator: Option<WordGenerator>) -> Self {
        Self { generator }
    }

    /// Resolver without word generation
    pub fn local_only() -> Self {
        Self { generator: None }
    }

    /// Providers that can generate words, empty when generation is off
    pub fn generation_providers(&self) -> Vec<String> {
        self.generator
            .as_ref()
            .map(WordGenerator::provider_names)
            .unwrap_or_default()
    }

    /// Resolve requests that need no network. Returns `None` for generated words.
    pub fn resolve_local<R: Rng + ?Sized>(
        &self,
        request: &WordRequest,
        gate: MatureGate,
        rng: &mut R,
    ) -> Option<Result<String, WordSourceError>> {
        let result = match request {
            WordRequest::Manual { word } => {
                let word = word.trim();
                if word.is_empty() {
                    Err(WordSourceError::EmptyWord)
                } else {
                    Ok(word.to_string())
                }
            }
            WordRequest::Random => pick_random(rng)
                .map(str::to_string)
                .ok_or(WordSourceError::EmptyWord),
            WordRequest::Category { category } => {
                if category.is_mature() && !gate.is_unlocked() {
                    Err(WordSourceError::MatureLocked)
                } else {
                    pick_from(category.words(), rng)
                        .map(str::to_string)
                        .ok_or(WordSourceError::EmptyWord)
                }
            }
            WordRequest::Generated { .. } => return None,
        };
        Some(result)
    }

    /// Resolve any request
    pub async fn resolve(
        &self,
        request: &WordRequest,
        gate: MatureGate,
    ) -> Result<String, WordSourceError> {
        let local = {
            let mut rng = rand::rng();
            self.resolve_local(request, gate, &mut rng)
        };
        if let Some(result) = local {
            return result;
        }

        let WordRequest::Generated { topic } = request else {
            return Err(WordSourceError::EmptyWord);
        };
        if topic.trim().is_empty() {
            return Err(WordSourceError::EmptyTopic);
        }
        match &self.generator {
            Some(generator) => generator.generate(topic).await,
            None => Err(WordSourceError::Unavailable(
                "Word generation is not configured on this device".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{
        GenerateRequest, GenerateResponse, LlmError, LlmProvider, LlmResult, ResponseMetadata,
    };
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedProvider(Result<&'static str, &'static str>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn generate(&self, _request: GenerateRequest) -> LlmResult<GenerateResponse> {
            match self.0 {
                Ok(text) => Ok(GenerateResponse {
                    text: text.to_string(),
                    metadata: ResponseMetadata {
                        provider: "fixed".to_string(),
                        model: "fixed".to_string(),
                        tokens_used: None,
                        latency_ms: 0,
                    },
                }),
                Err(e) => Err(LlmError::ApiError(e.to_string())),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn resolver(answer: Result<&'static str, &'static str>) -> WordResolver {
        let manager = LlmManager::new(vec![Box::new(FixedProvider(answer))]);
        WordResolver::new(Some(WordGenerator::new(
            manager,
            Duration::from_secs(1),
            60,
        )))
    }

    #[tokio::test]
    async fn test_manual_word_trimmed() {
        let words = WordResolver::local_only();
        let word = words
            .resolve(
                &WordRequest::Manual {
                    word: "  Lighthouse ".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap();
        assert_eq!(word, "Lighthouse");
    }

    #[tokio::test]
    async fn test_manual_empty_word_rejected() {
        let words = WordResolver::local_only();
        let err = words
            .resolve(
                &WordRequest::Manual {
                    word: "   ".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap_err();
        assert_eq!(err, WordSourceError::EmptyWord);
        assert!(err.is_config_error());
    }

    #[test]
    fn test_category_pick_is_from_category() {
        let words = WordResolver::local_only();
        let mut rng = StdRng::seed_from_u64(8);
        let word = words
            .resolve_local(
                &WordRequest::Category {
                    category: Category::Sports,
                },
                MatureGate::Locked,
                &mut rng,
            )
            .unwrap()
            .unwrap();
        assert!(Category::Sports.words().contains(&word.as_str()));
    }

    #[test]
    fn test_adult_category_needs_unlocked_gate() {
        let words = WordResolver::local_only();
        let mut rng = StdRng::seed_from_u64(8);
        let request = WordRequest::Category {
            category: Category::Adult,
        };

        for gate in [
            MatureGate::Locked,
            MatureGate::FirstWarning,
            MatureGate::SecondWarning,
        ] {
            let result = words.resolve_local(&request, gate, &mut rng).unwrap();
            assert_eq!(result, Err(WordSourceError::MatureLocked));
        }

        let word = words
            .resolve_local(&request, MatureGate::Unlocked, &mut rng)
            .unwrap()
            .unwrap();
        assert!(Category::Adult.words().contains(&word.as_str()));
    }

    #[test]
    fn test_generated_is_not_local() {
        let words = WordResolver::local_only();
        let mut rng = StdRng::seed_from_u64(1);
        let request = WordRequest::Generated {
            topic: "space".to_string(),
        };
        assert!(words
            .resolve_local(&request, MatureGate::Locked, &mut rng)
            .is_none());
    }

    #[tokio::test]
    async fn test_generated_without_generator_is_unavailable() {
        let words = WordResolver::local_only();
        let err = words
            .resolve(
                &WordRequest::Generated {
                    topic: "space".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WordSourceError::Unavailable(_)));
        assert!(words.generation_providers().is_empty());
    }

    #[tokio::test]
    async fn test_generated_empty_topic() {
        let words = resolver(Ok(r#"{"word": "Mars", "valid": true}"#));
        let err = words
            .resolve(
                &WordRequest::Generated {
                    topic: "  ".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap_err();
        assert_eq!(err, WordSourceError::EmptyTopic);
    }

    #[tokio::test]
    async fn test_generated_word_accepted() {
        let words = resolver(Ok(r#"{"word": "Mars", "valid": true}"#));
        let word = words
            .resolve(
                &WordRequest::Generated {
                    topic: "planets".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap();
        assert_eq!(word, "Mars");
        assert_eq!(words.generation_providers(), vec!["fixed"]);
    }

    #[tokio::test]
    async fn test_generated_rejection_carries_reason() {
        let words = resolver(Ok(
            r#"{"word": "", "valid": false, "reason": "That topic is not appropriate."}"#,
        ));
        let err = words
            .resolve(
                &WordRequest::Generated {
                    topic: "something bad".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WordSourceError::Rejected("That topic is not appropriate.".to_string())
        );
        assert!(!err.is_config_error());
    }

    #[tokio::test]
    async fn test_generated_rejection_default_reason() {
        let words = resolver(Ok(r#"{"word": "x", "valid": false}"#));
        let err = words
            .resolve(
                &WordRequest::Generated {
                    topic: "qwerty".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap_err();
        assert_eq!(err, WordSourceError::Rejected(DEFAULT_REJECTION.to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_message() {
        let words = resolver(Err("connection reset by peer"));
        let err = words
            .resolve(
                &WordRequest::Generated {
                    topic: "planets".to_string(),
                },
                MatureGate::Locked,
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WordSourceError::Unavailable(CONNECTIVITY_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_word_request_wire_format() {
        let request: WordRequest =
            serde_json::from_str(r#"{"mode": "category", "category": "ANIMALS"}"#).unwrap();
        assert_eq!(
            request,
            WordRequest::Category {
                category: Category::Animals
            }
        );
        let request: WordRequest = serde_json::from_str(r#"{"mode": "random"}"#).unwrap();
        assert_eq!(request, WordRequest::Random);
    }
}
