use super::*;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use std::time::Instant;

/// OpenAI provider implementation
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with the given API key and model
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        Self { client, model }
    }

    /// Chat completion request for the given prompt, using the override model if set
    fn chat_request(&self, request: &GenerateRequest) -> LlmResult<CreateChatCompletionRequest> {
        let user_message = ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
            name: None,
        };

        // Use model override if provided, otherwise use configured model
        let model = request
            .model_override
            .clone()
            .unwrap_or_else(|| self.model.clone());

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder.model(&model).messages([
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt.as_str())
                .build()
                .map_err(|e| LlmError::ApiError(e.to_string()))?
                .into(),
            user_message.into(),
        ]);

        if let Some(max_tokens) = request.max_tokens {
            req_builder.max_tokens(max_tokens);
        }

        if request.json_output {
            req_builder.response_format(ResponseFormat::JsonObject);
        }

        req_builder
            .build()
            .map_err(|e| LlmError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, request: GenerateRequest) -> LlmResult<GenerateResponse> {
        let start = Instant::now();

        let chat_request = self.chat_request(&request)?;
        let model = chat_request.model.clone();

        // Execute with timeout
        let response =
            tokio::time::timeout(request.timeout, self.client.chat().create(chat_request))
                .await
                .map_err(|_| LlmError::Timeout(request.timeout))?
                .map_err(|e| LlmError::ApiError(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::ParseError("No content in response".to_string()))?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let tokens_used = response.usage.map(|u| u.total_tokens);

        Ok(GenerateResponse {
            text: text.trim().to_string(),
            metadata: ResponseMetadata {
                provider: "openai".to_string(),
                model,
                tokens_used,
                latency_ms,
            },
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn word_request(json_output: bool) -> GenerateRequest {
        GenerateRequest {
            system_prompt: "Answer with JSON".to_string(),
            prompt: "Topic: space".to_string(),
            max_tokens: Some(60),
            timeout: Duration::from_secs(5),
            model_override: None,
            json_output,
        }
    }

    #[test]
    fn test_json_output_sets_response_format() {
        let provider = OpenAiProvider::new("test-key".to_string(), "gpt-4o-mini".to_string());

        let chat_request = provider.chat_request(&word_request(true)).unwrap();
        assert_eq!(chat_request.response_format, Some(ResponseFormat::JsonObject));
        assert_eq!(chat_request.model, "gpt-4o-mini");

        let chat_request = provider.chat_request(&word_request(false)).unwrap();
        assert!(chat_request.response_format.is_none());
    }

    #[test]
    fn test_model_override_wins() {
        let provider = OpenAiProvider::new("test-key".to_string(), "gpt-4o-mini".to_string());
        let mut request = word_request(true);
        request.model_override = Some("gpt-4o".to_string());

        let chat_request = provider.chat_request(&request).unwrap();
        assert_eq!(chat_request.model, "gpt-4o");
    }

    #[tokio::test]
    #[ignore] // Only run with actual API key
    async fn test_openai_generate_word() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let provider = OpenAiProvider::new(api_key, "gpt-4o-mini".to_string());
        let manager = LlmManager::new(vec![Box::new(provider)]);

        let verdict = manager
            .generate_word("famous painters", Duration::from_secs(30), 60)
            .await
            .unwrap();

        assert!(verdict.valid);
        assert!(verdict.accepted_word().is_some());
        println!("Generated word: {:?}", verdict);
    }

    #[tokio::test]
    #[ignore] // Only run with actual API key
    async fn test_openai_rejects_nonsense_topic() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let provider = OpenAiProvider::new(api_key, "gpt-4o-mini".to_string());
        let manager = LlmManager::new(vec![Box::new(provider)]);

        let verdict = manager
            .generate_word("asdkjh qweoiu zzz", Duration::from_secs(30), 60)
            .await
            .unwrap();

        assert!(verdict.accepted_word().is_none());
        println!("Rejection: {:?}", verdict.reason);
    }
}
