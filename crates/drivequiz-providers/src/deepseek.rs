//! DeepSeek API provider implementation.
//!
//! DeepSeek serves the OpenAI chat completions format from its own host.

use async_trait::async_trait;
use tracing::instrument;

use drivequiz_core::traits::{GenerateRequest, GenerateResponse, ModelInfo, QuestionGenerator};

use crate::chat::{build_client, complete, ChatEndpoint};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default model for question generation.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// DeepSeek chat completions provider.
pub struct DeepSeekProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl DeepSeekProvider {
    pub fn new(api_key: &str, base_url: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: build_client()?,
        })
    }
}

#[async_trait]
impl QuestionGenerator for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        complete(
            ChatEndpoint {
                client: &self.client,
                base_url: &self.base_url,
                api_key: &self.api_key,
                extra_headers: Vec::new(),
            },
            request,
        )
        .await
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "deepseek-chat".into(),
                name: "DeepSeek Chat".into(),
                provider: "deepseek".into(),
                max_context: 64_000,
            },
            ModelInfo {
                id: "deepseek-reasoner".into(),
                name: "DeepSeek Reasoner".into(),
                provider: "deepseek".into(),
                max_context: 64_000,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivequiz_core::traits::DEFAULT_TEMPERATURE;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let content = r#"[{"question": "q", "options": ["a: 1", "b: 2", "c: 3", "d: 4"], "correctIndex": 1}]"#;
        let response_body = serde_json::json!({
            "choices": [{"message": {"content": content, "role": "assistant"}, "index": 0}],
            "model": "deepseek-chat",
            "usage": {"prompt_tokens": 100, "completion_tokens": 40, "total_tokens": 140}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer ds-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = DeepSeekProvider::new("ds-key", Some(server.uri())).unwrap();
        let request = GenerateRequest::questions(DEFAULT_MODEL, DEFAULT_TEMPERATURE);

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.content, content);
        assert_eq!(response.model, "deepseek-chat");
    }

    #[tokio::test]
    async fn rate_limited_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let provider = DeepSeekProvider::new("key", Some(server.uri())).unwrap();
        let request = GenerateRequest::questions(DEFAULT_MODEL, DEFAULT_TEMPERATURE);

        let err = provider.generate(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited, retry after 3000ms");
    }
}
