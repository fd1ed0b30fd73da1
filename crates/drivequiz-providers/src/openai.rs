//! OpenAI API provider implementation.

use async_trait::async_trait;
use tracing::instrument;

use drivequiz_core::traits::{GenerateRequest, GenerateResponse, ModelInfo, QuestionGenerator};

use crate::chat::{build_client, complete, ChatEndpoint};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model for question generation.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI chat completions provider.
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            client: build_client()?,
        })
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let mut extra_headers = Vec::new();
        if let Some(org) = &self.org_id {
            extra_headers.push(("OpenAI-Organization", org.clone()));
        }

        complete(
            ChatEndpoint {
                client: &self.client,
                base_url: &self.base_url,
                api_key: &self.api_key,
                extra_headers,
            },
            request,
        )
        .await
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gpt-3.5-turbo".into(),
                name: "GPT-3.5 Turbo".into(),
                provider: "openai".into(),
                max_context: 16_385,
            },
            ModelInfo {
                id: "gpt-4o-mini".into(),
                name: "GPT-4o Mini".into(),
                provider: "openai".into(),
                max_context: 128_000,
            },
            ModelInfo {
                id: "gpt-4.1".into(),
                name: "GPT-4.1".into(),
                provider: "openai".into(),
                max_context: 1_000_000,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivequiz_core::traits::DEFAULT_TEMPERATURE;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "[]", "role": "assistant"}, "index": 0}],
            "model": "gpt-3.5-turbo",
            "usage": {"prompt_tokens": 120, "completion_tokens": 2, "total_tokens": 122}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.7
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("test-key", Some(server.uri()), None).unwrap();
        let request = GenerateRequest::questions(DEFAULT_MODEL, DEFAULT_TEMPERATURE);

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.content, "[]");
        assert_eq!(response.token_usage.total_tokens, 122);
    }

    #[tokio::test]
    async fn sends_organization_header() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "ok", "role": "assistant"}, "index": 0}],
            "model": "gpt-4o-mini"
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("OpenAI-Organization", "org-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider =
            OpenAiProvider::new("key", Some(server.uri()), Some("org-1".into())).unwrap();
        let request = GenerateRequest::questions("gpt-4o-mini", 0.0);

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.model, "gpt-4o-mini");
        assert_eq!(response.token_usage.total_tokens, 0);
    }

    #[tokio::test]
    async fn error_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("key", Some(server.uri()), None).unwrap();
        let request = GenerateRequest::questions(DEFAULT_MODEL, DEFAULT_TEMPERATURE);

        let err = provider.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn unauthorized_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("wrong", Some(server.uri()), None).unwrap();
        let request = GenerateRequest::questions(DEFAULT_MODEL, DEFAULT_TEMPERATURE);

        let err = provider.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("key", Some(server.uri()), None).unwrap();
        let request = GenerateRequest::questions(DEFAULT_MODEL, DEFAULT_TEMPERATURE);

        let err = provider.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("no completion"));
    }
}
