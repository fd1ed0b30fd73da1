//! Mock provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use drivequiz_core::traits::{
    GenerateRequest, GenerateResponse, ModelInfo, QuestionGenerator, TokenUsage,
};

use crate::error::ProviderError;

/// A mock generator that answers every request the same way.
pub struct MockProvider {
    /// Completion to return, or the network error to fail with.
    outcome: Result<String, String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a mock that always returns `response` as the completion.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock whose every call fails with a network error.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl QuestionGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let content = match &self.outcome {
            Ok(content) => content.clone(),
            Err(message) => return Err(ProviderError::NetworkError(message.clone()).into()),
        };

        let prompt_tokens = (request.prompt.len() / 4) as u32; // Rough estimate
        let completion_tokens = (content.len() / 4) as u32;

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("[]");
        let request = GenerateRequest::questions("mock-model", 0.7);

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.content, "[]");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().model, "mock-model");
    }

    #[tokio::test]
    async fn failing_provider() {
        let provider = MockProvider::failing("down");
        let request = GenerateRequest::questions("mock-model", 0.7);

        let err = provider.generate(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "network error: down");
    }
}
