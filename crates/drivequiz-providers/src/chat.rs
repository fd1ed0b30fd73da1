//! OpenAI-compatible chat completions wire format.
//!
//! Both OpenAI and DeepSeek accept the same request body at
//! `{base_url}/v1/chat/completions` with bearer authentication.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use drivequiz_core::traits::{GenerateRequest, GenerateResponse, TokenUsage};

use crate::error::ProviderError;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub(crate) fn build_client() -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Connection details for one OpenAI-compatible endpoint.
pub(crate) struct ChatEndpoint<'a> {
    pub client: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub extra_headers: Vec<(&'static str, String)>,
}

/// Send a single-turn chat completion and return the first choice.
pub(crate) async fn complete(
    endpoint: ChatEndpoint<'_>,
    request: &GenerateRequest,
) -> anyhow::Result<GenerateResponse> {
    let start = Instant::now();

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system_prompt {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: request.prompt.clone(),
    });

    let body = ChatRequest {
        model: request.model.clone(),
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    };

    let mut req = endpoint
        .client
        .post(format!(
            "{}/v1/chat/completions",
            endpoint.base_url.trim_end_matches('/')
        ))
        .header("Authorization", format!("Bearer {}", endpoint.api_key))
        .header("content-type", "application/json");

    for (name, value) in &endpoint.extra_headers {
        req = req.header(*name, value);
    }

    let response = req.json(&body).send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
        } else {
            ProviderError::NetworkError(e.to_string())
        }
    })?;

    let status = response.status().as_u16();
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        }
        .into());
    }
    if status == 401 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::AuthenticationFailed(body).into());
    }
    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status,
            message: body,
        }
        .into());
    }

    let api_response: ChatResponse =
        response.json().await.map_err(|e| ProviderError::ApiError {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

    let content = api_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ProviderError::EmptyCompletion)?;

    Ok(GenerateResponse {
        content,
        model: api_response
            .model
            .unwrap_or_else(|| request.model.clone()),
        token_usage: TokenUsage {
            prompt_tokens: api_response.usage.prompt_tokens,
            completion_tokens: api_response.usage.completion_tokens,
            total_tokens: api_response.usage.total_tokens,
        },
        latency_ms: start.elapsed().as_millis() as u64,
    })
}
