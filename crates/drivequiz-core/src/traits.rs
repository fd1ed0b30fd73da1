//! Trait definition for remote question generators.
//!
//! The async trait is implemented by the `drivequiz-providers` crate. Output
//! from a generator is untrusted and is only turned into [`Question`] records
//! after shape checks.
//!
//! [`Question`]: crate::model::Question

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Question generator trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that write new questions from a prompt.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a prompt and return the raw completion.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// Models this provider is known to serve.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request for a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-3.5-turbo").
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate, if the provider should cap it.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    /// The fixed question-generation prompt for `model`.
    pub fn questions(model: &str, temperature: f64) -> Self {
        Self {
            model: model.to_string(),
            prompt: GENERATION_PROMPT.to_string(),
            system_prompt: None,
            temperature,
            max_tokens: None,
        }
    }
}

/// Raw completion returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The completion text.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Default sampling temperature for question generation.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Prompt asking for a full batch of questions as a JSON array.
pub const GENERATION_PROMPT: &str = r#"Write 30 multiple-choice questions for the DETRAN 2025 driving licence theory exam.
Each question must have:
- A clear question text.
- Exactly 4 options.
- The index of the correct option (0 to 3).

Answer with JSON only, in this format:
[
  {
    "question": "What is the maximum speed on an urban arterial road?",
    "options": ["30 km/h", "50 km/h", "60 km/h", "80 km/h"],
    "correctIndex": 2
  }
]"#;

// ---------------------------------------------------------------------------
// Markdown JSON extraction
// ---------------------------------------------------------------------------

/// Extract a JSON payload from a possibly markdown-formatted completion.
///
/// Handles:
/// - A ```json``` block (the first one wins)
/// - A generic ``` block if no json block is present
/// - Raw text with no fences (returned trimmed)
pub fn extract_json_from_markdown(response: &str) -> String {
    let mut json_block: Option<String> = None;
    let mut generic_block: Option<String> = None;
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block && json_block.is_none() {
                json_block = Some(current_block.clone());
            } else if is_generic_block && generic_block.is_none() {
                generic_block = Some(current_block.clone());
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // Truncated (unclosed) block
    if in_block && !current_block.is_empty() {
        if is_json_block && json_block.is_none() {
            json_block = Some(current_block);
        } else if is_generic_block && generic_block.is_none() {
            generic_block = Some(current_block);
        }
    }

    json_block
        .or(generic_block)
        .unwrap_or_else(|| response.trim().to_string())
}
