//! Turning model completions into question records.
//!
//! A completion is untrusted input. Anything that fails to parse yields no
//! questions, and individual records with the wrong shape are dropped.

use serde::Deserialize;

use drivequiz_core::model::{Question, OPTION_COUNT};
use drivequiz_core::traits::{extract_json_from_markdown, GenerateRequest, QuestionGenerator};

/// A record as the model is asked to write it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    question: String,
    options: Vec<String>,
    correct_index: usize,
    #[serde(default)]
    image: Option<String>,
}

/// Ask `provider` for questions, degrading to an empty list on any failure.
pub async fn generate_questions(
    provider: &dyn QuestionGenerator,
    request: &GenerateRequest,
) -> Vec<Question> {
    let response = match provider.generate(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                "question generation via {} failed: {e:#}",
                provider.name()
            );
            return Vec::new();
        }
    };

    match parse_generated_questions(&response.content) {
        Ok(questions) => {
            tracing::info!(
                provider = provider.name(),
                model = %response.model,
                count = questions.len(),
                latency_ms = response.latency_ms,
                "generated questions"
            );
            questions
        }
        Err(e) => {
            tracing::error!(
                "could not interpret {} response as questions: {e:#}",
                provider.name()
            );
            Vec::new()
        }
    }
}

/// Parse a completion into questions with fresh identifiers.
///
/// Fails only if the payload is not a JSON array; malformed records inside
/// the array are skipped with a warning.
pub fn parse_generated_questions(content: &str) -> anyhow::Result<Vec<Question>> {
    let payload = extract_json_from_markdown(content);
    let raw: Vec<serde_json::Value> = serde_json::from_str(&payload)?;

    let mut questions = Vec::with_capacity(raw.len());
    for (position, value) in raw.into_iter().enumerate() {
        let generated: GeneratedQuestion = match serde_json::from_value(value) {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!("skipping generated record {position}: {e}");
                continue;
            }
        };

        let question = Question {
            id: uuid::Uuid::new_v4().to_string(),
            question: generated.question.trim().to_string(),
            options: generated
                .options
                .iter()
                .map(|o| strip_option_label(o).to_string())
                .collect(),
            correct_index: generated.correct_index,
            image: generated.image.filter(|i| !i.trim().is_empty()),
        };

        if question.question.is_empty() {
            tracing::warn!("skipping generated record {position}: empty question text");
            continue;
        }
        if let Err(e) = question.check() {
            tracing::warn!("skipping generated record {position}: {e}");
            continue;
        }
        questions.push(question);
    }

    Ok(questions)
}

/// Remove a leading option letter such as `"a: "`, `"B) "` or `"c. "`.
fn strip_option_label(option: &str) -> &str {
    let trimmed = option.trim();
    let mut chars = trimmed.chars();
    let (Some(letter), Some(sep)) = (chars.next(), chars.next()) else {
        return trimmed;
    };
    let is_label = letter.is_ascii_alphabetic()
        && (letter.to_ascii_lowercase() as u8) < b'a' + OPTION_COUNT as u8
        && matches!(sep, ':' | ')' | '.' | '-');
    if is_label && chars.as_str().starts_with(' ') {
        chars.as_str().trim_start()
    } else {
        trimmed
    }
}
