//! The `drivequiz generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use drivequiz_core::traits::GenerateRequest;
use drivequiz_core::{QuestionBank, BATCH_SIZE};
use drivequiz_providers::config::load_config_from;
use drivequiz_providers::{create_provider, deepseek, generate_questions, openai, ProviderConfig};

pub async fn execute(
    provider_name: Option<String>,
    model: Option<String>,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let provider_name = provider_name.unwrap_or_else(|| config.default_provider.clone());
    let Some(provider_config) = config.providers.get(&provider_name) else {
        anyhow::bail!(
            "provider '{provider_name}' is not configured. Run `drivequiz init` or set DRIVEQUIZ_{}_KEY",
            provider_name.to_uppercase()
        );
    };

    let model = model.unwrap_or_else(|| {
        if provider_name == config.default_provider {
            config.default_model.clone()
        } else {
            match provider_config {
                ProviderConfig::OpenAI { .. } => openai::DEFAULT_MODEL.to_string(),
                ProviderConfig::DeepSeek { .. } => deepseek::DEFAULT_MODEL.to_string(),
            }
        }
    });

    let provider = create_provider(provider_config)?;
    let request = GenerateRequest::questions(&model, config.temperature);

    eprintln!("Requesting questions from {provider_name}/{model}...");
    let questions = generate_questions(provider.as_ref(), &request).await;

    if questions.is_empty() {
        println!("No questions were generated.");
        return Ok(());
    }

    let bank = QuestionBank::new(questions)?;
    std::fs::write(&output, bank.to_json_pretty()?)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote {} questions to {}", bank.len(), output.display());
    if bank.len() < BATCH_SIZE {
        println!("Note: a bank needs at least {BATCH_SIZE} questions to run a quiz.");
    }

    Ok(())
}
