//! The `drivequiz init` command.

use std::path::Path;

use anyhow::Result;

use drivequiz_core::QuestionBank;

pub fn execute() -> Result<()> {
    if Path::new("drivequiz.toml").exists() {
        println!("drivequiz.toml already exists, skipping.");
    } else {
        std::fs::write("drivequiz.toml", SAMPLE_CONFIG)?;
        println!("Created drivequiz.toml");
    }

    let bank_path = Path::new("questions.json");
    if bank_path.exists() {
        println!("questions.json already exists, skipping.");
    } else {
        std::fs::write(bank_path, QuestionBank::builtin()?.to_json_pretty()?)?;
        println!("Created questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit drivequiz.toml with your API keys (only needed for `generate`)");
    println!("  2. Run: drivequiz validate --bank questions.json");
    println!("  3. Run: drivequiz take");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# drivequiz configuration

default_provider = "openai"
default_model = "gpt-3.5-turbo"
temperature = 0.7
bank_path = "questions.json"
# storage_path = "drivequiz-storage.json"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.deepseek]
type = "deepseek"
api_key = "${DEEPSEEK_API_KEY}"
"#;
