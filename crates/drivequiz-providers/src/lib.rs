//! drivequiz-providers: remote question generation.
//!
//! Implements the `QuestionGenerator` trait for OpenAI and DeepSeek, and
//! turns their completions into question records.

mod chat;
pub mod config;
pub mod deepseek;
pub mod error;
pub mod generation;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config, DriveQuizConfig, ProviderConfig};
pub use error::ProviderError;
pub use generation::{generate_questions, parse_generated_questions};
