//! drivequiz-core: question bank, batch selection, scoring, and history.
//!
//! This crate holds the quiz rules: how batches are drawn from the bank, how
//! a submission is scored, and how per-question outcomes are remembered
//! between sessions.

pub mod bank;
pub mod error;
pub mod history;
pub mod model;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod store;
pub mod traits;

pub use bank::QuestionBank;
pub use error::QuizError;
pub use history::HistoryStore;
pub use model::{AnswerSet, Batch, Question, BATCH_SIZE};
pub use scoring::{score, ScoreReport};
pub use session::QuizSession;
