//! Quiz error types.
//!
//! These errors cover invalid question data and operations that are not
//! allowed in the current session state. Persistence failures are not
//! represented here: the history store degrades to memory instead of failing.

use thiserror::Error;

/// Errors raised by the question bank, the selection engine, and the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// The bank cannot fill a single batch.
    #[error("question bank has {available} questions, at least {required} are needed")]
    BankTooSmall { required: usize, available: usize },

    /// Two records share the same identifier.
    #[error("duplicate question id: {0}")]
    DuplicateId(String),

    /// A record does not have exactly four options.
    #[error("question {id} has {count} options, expected 4")]
    OptionCount { id: String, count: usize },

    /// A record's correct index does not point into its options.
    #[error("question {id} has correct index {index} but only {options} options")]
    InvalidCorrectIndex {
        id: String,
        index: usize,
        options: usize,
    },

    /// An answer was given for a slot outside the batch.
    #[error("slot {slot} is outside the batch of {len} questions")]
    InvalidSlot { slot: usize, len: usize },

    /// An answer referenced an option that the question does not have.
    #[error("option {option} is not valid for slot {slot}")]
    InvalidOption { slot: usize, option: usize },

    /// Submit was requested on a batch with no questions.
    #[error("the batch has no questions to submit")]
    EmptyBatch,

    /// Submit was requested before every slot had an answer.
    #[error("{unanswered} question(s) still unanswered")]
    Incomplete { unanswered: usize },

    /// Retry was requested without a submission that had wrong answers.
    #[error("no wrong answers to retry")]
    NothingToRetry,
}
