//! Quiz session controller.
//!
//! Owns the current batch, the answer set, and the last submission. Batch
//! changes always replace the batch and its answers together.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::history::HistoryStore;
use crate::model::{AnswerSet, Batch, Question};
use crate::scoring::{score, ScoreReport};
use crate::selection::{fresh_batch, preference_batch, retry_batch};

/// A scored submission of the current batch.
#[derive(Debug, Clone)]
pub struct Submission {
    pub report: ScoreReport,
    pub submitted_at: DateTime<Utc>,
}

/// The active quiz: one batch, its answers, and at most one submission.
#[derive(Debug, Clone)]
pub struct QuizSession {
    batch: Batch,
    answers: AnswerSet,
    submission: Option<Submission>,
}

impl QuizSession {
    /// Start with a fresh random batch.
    pub fn start<R: Rng + ?Sized>(bank: &QuestionBank, rng: &mut R) -> Result<Self, QuizError> {
        Ok(Self::with_batch(fresh_batch(bank.questions(), rng)?))
    }

    /// Start with a batch that honours the history preference.
    pub fn start_filtered<R: Rng + ?Sized>(
        bank: &QuestionBank,
        history: &HistoryStore,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        let batch = preference_batch(
            bank.questions(),
            history.correct_ids(),
            history.get_preference(),
            rng,
        )?;
        Ok(Self::with_batch(batch))
    }

    /// Start from an existing batch, all unanswered.
    pub fn with_batch(batch: Batch) -> Self {
        let answers = AnswerSet::for_batch(&batch);
        Self {
            batch,
            answers,
            submission: None,
        }
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn question(&self, slot: usize) -> Option<&Question> {
        self.batch.get(slot)
    }

    /// Replace the batch with a fresh random one.
    pub fn new_batch<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        *self = Self::start(bank, rng)?;
        Ok(())
    }

    /// Select `option` for `slot`.
    pub fn answer(&mut self, slot: usize, option: usize) -> Result<(), QuizError> {
        self.answers.select(&self.batch, slot, option)
    }

    /// True once every slot has an answer.
    pub fn can_submit(&self) -> bool {
        !self.batch.is_empty() && self.answers.is_complete()
    }

    /// Score the batch and record each question's outcome in `history`.
    pub fn submit(&mut self, history: &mut HistoryStore) -> Result<&Submission, QuizError> {
        if self.batch.is_empty() {
            return Err(QuizError::EmptyBatch);
        }
        let unanswered = self.answers.unanswered();
        if unanswered > 0 {
            return Err(QuizError::Incomplete { unanswered });
        }

        let report = score(&self.batch, &self.answers);
        for (slot, question) in self.batch.iter().enumerate() {
            history.record_outcome(&question.id, !report.wrong_indexes.contains(&slot));
        }
        tracing::info!(
            correct = report.correct_count,
            total = report.total(),
            "batch submitted"
        );

        Ok(self.submission.insert(Submission {
            report,
            submitted_at: Utc::now(),
        }))
    }

    /// True after a submission with at least one wrong answer.
    pub fn can_retry(&self) -> bool {
        self.submission
            .as_ref()
            .is_some_and(|s| s.report.has_wrong())
    }

    /// Replace the batch with one built around the last wrong answers.
    pub fn retry<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        history: &HistoryStore,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        let wrong_indexes = match &self.submission {
            Some(s) if s.report.has_wrong() => s.report.wrong_indexes.clone(),
            _ => return Err(QuizError::NothingToRetry),
        };
        let batch = retry_batch(
            bank.questions(),
            &self.batch,
            &wrong_indexes,
            history.correct_ids(),
            history.get_preference(),
            rng,
        );
        *self = Self::with_batch(batch);
        Ok(())
    }
}
