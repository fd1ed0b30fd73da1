//! Scoring of a submitted answer set against its batch.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerSet, Batch, BATCH_SIZE, PASS_MARK};

/// Outcome of scoring one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Number of slots answered correctly.
    pub correct_count: usize,
    /// Slots answered wrongly or left unanswered, in ascending order.
    pub wrong_indexes: Vec<usize>,
}

impl ScoreReport {
    /// Number of scored slots.
    pub fn total(&self) -> usize {
        self.correct_count + self.wrong_indexes.len()
    }

    /// Correct answers as a whole percentage, rounded half up.
    pub fn percentage(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.correct_count * 200 + total) / (total * 2)) as u32
    }

    /// Correct answers needed to pass a batch of this size.
    pub fn pass_mark(&self) -> usize {
        pass_mark_for(self.total())
    }

    pub fn passed(&self) -> bool {
        self.total() > 0 && self.correct_count >= self.pass_mark()
    }

    pub fn has_wrong(&self) -> bool {
        !self.wrong_indexes.is_empty()
    }
}

/// [`PASS_MARK`] out of [`BATCH_SIZE`], scaled up for other sizes.
pub fn pass_mark_for(total: usize) -> usize {
    (total * PASS_MARK).div_ceil(BATCH_SIZE)
}

/// Score `answers` against `batch`.
///
/// Every slot of the batch is scored: an unanswered slot, or one missing
/// from `answers`, counts as wrong.
pub fn score(batch: &Batch, answers: &AnswerSet) -> ScoreReport {
    let mut correct_count = 0;
    let mut wrong_indexes = Vec::new();

    for (slot, question) in batch.iter().enumerate() {
        match answers.get(slot) {
            Some(option) if question.is_correct(option) => correct_count += 1,
            _ => wrong_indexes.push(slot),
        }
    }

    ScoreReport {
        correct_count,
        wrong_indexes,
    }
}
