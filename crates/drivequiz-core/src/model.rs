//! Core data model types for drivequiz.
//!
//! Questions come from a static bank, a batch is the ordered set of questions
//! on screen, and the answer set pairs one selection with each batch slot.

use std::hash::{Hash, Hasher};
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Number of questions in a full batch.
pub const BATCH_SIZE: usize = 30;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Correct answers needed out of a full batch to pass.
pub const PASS_MARK: usize = 21;

/// A single multiple-choice question.
///
/// Equality and hashing use the identifier only, so two records with the same
/// id are the same question even if their text differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable identifier, unique within a bank.
    pub id: String,
    /// The question text.
    pub question: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_index: usize,
    /// Optional illustration (path or URL).
    #[serde(default)]
    pub image: Option<String>,
}

impl Question {
    /// Check the record's structural invariants.
    pub fn check(&self) -> Result<(), QuizError> {
        if self.options.len() != OPTION_COUNT {
            return Err(QuizError::OptionCount {
                id: self.id.clone(),
                count: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(QuizError::InvalidCorrectIndex {
                id: self.id.clone(),
                index: self.correct_index,
                options: self.options.len(),
            });
        }
        Ok(())
    }

    /// Whether `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Question {}

impl Hash for Question {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The ordered questions currently presented to the user.
///
/// A batch normally holds [`BATCH_SIZE`] questions; a retry with too few
/// eligible candidates produces a shorter one (see [`Batch::is_short`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    questions: Vec<Question>,
}

impl Batch {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// True when the batch holds fewer than [`BATCH_SIZE`] questions.
    pub fn is_short(&self) -> bool {
        self.questions.len() < BATCH_SIZE
    }

    pub fn get(&self, slot: usize) -> Option<&Question> {
        self.questions.get(slot)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.questions.iter().any(|q| q.id == id)
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

impl Index<usize> for Batch {
    type Output = Question;

    fn index(&self, slot: usize) -> &Question {
        &self.questions[slot]
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// One selection per batch slot; `None` means unanswered.
///
/// Entries are only ever `None` or a valid option index for the question in
/// the same slot: [`AnswerSet::select`] rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: Vec<Option<usize>>,
}

impl AnswerSet {
    /// An all-unanswered set sized for `batch`.
    pub fn for_batch(batch: &Batch) -> Self {
        Self {
            answers: vec![None; batch.len()],
        }
    }

    /// Build an answer set directly from raw selections.
    pub fn from_selections(answers: Vec<Option<usize>>) -> Self {
        Self { answers }
    }

    /// Record a single-choice selection for `slot`.
    pub fn select(&mut self, batch: &Batch, slot: usize, option: usize) -> Result<(), QuizError> {
        let question = batch.get(slot).ok_or(QuizError::InvalidSlot {
            slot,
            len: batch.len(),
        })?;
        if option >= question.options.len() {
            return Err(QuizError::InvalidOption { slot, option });
        }
        match self.answers.get_mut(slot) {
            Some(entry) => *entry = Some(option),
            None => {
                return Err(QuizError::InvalidSlot {
                    slot,
                    len: self.answers.len(),
                })
            }
        }
        Ok(())
    }

    /// The selection for `slot`, if answered.
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.answers.get(slot).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.unanswered() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, correct: usize) -> Question {
        Question {
            id: id.into(),
            question: format!("Question {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: correct,
            image: None,
        }
    }

    #[test]
    fn question_json_uses_camel_case() {
        let json = r#"{
            "id": "q1",
            "question": "What does a red light mean?",
            "options": ["Stop", "Go", "Slow down", "Honk"],
            "correctIndex": 0,
            "image": null
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_index, 0);
        assert!(q.image.is_none());
        assert!(q.check().is_ok());

        let out = serde_json::to_string(&q).unwrap();
        assert!(out.contains("\"correctIndex\":0"));
    }

    #[test]
    fn image_field_is_optional() {
        let json = r#"{"id":"q2","question":"?","options":["a","b","c","d"],"correctIndex":3}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.image.is_none());
    }

    #[test]
    fn identity_is_by_id() {
        let mut a = question("same", 0);
        let b = question("same", 2);
        a.question = "different text".into();
        assert_eq!(a, b);
        assert_ne!(question("x", 0), question("y", 0));
    }

    #[test]
    fn check_rejects_bad_records() {
        let mut q = question("q", 4);
        assert!(matches!(
            q.check(),
            Err(QuizError::InvalidCorrectIndex { index: 4, .. })
        ));
        q.correct_index = 0;
        q.options.pop();
        assert!(matches!(q.check(), Err(QuizError::OptionCount { count: 3, .. })));
    }

    #[test]
    fn answer_set_rejects_invalid_selections() {
        let batch = Batch::new(vec![question("a", 0), question("b", 1)]);
        let mut answers = AnswerSet::for_batch(&batch);
        assert_eq!(answers.unanswered(), 2);

        answers.select(&batch, 1, 3).unwrap();
        assert_eq!(answers.get(1), Some(3));
        assert_eq!(
            answers.select(&batch, 2, 0),
            Err(QuizError::InvalidSlot { slot: 2, len: 2 })
        );
        assert_eq!(
            answers.select(&batch, 0, 4),
            Err(QuizError::InvalidOption { slot: 0, option: 4 })
        );
        assert_eq!(answers.get(0), None);
        assert!(!answers.is_complete());

        answers.select(&batch, 0, 0).unwrap();
        assert!(answers.is_complete());
    }

    #[test]
    fn batch_reports_short() {
        let batch = Batch::new(vec![question("a", 0)]);
        assert!(batch.is_short());
        assert!(batch.contains_id("a"));
        assert!(!batch.contains_id("b"));
    }
}
