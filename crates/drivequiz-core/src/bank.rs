//! Question bank loading and validation.
//!
//! A bank is a JSON array of question records. The bundled bank is embedded
//! at build time; other banks are read from disk.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::QuizError;
use crate::model::{Question, BATCH_SIZE};

const BUILTIN_BANK: &str = include_str!("../data/questions.json");

/// Read-only collection of question records.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
}

impl QuestionBank {
    /// Build a bank, rejecting duplicate ids and malformed records.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut by_id = HashMap::with_capacity(questions.len());
        for (idx, question) in questions.iter().enumerate() {
            question.check()?;
            if by_id.insert(question.id.clone(), idx).is_some() {
                return Err(QuizError::DuplicateId(question.id.clone()));
            }
        }
        Ok(Self { questions, by_id })
    }

    /// The bank bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_BANK).context("bundled question bank is invalid")
    }

    /// Parse a bank from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let questions: Vec<Question> =
            serde_json::from_str(content).context("failed to parse question bank JSON")?;
        Ok(Self::new(questions)?)
    }

    /// Load a bank from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question bank: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("invalid question bank: {}", path.display()))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.by_id.get(id).map(|&idx| &self.questions[idx])
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Serialize the bank back to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.questions).context("failed to serialize question bank")
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for problems that do not prevent loading it.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.len() < BATCH_SIZE {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!(
                "bank has {} questions, fewer than one batch of {BATCH_SIZE}",
                bank.len()
            ),
        });
    }

    for question in bank.questions() {
        if question.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "question text is empty".into(),
            });
        }

        if question.options.iter().any(|o| o.trim().is_empty()) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "an option is empty".into(),
            });
        }

        let mut seen = HashSet::new();
        if !question.options.iter().all(|o| seen.insert(o.trim())) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "options contain duplicates".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_BANK: &str = r#"[
        {"id": "a", "question": "First?", "options": ["1", "2", "3", "4"], "correctIndex": 0},
        {"id": "b", "question": "Second?", "options": ["1", "2", "3", "4"], "correctIndex": 3, "image": "signs/stop.png"}
    ]"#;

    #[test]
    fn builtin_bank_is_valid() {
        let bank = QuestionBank::builtin().unwrap();
        assert!(bank.len() >= BATCH_SIZE);
        let warnings = validate_bank(&bank);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn parse_and_lookup() {
        let bank = QuestionBank::from_json_str(SMALL_BANK).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get("b").unwrap().correct_index, 3);
        assert_eq!(
            bank.get("b").unwrap().image.as_deref(),
            Some("signs/stop.png")
        );
        assert!(bank.get("c").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let q = Question {
            id: "dup".into(),
            question: "?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 0,
            image: None,
        };
        let err = QuestionBank::new(vec![q.clone(), q]).unwrap_err();
        assert_eq!(err, QuizError::DuplicateId("dup".into()));
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let json = r#"[{"id": "x", "question": "?", "options": ["1","2","3","4"], "correctIndex": 7}]"#;
        let err = QuestionBank::from_json_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("correct index 7"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(QuestionBank::from_json_str("{ not json").is_err());
    }

    #[test]
    fn validate_small_bank_and_duplicate_options() {
        let json = r#"[{"id": "x", "question": " ", "options": ["same","same","c","d"], "correctIndex": 0}]"#;
        let bank = QuestionBank::from_json_str(json).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("fewer than one batch")));
        assert!(warnings.iter().any(|w| w.message.contains("text is empty")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicates")));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");
        std::fs::write(&path, SMALL_BANK).unwrap();

        let bank = QuestionBank::load(&path).unwrap();
        assert_eq!(bank.len(), 2);

        let missing = QuestionBank::load(&dir.path().join("missing.json"));
        assert!(missing.is_err());
    }
}
