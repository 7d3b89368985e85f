use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::CefrLevel;
use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id}: prompt cannot be empty")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id}: at least 2 options are required, got {count}")]
    TooFewOptions { id: QuestionId, count: usize },

    #[error("question {id}: option {option:?} appears more than once")]
    DuplicateOption { id: QuestionId, option: String },

    #[error("question {id}: correct option {correct:?} is not one of the options")]
    CorrectNotInOptions { id: QuestionId, correct: String },

    #[error("question bank cannot be empty")]
    EmptyBank,

    #[error("question id {id} appears more than once in the bank")]
    DuplicateId { id: QuestionId },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as supplied by a question bank source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: String,
    pub level: CefrLevel,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// See [`Question::new`].
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::new(self.id, self.prompt, self.options, self.correct, self.level)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice placement question.
///
/// The correct answer is held by value; options are never compared by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct: String,
    level: CefrLevel,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    /// Returns `QuestionError::TooFewOptions` if fewer than two options are given.
    /// Returns `QuestionError::DuplicateOption` if two options are equal.
    /// Returns `QuestionError::CorrectNotInOptions` if `correct` is not one of the options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: impl Into<String>,
        level: CefrLevel,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct = correct.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                count: options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption {
                    id,
                    option: option.clone(),
                });
            }
        }

        if !seen.contains(correct.as_str()) {
            return Err(QuestionError::CorrectNotInOptions { id, correct });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct,
            level,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &str {
        &self.correct
    }

    #[must_use]
    pub fn level(&self) -> CefrLevel {
        self.level
    }

    /// Returns true if `option` is one of this question's options.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Returns true if `option` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct == option
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Non-empty, ordered list of questions with unique ids.
///
/// The order is the order a test-taker traverses; it is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyBank` if `questions` is empty.
    /// Returns `QuestionError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptyBank);
        }

        let mut ids = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !ids.insert(question.id()) {
                return Err(QuestionError::DuplicateId { id: question.id() });
            }
        }

        Ok(Self { questions })
    }

    /// Validate every draft and build a bank from them.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, see [`Question::new`] and [`QuestionBank::new`].
    pub fn from_drafts(
        drafts: impl IntoIterator<Item = QuestionDraft>,
    ) -> Result<Self, QuestionError> {
        let questions = drafts
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

impl<'de> Deserialize<'de> for QuestionBank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let drafts = Vec::<QuestionDraft>::deserialize(deserializer)?;
        QuestionBank::from_drafts(drafts).map_err(serde::de::Error::custom)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn valid_question_builds() {
        let q = Question::new(
            QuestionId::new(1),
            "I ___ a student.",
            opts(&["am", "is", "are", "be"]),
            "am",
            CefrLevel::A1,
        )
        .unwrap();

        assert!(q.has_option("is"));
        assert!(!q.has_option("was"));
        assert!(q.is_correct("am"));
        assert!(!q.is_correct("is"));
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["a"]), "a", CefrLevel::A1)
            .unwrap_err();
        assert!(matches!(err, QuestionError::TooFewOptions { count: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_options() {
        let err = Question::new(
            QuestionId::new(2),
            "Q",
            opts(&["for", "since", "for"]),
            "since",
            CefrLevel::B1,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateOption { .. }));
    }

    #[test]
    fn rejects_correct_outside_options() {
        let err = Question::new(
            QuestionId::new(3),
            "Q",
            opts(&["go", "went"]),
            "gone",
            CefrLevel::A2,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::CorrectNotInOptions { .. }));
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new(QuestionId::new(4), "  ", opts(&["a", "b"]), "a", CefrLevel::A1)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt { id: QuestionId::new(4) });
    }

    #[test]
    fn bank_rejects_empty_and_duplicate_ids() {
        assert_eq!(QuestionBank::new(Vec::new()).unwrap_err(), QuestionError::EmptyBank);

        let q = Question::new(QuestionId::new(1), "Q", opts(&["a", "b"]), "a", CefrLevel::A1)
            .unwrap();
        let err = QuestionBank::new(vec![q.clone(), q]).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateId { id: QuestionId::new(1) });
    }

    #[test]
    fn bank_deserializes_and_validates() {
        let json = r#"[
            {"id": 1, "prompt": "She ___ my friend.", "options": ["am", "is"], "correct": "is", "level": "A1"},
            {"id": 2, "prompt": "___ you see it?", "options": ["Do", "Did"], "correct": "Did", "level": "A2"}
        ]"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(1).unwrap().level(), CefrLevel::A2);

        let bad = r#"[{"id": 1, "prompt": "Q", "options": ["a", "b"], "correct": "c", "level": "A1"}]"#;
        assert!(serde_json::from_str::<QuestionBank>(bad).is_err());
    }
}
