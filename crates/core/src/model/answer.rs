use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::model::ids::QuestionId;

/// Record of a single committed answer.
///
/// Produced exactly once per question when the test-taker advances past it.
/// `correct` is frozen at commit time and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub chosen: String,
    pub correct: bool,
    pub time_spent_ms: u64,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        chosen: impl Into<String>,
        correct: bool,
        time_spent_ms: u64,
    ) -> Self {
        Self {
            question_id,
            chosen: chosen.into(),
            correct,
            time_spent_ms,
        }
    }

    /// Commit `chosen` against `question`, comparing by value.
    #[must_use]
    pub fn commit(question: &Question, chosen: impl Into<String>, time_spent_ms: u64) -> Self {
        let chosen = chosen.into();
        let correct = question.is_correct(&chosen);
        Self::new(question.id(), chosen, correct, time_spent_ms)
    }
}
