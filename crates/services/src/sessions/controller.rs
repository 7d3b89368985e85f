use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use placement_core::model::{AnswerRecord, Question, QuestionBank, SessionId};
use placement_core::time::elapsed_ms;

use super::progress::{SessionProgress, SessionSnapshot};
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a session is in its linear pass through the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum SessionPhase {
    /// No option picked yet for the question at `index`.
    AwaitingChoice(usize),
    /// An option is picked for the question at `index` and may still be changed.
    Committed(usize),
    /// Every question has a committed answer.
    Finished,
}

impl SessionPhase {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, SessionPhase::Finished)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::AwaitingChoice(i) => write!(f, "awaiting a choice for question #{}", i + 1),
            SessionPhase::Committed(i) => write!(f, "committed on question #{}", i + 1),
            SessionPhase::Finished => f.write_str("finished"),
        }
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Everything a finished session hands over for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub trace: Vec<AnswerRecord>,
    pub distractions: u32,
    pub answer_changes: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionOutcome {
    /// Wall-clock duration of the whole attempt in milliseconds.
    #[must_use]
    pub fn wall_time_ms(&self) -> u64 {
        elapsed_ms(self.started_at, self.finished_at)
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// State machine for one test attempt.
///
/// Steps through the bank once, in order. Every method that depends on time
/// takes an explicit timestamp; `PlacementSession` supplies them from a `Clock`.
///
/// Answer changes: the first `select` on a question is a pick, every further
/// `select` on the same question (before `advance`) counts as one change, even
/// if it re-picks the same option.
pub struct SessionController {
    id: SessionId,
    bank: Arc<QuestionBank>,
    current: usize,
    pick: Option<String>,
    answers: Vec<AnswerRecord>,
    changes_per_question: Vec<u32>,
    distractions: u32,
    answer_changes: u32,
    started_at: DateTime<Utc>,
    question_started_at: DateTime<Utc>,
    elapsed_ms: u64,
    finished_at: Option<DateTime<Utc>>,
}

impl SessionController {
    /// Start a session over `bank` at `started_at`, on the first question.
    ///
    /// `QuestionBank` is non-empty by construction, so there is always a first question.
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, started_at: DateTime<Utc>) -> Self {
        Self::with_id(SessionId::random(), bank, started_at)
    }

    #[must_use]
    pub fn with_id(id: SessionId, bank: Arc<QuestionBank>, started_at: DateTime<Utc>) -> Self {
        let total = bank.len();
        Self {
            id,
            bank,
            current: 0,
            pick: None,
            answers: Vec::with_capacity(total),
            changes_per_question: vec![0; total],
            distractions: 0,
            answer_changes: 0,
            started_at,
            question_started_at: started_at,
            elapsed_ms: 0,
            finished_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Shared handle to the bank, for analysis after the session is consumed.
    #[must_use]
    pub fn bank_handle(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.finished_at.is_some() {
            SessionPhase::Finished
        } else if self.pick.is_some() {
            SessionPhase::Committed(self.current)
        } else {
            SessionPhase::AwaitingChoice(self.current)
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Committed answers so far, in question order.
    #[must_use]
    pub fn trace(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            self.bank.get(self.current)
        }
    }

    #[must_use]
    pub fn current_pick(&self) -> Option<&str> {
        self.pick.as_deref()
    }

    #[must_use]
    pub fn distractions(&self) -> u32 {
        self.distractions
    }

    #[must_use]
    pub fn answer_changes(&self) -> u32 {
        self.answer_changes
    }

    /// Answer changes recorded while the question at `index` was current.
    #[must_use]
    pub fn answer_changes_for(&self, index: usize) -> Option<u32> {
        self.changes_per_question.get(index).copied()
    }

    /// Elapsed time on the current question as of the last `tick_at`.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.bank.len();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            current_index: self.current,
            current_pick: self.pick.clone(),
            distractions: self.distractions,
            answer_changes: self.answer_changes,
            elapsed_ms: self.elapsed_ms,
            progress: self.progress(),
        }
    }

    /// Pick `option` for the current question.
    ///
    /// Returns `true` if this replaced an earlier pick (an answer change).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` if the session is finished.
    /// Returns `SessionError::InvalidOption` if `option` is not one of the current
    /// question's options; the pick and counters are left untouched.
    pub fn select(&mut self, option: &str) -> Result<bool, SessionError> {
        let question = self.current_question().ok_or(SessionError::SessionClosed)?;
        if !question.has_option(option) {
            return Err(SessionError::InvalidOption {
                question_id: question.id(),
                option: option.to_string(),
            });
        }

        let changed = self.pick.is_some();
        if changed {
            self.answer_changes = self.answer_changes.saturating_add(1);
            if let Some(count) = self.changes_per_question.get_mut(self.current) {
                *count = count.saturating_add(1);
            }
        }
        self.pick = Some(option.to_string());
        Ok(changed)
    }

    /// Freeze the current pick into an answer record and move on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` if the session is finished.
    /// Returns `SessionError::InvalidTransition` if nothing is picked yet.
    pub fn advance_at(&mut self, now: DateTime<Utc>) -> Result<&AnswerRecord, SessionError> {
        let phase = self.phase();
        let question = self.current_question().ok_or(SessionError::SessionClosed)?;
        let Some(chosen) = self.pick.as_deref() else {
            return Err(SessionError::InvalidTransition {
                action: "advance",
                phase,
            });
        };

        let time_spent_ms = elapsed_ms(self.question_started_at, now);
        let record = AnswerRecord::commit(question, chosen, time_spent_ms);

        self.answers.push(record);
        self.pick = None;
        self.question_started_at = now;
        self.elapsed_ms = 0;

        if self.current + 1 < self.bank.len() {
            self.current += 1;
        } else {
            self.finished_at = Some(now);
        }

        self.answers.last().ok_or(SessionError::SessionClosed)
    }

    /// Recompute the displayed elapsed time for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` if the session is finished.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionClosed);
        }
        self.elapsed_ms = elapsed_ms(self.question_started_at, now);
        Ok(self.elapsed_ms)
    }

    /// Record a focus-loss event.
    ///
    /// Returns `false` (and records nothing) once the session is finished.
    pub fn focus_lost(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.distractions = self.distractions.saturating_add(1);
        true
    }

    /// Consume a finished session into its outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session is not finished yet.
    pub fn finish(self) -> Result<SessionOutcome, SessionError> {
        let Some(finished_at) = self.finished_at else {
            return Err(SessionError::InvalidTransition {
                action: "finish",
                phase: self.phase(),
            });
        };

        Ok(SessionOutcome {
            session_id: self.id,
            trace: self.answers,
            distractions: self.distractions,
            answer_changes: self.answer_changes,
            started_at: self.started_at,
            finished_at,
        })
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.id)
            .field("questions_len", &self.bank.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("distractions", &self.distractions)
            .field("answer_changes", &self.answer_changes)
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use placement_core::model::{CefrLevel, QuestionId};
    use placement_core::time::fixed_now;

    fn build_bank(len: u64) -> Arc<QuestionBank> {
        let questions = (1..=len)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    vec!["for".into(), "since".into(), "at".into()],
                    "since",
                    CefrLevel::B1,
                )
                .unwrap()
            })
            .collect();
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    fn at(ms: i64) -> DateTime<Utc> {
        fixed_now() + Duration::milliseconds(ms)
    }

    #[test]
    fn starts_awaiting_first_choice() {
        let session = SessionController::new(build_bank(2), fixed_now());
        assert_eq!(session.phase(), SessionPhase::AwaitingChoice(0));
        assert_eq!(session.current_pick(), None);
        assert_eq!(session.progress().remaining, 2);
    }

    #[test]
    fn select_commits_and_reselect_counts_one_change() {
        let mut session = SessionController::new(build_bank(2), fixed_now());

        assert!(!session.select("for").unwrap());
        assert_eq!(session.phase(), SessionPhase::Committed(0));
        assert_eq!(session.answer_changes(), 0);

        assert!(session.select("since").unwrap());
        assert_eq!(session.answer_changes(), 1);
        assert_eq!(session.current_pick(), Some("since"));
    }

    #[test]
    fn invalid_option_is_rejected_without_side_effects() {
        let mut session = SessionController::new(build_bank(1), fixed_now());
        session.select("for").unwrap();

        let err = session.select("during").unwrap_err();
        assert!(matches!(err, SessionError::InvalidOption { .. }));
        assert_eq!(session.current_pick(), Some("for"));
        assert_eq!(session.answer_changes(), 0);
    }

    #[test]
    fn advance_without_pick_is_invalid_transition() {
        let mut session = SessionController::new(build_bank(2), fixed_now());
        let err = session.advance_at(at(1_000)).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                action: "advance",
                phase: SessionPhase::AwaitingChoice(0),
            }
        );
        assert!(session.trace().is_empty());
    }

    #[test]
    fn advance_records_correctness_and_time() {
        let mut session = SessionController::new(build_bank(2), fixed_now());

        session.select("since").unwrap();
        let first = session.advance_at(at(4_000)).unwrap().clone();
        assert!(first.correct);
        assert_eq!(first.time_spent_ms, 4_000);
        assert_eq!(first.question_id, QuestionId::new(1));
        assert_eq!(session.phase(), SessionPhase::AwaitingChoice(1));

        session.select("at").unwrap();
        let second = session.advance_at(at(10_500)).unwrap().clone();
        assert!(!second.correct);
        assert_eq!(second.time_spent_ms, 6_500);
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.finished_at(), Some(at(10_500)));
    }

    #[test]
    fn later_changes_do_not_touch_earlier_questions() {
        let mut session = SessionController::new(build_bank(2), fixed_now());
        session.select("for").unwrap();
        session.select("since").unwrap();
        session.advance_at(at(1_000)).unwrap();

        session.select("for").unwrap();
        session.select("at").unwrap();
        session.select("since").unwrap();

        assert_eq!(session.answer_changes_for(0), Some(1));
        assert_eq!(session.answer_changes_for(1), Some(2));
        assert_eq!(session.answer_changes(), 3);
    }

    #[test]
    fn tick_updates_display_time_only() {
        let mut session = SessionController::new(build_bank(1), fixed_now());
        assert_eq!(session.tick_at(at(2_000)).unwrap(), 2_000);
        assert_eq!(session.elapsed_ms(), 2_000);
        assert!(session.trace().is_empty());

        session.select("since").unwrap();
        session.advance_at(at(3_000)).unwrap();
        assert_eq!(session.tick_at(at(4_000)), Err(SessionError::SessionClosed));
    }

    #[test]
    fn focus_loss_counts_until_finished() {
        let mut session = SessionController::new(build_bank(1), fixed_now());
        assert!(session.focus_lost());
        session.select("for").unwrap();
        assert!(session.focus_lost());
        assert_eq!(session.distractions(), 2);

        session.advance_at(at(1_000)).unwrap();
        assert!(!session.focus_lost());
        assert_eq!(session.distractions(), 2);
    }

    #[test]
    fn mutations_after_finish_are_rejected() {
        let mut session = SessionController::new(build_bank(1), fixed_now());
        session.select("since").unwrap();
        session.advance_at(at(1_000)).unwrap();

        assert_eq!(session.select("for"), Err(SessionError::SessionClosed));
        assert_eq!(
            session.advance_at(at(2_000)).cloned(),
            Err(SessionError::SessionClosed)
        );
        assert_eq!(session.trace().len(), 1);
    }

    #[test]
    fn finish_requires_finished_phase() {
        let mut session = SessionController::new(build_bank(1), fixed_now());
        session.select("since").unwrap();
        let err = SessionController::new(build_bank(1), fixed_now())
            .finish()
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { action: "finish", .. }));

        session.focus_lost();
        session.advance_at(at(5_000)).unwrap();
        let outcome = session.finish().unwrap();
        assert_eq!(outcome.trace.len(), 1);
        assert_eq!(outcome.distractions, 1);
        assert_eq!(outcome.wall_time_ms(), 5_000);
    }
}
