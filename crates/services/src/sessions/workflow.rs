use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use placement_core::model::{AnswerRecord, PlacementReport, Question, QuestionBank, SessionId};
use placement_core::scoring::Analyzer;

use super::controller::{SessionController, SessionOutcome, SessionPhase};
use super::progress::SessionSnapshot;
use crate::Clock;
use crate::error::SessionError;
use crate::insights::BehaviourProfile;

/// Everything a host needs to render once a session is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub outcome: SessionOutcome,
    pub report: PlacementReport,
    pub behaviour: BehaviourProfile,
}

/// A live placement test driven by host events.
///
/// Wraps `SessionController` with a `Clock`, so hosts forward user actions and
/// timer ticks without passing timestamps. All calls are expected from a single
/// logical thread; events are applied in the order they arrive.
#[derive(Debug)]
pub struct PlacementSession {
    clock: Clock,
    controller: SessionController,
}

impl PlacementSession {
    /// Start a session on the first question of `bank`.
    #[must_use]
    pub fn start(bank: Arc<QuestionBank>, clock: Clock) -> Self {
        let controller = SessionController::new(bank, clock.now());
        info!(
            session = %controller.id(),
            questions = controller.bank().len(),
            "placement session started"
        );
        Self { clock, controller }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.controller.id()
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Mutable access to the clock, used to drive fixed clocks in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.controller.phase()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.controller.is_complete()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.controller.current_question()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.controller.snapshot()
    }

    /// Pick an option for the current question.
    ///
    /// # Errors
    ///
    /// See [`SessionController::select`].
    pub fn select(&mut self, option: &str) -> Result<(), SessionError> {
        let changed = self.controller.select(option)?;
        debug!(
            session = %self.controller.id(),
            index = self.controller.current_index(),
            option,
            changed,
            "option selected"
        );
        Ok(())
    }

    /// Commit the current pick and move to the next question.
    ///
    /// # Errors
    ///
    /// See [`SessionController::advance_at`].
    pub fn advance(&mut self) -> Result<&AnswerRecord, SessionError> {
        let session = self.controller.id();
        let now = self.clock.now();
        let record = self.controller.advance_at(now)?;
        debug!(
            session = %session,
            question = %record.question_id,
            correct = record.correct,
            time_spent_ms = record.time_spent_ms,
            "answer committed"
        );
        Ok(record)
    }

    /// Refresh the displayed elapsed time for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionClosed` once the session is finished.
    pub fn tick(&mut self) -> Result<u64, SessionError> {
        self.controller.tick_at(self.clock.now())
    }

    /// Record that the test-taker's attention left the session.
    pub fn on_focus_lost(&mut self) {
        if self.controller.focus_lost() {
            debug!(
                session = %self.controller.id(),
                distractions = self.controller.distractions(),
                "focus lost"
            );
        }
    }

    /// Consume the finished session into its outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session is not finished.
    pub fn finish(self) -> Result<SessionOutcome, SessionError> {
        let outcome = self.controller.finish()?;
        info!(
            session = %outcome.session_id,
            answers = outcome.trace.len(),
            distractions = outcome.distractions,
            answer_changes = outcome.answer_changes,
            "placement session finished"
        );
        Ok(outcome)
    }

    /// Finish the session and analyze its trace in one step.
    ///
    /// The session state is dropped here; only the result survives.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session is not finished.
    /// Propagates analysis failures via `SessionError::Analysis`.
    pub fn finish_and_analyze(self, analyzer: &Analyzer) -> Result<SessionResult, SessionError> {
        let bank = self.controller.bank_handle();
        let outcome = self.finish()?;
        analyze_outcome(outcome, bank.questions(), analyzer)
    }
}

/// Analyze a finished outcome against the questions it was taken on.
///
/// # Errors
///
/// Propagates analysis failures via `SessionError::Analysis`.
pub fn analyze_outcome(
    outcome: SessionOutcome,
    questions: &[Question],
    analyzer: &Analyzer,
) -> Result<SessionResult, SessionError> {
    let report = analyzer.analyze(&outcome.trace, questions)?;
    let behaviour = BehaviourProfile::from_outcome(&outcome);
    info!(
        session = %outcome.session_id,
        level = %report.level,
        score = report.score_percent,
        weaknesses = report.weaknesses.len(),
        "placement analyzed"
    );
    Ok(SessionResult {
        outcome,
        report,
        behaviour,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::model::{CefrLevel, QuestionId};
    use placement_core::time::fixed_clock;

    fn build_bank() -> Arc<QuestionBank> {
        let questions = [CefrLevel::A1, CefrLevel::B2]
            .into_iter()
            .enumerate()
            .map(|(idx, level)| {
                Question::new(
                    QuestionId::new(idx as u64 + 1),
                    "Q",
                    vec!["yes".into(), "no".into()],
                    "yes",
                    level,
                )
                .unwrap()
            })
            .collect();
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    #[test]
    fn clock_drives_question_timing() {
        let mut session = PlacementSession::start(build_bank(), fixed_clock());

        session.clock_mut().advance_ms(3_000);
        assert_eq!(session.tick().unwrap(), 3_000);
        session.select("yes").unwrap();
        session.clock_mut().advance_ms(1_000);
        assert_eq!(session.advance().unwrap().time_spent_ms, 4_000);

        session.clock_mut().advance_ms(2_500);
        session.select("no").unwrap();
        assert_eq!(session.advance().unwrap().time_spent_ms, 2_500);
        assert!(session.is_complete());
    }

    #[test]
    fn finish_and_analyze_produces_result() {
        let mut session = PlacementSession::start(build_bank(), fixed_clock());
        session.on_focus_lost();
        for _ in 0..2 {
            session.select("no").unwrap();
            session.select("yes").unwrap();
            session.clock_mut().advance_ms(1_000);
            session.advance().unwrap();
        }

        let result = session.finish_and_analyze(&Analyzer::new()).unwrap();
        assert_eq!(result.report.correct_count, 2);
        assert_eq!(result.report.level, CefrLevel::A1);
        assert_eq!(result.outcome.answer_changes, 2);
        assert_eq!(result.behaviour.distractions, 1);
        assert_eq!(result.outcome.wall_time_ms(), 2_000);
    }

    #[test]
    fn finishing_early_is_rejected() {
        let session = PlacementSession::start(build_bank(), fixed_clock());
        let err = session.finish_and_analyze(&Analyzer::new()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }
}
