//! Shared error types for the services crate.

use thiserror::Error;

use placement_core::model::QuestionId;
use placement_core::scoring::AnalysisError;

use crate::sessions::SessionPhase;

/// Errors emitted by the session controller and workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("option {option:?} is not one of the options for question {question_id}")]
    InvalidOption {
        question_id: QuestionId,
        option: String,
    },
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error("session already finished")]
    SessionClosed,
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
