use serde::Serialize;

use super::controller::SessionPhase;

/// Aggregated view of session progress, useful for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of answered questions as a whole percentage.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = self.answered.saturating_mul(100) / self.total;
        u8::try_from(percent.min(100)).unwrap_or(100)
    }
}

/// Read-only copy of the live session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub current_index: usize,
    pub current_pick: Option<String>,
    pub distractions: u32,
    pub answer_changes: u32,
    pub elapsed_ms: u64,
    pub progress: SessionProgress,
}
