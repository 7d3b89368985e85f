//! Behaviour insights derived from session counters and pacing.
//!
//! These sit next to the placement report rather than inside it: the report is
//! a function of the trace alone, while insights also read the distraction and
//! answer-change counters kept by the session.

use serde::Serialize;

use crate::sessions::SessionOutcome;

/// Average seconds per question above which comprehension is flagged as slow.
pub const SLOW_COMPREHENSION_SECS: u64 = 15;
/// More answer changes than this are flagged as hesitation.
pub const HESITANT_CHANGES: u32 = 2;
/// Focus score lost per distraction.
pub const FOCUS_PENALTY_PER_DISTRACTION: u32 = 20;
/// Average seconds per question that still earn a full speed score.
pub const SPEED_FULL_SCORE_SECS: u64 = 5;
/// Speed score lost per second above `SPEED_FULL_SCORE_SECS`.
pub const SPEED_PENALTY_PER_SEC: u64 = 5;

/// A single behavioural observation about the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    SlowComprehension { average_time_ms: u64 },
    Distracted { count: u32 },
    Hesitant { changes: u32 },
    Excellent,
}

/// What the test-taker should try next, as a symbolic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suggestion {
    SimplifiedExplanations,
    Pomodoro,
    ConfidenceDrills,
    AdvancedChallenges,
}

impl Insight {
    #[must_use]
    pub fn suggestion(&self) -> Suggestion {
        match self {
            Insight::SlowComprehension { .. } => Suggestion::SimplifiedExplanations,
            Insight::Distracted { .. } => Suggestion::Pomodoro,
            Insight::Hesitant { .. } => Suggestion::ConfidenceDrills,
            Insight::Excellent => Suggestion::AdvancedChallenges,
        }
    }
}

/// Raw behavioural counters for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviourSignals {
    pub distractions: u32,
    pub answer_changes: u32,
    pub average_time_ms: u64,
    /// Quickest single answer; 0 for an empty trace.
    pub fastest_ms: u64,
    /// Longest single answer; 0 for an empty trace.
    pub slowest_ms: u64,
}

impl BehaviourSignals {
    #[must_use]
    pub fn from_outcome(outcome: &SessionOutcome) -> Self {
        let times = || outcome.trace.iter().map(|a| a.time_spent_ms);
        let total = times().fold(0_u64, u64::saturating_add);
        let count = u64::try_from(outcome.trace.len()).unwrap_or(u64::MAX);
        let average_time_ms = if count == 0 { 0 } else { total / count };
        Self {
            distractions: outcome.distractions,
            answer_changes: outcome.answer_changes,
            average_time_ms,
            fastest_ms: times().min().unwrap_or(0),
            slowest_ms: times().max().unwrap_or(0),
        }
    }

    /// Average time rounded half up to whole seconds.
    #[must_use]
    pub fn average_secs(&self) -> u64 {
        self.average_time_ms.saturating_add(500) / 1_000
    }
}

/// Scores and insights computed from `BehaviourSignals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BehaviourProfile {
    pub distractions: u32,
    pub answer_changes: u32,
    /// 0-100, full marks with no distractions.
    pub focus_score: u8,
    /// 0-100, full marks at or below the full-score pace.
    pub speed_score: u8,
    pub fastest_ms: u64,
    pub slowest_ms: u64,
    /// Never empty: `Excellent` stands in when nothing else was observed.
    pub insights: Vec<Insight>,
}

impl BehaviourProfile {
    #[must_use]
    pub fn from_signals(signals: BehaviourSignals) -> Self {
        let average_secs = signals.average_secs();
        let mut insights = Vec::new();
        if average_secs > SLOW_COMPREHENSION_SECS {
            insights.push(Insight::SlowComprehension {
                average_time_ms: signals.average_time_ms,
            });
        }
        if signals.distractions > 0 {
            insights.push(Insight::Distracted {
                count: signals.distractions,
            });
        }
        if signals.answer_changes > HESITANT_CHANGES {
            insights.push(Insight::Hesitant {
                changes: signals.answer_changes,
            });
        }
        if insights.is_empty() {
            insights.push(Insight::Excellent);
        }

        Self {
            distractions: signals.distractions,
            answer_changes: signals.answer_changes,
            focus_score: focus_score(signals.distractions),
            speed_score: speed_score(average_secs),
            fastest_ms: signals.fastest_ms,
            slowest_ms: signals.slowest_ms,
            insights,
        }
    }

    #[must_use]
    pub fn from_outcome(outcome: &SessionOutcome) -> Self {
        Self::from_signals(BehaviourSignals::from_outcome(outcome))
    }
}

fn focus_score(distractions: u32) -> u8 {
    let penalty = distractions.saturating_mul(FOCUS_PENALTY_PER_DISTRACTION);
    u8::try_from(100_u32.saturating_sub(penalty)).unwrap_or(0)
}

fn speed_score(average_secs: u64) -> u8 {
    let penalty = average_secs
        .saturating_sub(SPEED_FULL_SCORE_SECS)
        .saturating_mul(SPEED_PENALTY_PER_SEC);
    u8::try_from(100_u64.saturating_sub(penalty)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::model::{AnswerRecord, CefrLevel, Question, QuestionId, SessionId};
    use placement_core::time::fixed_now;

    fn signals(distractions: u32, answer_changes: u32, average_time_ms: u64) -> BehaviourSignals {
        BehaviourSignals {
            distractions,
            answer_changes,
            average_time_ms,
            fastest_ms: average_time_ms,
            slowest_ms: average_time_ms,
        }
    }

    #[test]
    fn calm_fast_attempt_is_excellent() {
        let profile = BehaviourProfile::from_signals(signals(0, 2, 4_000));
        assert_eq!(profile.insights, vec![Insight::Excellent]);
        assert_eq!(profile.focus_score, 100);
        assert_eq!(profile.speed_score, 100);
        assert_eq!(profile.insights[0].suggestion(), Suggestion::AdvancedChallenges);
    }

    #[test]
    fn every_signal_can_fire_together() {
        let profile = BehaviourProfile::from_signals(signals(2, 3, 16_000));
        assert_eq!(
            profile.insights,
            vec![
                Insight::SlowComprehension {
                    average_time_ms: 16_000
                },
                Insight::Distracted { count: 2 },
                Insight::Hesitant { changes: 3 },
            ]
        );
        assert_eq!(profile.focus_score, 60);
        assert_eq!(profile.speed_score, 45);
    }

    #[test]
    fn scores_saturate_at_zero() {
        let profile = BehaviourProfile::from_signals(signals(9, 0, 60_000));
        assert_eq!(profile.focus_score, 0);
        assert_eq!(profile.speed_score, 0);
    }

    #[test]
    fn fifteen_seconds_is_not_slow() {
        let profile = BehaviourProfile::from_signals(signals(0, 0, 15_000));
        assert_eq!(profile.insights, vec![Insight::Excellent]);
        assert_eq!(profile.speed_score, 50);
    }

    #[test]
    fn average_is_rounded_to_whole_seconds() {
        let just_under = BehaviourProfile::from_signals(signals(0, 0, 15_499));
        assert_eq!(just_under.insights, vec![Insight::Excellent]);
        assert_eq!(just_under.speed_score, 50);

        let rounds_up = BehaviourProfile::from_signals(signals(0, 0, 15_500));
        assert_eq!(
            rounds_up.insights,
            vec![Insight::SlowComprehension {
                average_time_ms: 15_500
            }]
        );
        assert_eq!(rounds_up.speed_score, 45);

        assert_eq!(signals(0, 0, 7_400).average_secs(), 7);
        assert_eq!(BehaviourProfile::from_signals(signals(0, 0, 4_499)).speed_score, 100);
    }

    #[test]
    fn quick_stats_come_from_the_trace() {
        let question = Question::new(
            QuestionId::new(1),
            "I ___ a student.",
            vec!["am".into(), "is".into()],
            "am",
            CefrLevel::A1,
        )
        .unwrap();
        let outcome = SessionOutcome {
            session_id: SessionId::random(),
            trace: [4_200, 1_800, 9_000]
                .into_iter()
                .map(|ms| AnswerRecord::commit(&question, "am", ms))
                .collect(),
            distractions: 0,
            answer_changes: 0,
            started_at: fixed_now(),
            finished_at: fixed_now(),
        };

        let profile = BehaviourProfile::from_outcome(&outcome);
        assert_eq!(profile.fastest_ms, 1_800);
        assert_eq!(profile.slowest_ms, 9_000);
        assert_eq!(profile.speed_score, 100);
    }
}
