use serde::Serialize;
use std::fmt;

use crate::catalogue::{LevelProfile, StudyTip};
use crate::model::CefrLevel;

//
// ─── WEAKNESS ──────────────────────────────────────────────────────────────────
//

/// What a weakness flag is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessKind {
    /// Accuracy at the level fell below the weak-accuracy threshold.
    Accuracy,
    /// Average time per question at the level exceeded the slow threshold.
    Slow,
}

/// A weakness flagged for one proficiency level.
///
/// Renders as the level code (`"B1"`) or with a `-slow` suffix (`"B1-slow"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Weakness {
    pub level: CefrLevel,
    pub kind: WeaknessKind,
}

impl Weakness {
    #[must_use]
    pub fn accuracy(level: CefrLevel) -> Self {
        Self {
            level,
            kind: WeaknessKind::Accuracy,
        }
    }

    #[must_use]
    pub fn slow(level: CefrLevel) -> Self {
        Self {
            level,
            kind: WeaknessKind::Slow,
        }
    }

    /// The weakness tag, e.g. `"A2"` or `"A2-slow"`.
    #[must_use]
    pub fn tag(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Weakness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WeaknessKind::Accuracy => write!(f, "{}", self.level),
            WeaknessKind::Slow => write!(f, "{}-slow", self.level),
        }
    }
}

//
// ─── PER-LEVEL STATS ───────────────────────────────────────────────────────────
//

/// Aggregated accuracy and timing for questions tagged with one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStat {
    pub level: CefrLevel,
    pub correct: u32,
    pub total: u32,
    pub time_spent_ms: u64,
}

impl LevelStat {
    #[must_use]
    pub fn empty(level: CefrLevel) -> Self {
        Self {
            level,
            correct: 0,
            total: 0,
            time_spent_ms: 0,
        }
    }

    /// Fraction of correct answers in `[0, 1]`; `None` when no question was seen.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.correct) / f64::from(self.total))
    }

    /// Mean time per question in milliseconds; `None` when no question was seen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_time_ms(&self) -> Option<f64> {
        (self.total > 0).then(|| self.time_spent_ms as f64 / f64::from(self.total))
    }
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Immutable diagnostic report for a finished trace.
///
/// Presentation-agnostic: no pre-formatted strings beyond the static catalogue
/// text, and no rendering decisions. Hosts map accent and icon tags themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReport {
    pub level: CefrLevel,
    pub profile: &'static LevelProfile,
    /// Rounded percentage of correct answers (0-100).
    pub score_percent: u8,
    pub correct_count: u32,
    pub question_count: u32,
    pub total_time_ms: u64,
    pub average_time_ms: u64,
    /// Levels present in the trace, in pedagogical order.
    pub breakdown: Vec<LevelStat>,
    pub weaknesses: Vec<Weakness>,
    pub tips: &'static [StudyTip],
    pub techniques: &'static [StudyTip],
    pub resources: &'static [&'static str],
}

impl PlacementReport {
    /// Weakness tags in report order, e.g. `["A1", "A2-slow"]`.
    #[must_use]
    pub fn weakness_tags(&self) -> Vec<String> {
        self.weaknesses.iter().map(Weakness::tag).collect()
    }

    #[must_use]
    pub fn stat_for(&self, level: CefrLevel) -> Option<&LevelStat> {
        self.breakdown.iter().find(|stat| stat.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weakness_tags_render_with_suffix() {
        assert_eq!(Weakness::accuracy(CefrLevel::B1).tag(), "B1");
        assert_eq!(Weakness::slow(CefrLevel::B1).tag(), "B1-slow");
    }

    #[test]
    fn level_stat_ratios() {
        let stat = LevelStat {
            level: CefrLevel::C1,
            correct: 1,
            total: 2,
            time_spent_ms: 50_000,
        };
        assert_eq!(stat.accuracy(), Some(0.5));
        assert_eq!(stat.average_time_ms(), Some(25_000.0));
        assert_eq!(LevelStat::empty(CefrLevel::A1).accuracy(), None);
    }
}
