use thiserror::Error;

use crate::catalogue;
use crate::model::{
    AnswerRecord, CefrLevel, LevelStat, PlacementReport, Question, QuestionId, Weakness,
};

//
// ─── THRESHOLDS ────────────────────────────────────────────────────────────────
//

/// Minimum correct answers for `C2`.
pub const C2_MIN_CORRECT: u32 = 10;
/// Minimum correct answers for `C1`.
pub const C1_MIN_CORRECT: u32 = 9;
/// Minimum correct answers for `B2`.
pub const B2_MIN_CORRECT: u32 = 7;
/// Minimum correct answers for `B1`.
pub const B1_MIN_CORRECT: u32 = 5;
/// Minimum correct answers for `A2`. Anything below is `A1`.
pub const A2_MIN_CORRECT: u32 = 3;

/// A level is weak when its accuracy is strictly below this fraction.
pub const WEAK_ACCURACY_THRESHOLD: f64 = 0.70;

/// A level is slow when its average time per question is strictly above this.
pub const SLOW_AVERAGE_MS: u64 = 20_000;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("cannot analyze an empty trace")]
    EmptyTrace,

    #[error("trace has {answers} answers but {questions} questions were supplied")]
    MismatchedTraceLength { answers: usize, questions: usize },

    #[error("answer at position {position} is for question {found}, expected {expected}")]
    MisalignedTrace {
        position: usize,
        expected: QuestionId,
        found: QuestionId,
    },

    #[error("answer at position {position} to question {question_id} is inconsistent with its options")]
    InconsistentAnswer {
        position: usize,
        question_id: QuestionId,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoringConfigError {
    #[error("level thresholds must not increase from C2 down to A2, got {provided:?}")]
    NonMonotoneThresholds { provided: [u32; 5] },

    #[error("weak accuracy threshold must be in (0, 1], got {provided}")]
    InvalidWeakAccuracy { provided: f64 },

    #[error("slow average must be > 0 ms")]
    InvalidSlowAverage,
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Business thresholds used by the analyzer.
///
/// `Default` uses the named constants of this module.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Minimum correct counts for `[C2, C1, B2, B1, A2]`, checked in that order.
    min_correct: [u32; 5],
    weak_accuracy: f64,
    slow_average_ms: u64,
}

const LADDER: [CefrLevel; 5] = [
    CefrLevel::C2,
    CefrLevel::C1,
    CefrLevel::B2,
    CefrLevel::B1,
    CefrLevel::A2,
];

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_correct: [
                C2_MIN_CORRECT,
                C1_MIN_CORRECT,
                B2_MIN_CORRECT,
                B1_MIN_CORRECT,
                A2_MIN_CORRECT,
            ],
            weak_accuracy: WEAK_ACCURACY_THRESHOLD,
            slow_average_ms: SLOW_AVERAGE_MS,
        }
    }
}

impl ScoringConfig {
    /// Build a custom configuration.
    ///
    /// `min_correct` lists the minimum correct counts for `C2, C1, B2, B1, A2`.
    ///
    /// # Errors
    ///
    /// Returns `ScoringConfigError::NonMonotoneThresholds` if a lower level needs more
    /// correct answers than a higher one, which would break the staircase.
    /// Returns `ScoringConfigError::InvalidWeakAccuracy` if `weak_accuracy` is not in `(0, 1]`.
    /// Returns `ScoringConfigError::InvalidSlowAverage` if `slow_average_ms` is zero.
    pub fn new(
        min_correct: [u32; 5],
        weak_accuracy: f64,
        slow_average_ms: u64,
    ) -> Result<Self, ScoringConfigError> {
        if min_correct.windows(2).any(|pair| pair[0] < pair[1]) {
            return Err(ScoringConfigError::NonMonotoneThresholds {
                provided: min_correct,
            });
        }
        if !(weak_accuracy > 0.0 && weak_accuracy <= 1.0) {
            return Err(ScoringConfigError::InvalidWeakAccuracy {
                provided: weak_accuracy,
            });
        }
        if slow_average_ms == 0 {
            return Err(ScoringConfigError::InvalidSlowAverage);
        }

        Ok(Self {
            min_correct,
            weak_accuracy,
            slow_average_ms,
        })
    }

    /// Map a raw correct count to a level, highest bucket first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use placement_core::scoring::ScoringConfig;
    /// # use placement_core::model::CefrLevel;
    /// let config = ScoringConfig::default();
    /// assert_eq!(config.determine_level(9), CefrLevel::C1);
    /// assert_eq!(config.determine_level(2), CefrLevel::A1);
    /// ```
    #[must_use]
    pub fn determine_level(&self, correct_count: u32) -> CefrLevel {
        LADDER
            .iter()
            .zip(self.min_correct)
            .find(|(_, min)| correct_count >= *min)
            .map_or(CefrLevel::A1, |(level, _)| *level)
    }

    fn is_weak(&self, stat: &LevelStat) -> bool {
        stat.accuracy()
            .is_some_and(|accuracy| accuracy < self.weak_accuracy)
    }

    fn is_slow(&self, stat: &LevelStat) -> bool {
        // Integer form of `time / total > slow_average_ms`.
        stat.total > 0
            && u128::from(stat.time_spent_ms)
                > u128::from(self.slow_average_ms) * u128::from(stat.total)
    }
}

//
// ─── ANALYZER ──────────────────────────────────────────────────────────────────
//

/// Turns a finished answer trace into a `PlacementReport`.
///
/// Pure and deterministic: the same inputs always produce an equal report.
///
/// # Examples
///
/// ```
/// # use placement_core::model::{AnswerRecord, CefrLevel, Question, QuestionId};
/// # use placement_core::scoring::Analyzer;
/// let question = Question::new(
///     QuestionId::new(1),
///     "I ___ a student.",
///     vec!["am".into(), "is".into()],
///     "am",
///     CefrLevel::A1,
/// )?;
/// let trace = vec![AnswerRecord::commit(&question, "am", 3_000)];
///
/// let report = Analyzer::new().analyze(&trace, &[question])?;
/// assert_eq!(report.score_percent, 100);
/// assert_eq!(report.level, CefrLevel::A1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: ScoringConfig,
}

impl Analyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Analyze `trace` against the questions it was taken on.
    ///
    /// `trace[i]` must be the answer to `questions[i]`; nothing is re-sorted or
    /// matched by id. Partial traces are scored against the supplied subset.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyTrace` if `trace` is empty.
    /// Returns `AnalysisError::MismatchedTraceLength` if the lengths differ.
    /// Returns `AnalysisError::MisalignedTrace` if an answer's question id does not
    /// match the question at the same position.
    /// Returns `AnalysisError::InconsistentAnswer` if an answer's choice is not one of
    /// its question's options, or its `correct` flag disagrees with the question.
    pub fn analyze(
        &self,
        trace: &[AnswerRecord],
        questions: &[Question],
    ) -> Result<PlacementReport, AnalysisError> {
        check_alignment(trace, questions)?;

        let correct_count = count_u32(trace.iter().filter(|answer| answer.correct).count());
        let question_count = count_u32(trace.len());
        let total_time_ms = trace
            .iter()
            .fold(0_u64, |acc, answer| acc.saturating_add(answer.time_spent_ms));

        let level = self.config.determine_level(correct_count);
        let breakdown = aggregate_by_level(trace, questions);
        let weaknesses = self.weaknesses(&breakdown);

        Ok(PlacementReport {
            level,
            profile: catalogue::level_profile(level),
            score_percent: rounded_percent(correct_count, question_count),
            correct_count,
            question_count,
            total_time_ms,
            average_time_ms: rounded_div(total_time_ms, u64::from(question_count)),
            breakdown,
            weaknesses,
            tips: catalogue::study_tips(),
            techniques: catalogue::study_techniques(),
            resources: catalogue::resources(),
        })
    }

    /// Weakness flags in pedagogical level order; accuracy before slowness per level.
    #[must_use]
    pub fn weaknesses(&self, breakdown: &[LevelStat]) -> Vec<Weakness> {
        let mut out = Vec::new();
        for level in CefrLevel::ALL {
            let Some(stat) = breakdown.iter().find(|stat| stat.level == level) else {
                continue;
            };
            if self.config.is_weak(stat) {
                out.push(Weakness::accuracy(level));
            }
            if self.config.is_slow(stat) {
                out.push(Weakness::slow(level));
            }
        }
        out
    }
}

fn check_alignment(trace: &[AnswerRecord], questions: &[Question]) -> Result<(), AnalysisError> {
    if trace.is_empty() {
        return Err(AnalysisError::EmptyTrace);
    }
    if trace.len() != questions.len() {
        return Err(AnalysisError::MismatchedTraceLength {
            answers: trace.len(),
            questions: questions.len(),
        });
    }
    for (position, (answer, question)) in trace.iter().zip(questions).enumerate() {
        if answer.question_id != question.id() {
            return Err(AnalysisError::MisalignedTrace {
                position,
                expected: question.id(),
                found: answer.question_id,
            });
        }
        if !question.has_option(&answer.chosen)
            || answer.correct != question.is_correct(&answer.chosen)
        {
            return Err(AnalysisError::InconsistentAnswer {
                position,
                question_id: question.id(),
            });
        }
    }
    Ok(())
}

/// Group answers by the level tag of the question at the same position.
///
/// Only levels that appear in the trace get an entry.
#[must_use]
pub fn aggregate_by_level(trace: &[AnswerRecord], questions: &[Question]) -> Vec<LevelStat> {
    let mut stats = CefrLevel::ALL.map(LevelStat::empty);

    for (answer, question) in trace.iter().zip(questions) {
        let stat = &mut stats[question.level().index()];
        stat.total = stat.total.saturating_add(1);
        stat.time_spent_ms = stat.time_spent_ms.saturating_add(answer.time_spent_ms);
        if answer.correct {
            stat.correct = stat.correct.saturating_add(1);
        }
    }

    stats.into_iter().filter(|stat| stat.total > 0).collect()
}

fn count_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn rounded_div(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    numerator.saturating_add(denominator / 2) / denominator
}

fn rounded_percent(correct: u32, total: u32) -> u8 {
    let percent = rounded_div(u64::from(correct) * 100, u64::from(total));
    u8::try_from(percent.min(100)).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
