//! Plain-text rendering of session screens and results.
//!
//! Functions here only format; they never touch the terminal.

use std::fmt::Write as _;

use placement_core::model::{Question, Weakness, WeaknessKind};
use services::{Insight, SessionResult, SessionSnapshot, Suggestion};

/// Formats milliseconds as `m:ss`.
#[must_use]
pub fn format_duration_ms(ms: u64) -> String {
    let total_seconds = ms / 1_000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[must_use]
pub fn weakness_label(weakness: &Weakness) -> String {
    match weakness.kind {
        WeaknessKind::Accuracy => format!("Difficulty with {} questions", weakness.level),
        WeaknessKind::Slow => format!("Slow on {} questions", weakness.level),
    }
}

#[must_use]
pub fn insight_label(insight: &Insight) -> String {
    match insight {
        Insight::SlowComprehension { average_time_ms } => format!(
            "Slow comprehension: {} per question on average",
            format_duration_ms(*average_time_ms)
        ),
        Insight::Distracted { count } => format!("Lost focus {count} time(s) during the test"),
        Insight::Hesitant { changes } => format!("Changed answers {changes} times"),
        Insight::Excellent => "Focused and confident throughout".to_string(),
    }
}

#[must_use]
pub fn suggestion_label(suggestion: Suggestion) -> &'static str {
    match suggestion {
        Suggestion::SimplifiedExplanations => "use simplified explanations with examples",
        Suggestion::Pomodoro => "try short focused study blocks (Pomodoro)",
        Suggestion::ConfidenceDrills => "practise quick-decision drills to trust your first answer",
        Suggestion::AdvancedChallenges => "move on to more advanced challenges",
    }
}

/// One question screen: header, prompt, numbered options, live counters.
#[must_use]
pub fn question_screen(snapshot: &SessionSnapshot, question: &Question) -> String {
    let mut out = String::new();
    let progress = &snapshot.progress;
    let _ = writeln!(
        out,
        "Question {} of {}  [{}]  {}%",
        snapshot.current_index + 1,
        progress.total,
        question.level(),
        progress.percent()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", question.prompt());
    let _ = writeln!(out);

    for (idx, option) in question.options().iter().enumerate() {
        let marker = if snapshot.current_pick.as_deref() == Some(option.as_str()) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(out, "  {marker} {}) {option}", idx + 1);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "time {}  |  distractions {}  |  answer changes {}",
        format_duration_ms(snapshot.elapsed_ms),
        snapshot.distractions,
        snapshot.answer_changes
    );
    let _ = writeln!(out, "[1-9] pick  [enter] next  [q] quit");
    out
}

/// Full text report for a finished session.
#[must_use]
pub fn report_text(result: &SessionResult) -> String {
    let report = &result.report;
    let behaviour = &result.behaviour;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Level {} - {} ({})",
        report.level, report.profile.name, report.profile.localized_name
    );
    let _ = writeln!(out, "{}", report.profile.description);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Score {}% ({}/{})  total {}  average {}",
        report.score_percent,
        report.correct_count,
        report.question_count,
        format_duration_ms(report.total_time_ms),
        format_duration_ms(report.average_time_ms)
    );
    let _ = writeln!(
        out,
        "Focus {}/100  speed {}/100",
        behaviour.focus_score, behaviour.speed_score
    );
    let _ = writeln!(
        out,
        "Fastest answer {}  slowest answer {}",
        format_duration_ms(behaviour.fastest_ms),
        format_duration_ms(behaviour.slowest_ms)
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "By level:");
    for stat in &report.breakdown {
        let _ = writeln!(
            out,
            "  {}  {}/{}  avg {}",
            stat.level,
            stat.correct,
            stat.total,
            format_duration_ms(stat.average_time_ms().map_or(0, |ms| ms.round() as u64))
        );
    }

    let _ = writeln!(out);
    if report.weaknesses.is_empty() {
        let _ = writeln!(out, "No weaknesses found.");
    } else {
        let _ = writeln!(out, "Weaknesses:");
        for weakness in &report.weaknesses {
            let _ = writeln!(out, "  - {}", weakness_label(weakness));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Insights:");
    for insight in &behaviour.insights {
        let _ = writeln!(
            out,
            "  - {} -> {}",
            insight_label(insight),
            suggestion_label(insight.suggestion())
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Study tips:");
    for tip in report.tips {
        let _ = writeln!(out, "  - {}: {}", tip.title, tip.description);
    }
    let _ = writeln!(out, "Techniques:");
    for technique in report.techniques {
        let _ = writeln!(out, "  - {}: {}", technique.title, technique.description);
    }
    let _ = writeln!(out, "Resources:");
    for resource in report.resources {
        let _ = writeln!(out, "  - {resource}");
    }
    out
}
