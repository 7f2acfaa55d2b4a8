//! Deterministic answers for the classified intents.
//!
//! Every formatter is a pure function of the scoped records and the
//! injected `today`; none of them reads the clock.

use chrono::{Days, NaiveDate};

use super::intent::Intent;
use crate::data::model::StudentRecord;

pub const MISSING_HOMEWORK_HEADER: &str = "Students who haven't submitted homework: ";
pub const ALL_SUBMITTED: &str = "All have submitted!";

pub const PERFORMANCE_HEADER: &str = "Performance data:";
pub const NO_PERFORMANCE_DATA: &str = "No performance data available.";
pub const NULL_SCORE: &str = "N/A";

pub const UPCOMING_HEADER: &str = "Upcoming quizzes:";
pub const NO_UPCOMING_QUIZZES: &str = "No upcoming quizzes next week.";
/// Window length for upcoming quizzes; both ends inclusive.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

pub const NO_ROWS: &str = "NO_ROWS";

/// Answer for a classified intent, or `None` for [`Intent::Unclassified`].
pub fn format_answer(intent: Intent, records: &[&StudentRecord], today: NaiveDate) -> Option<String> {
    match intent {
        Intent::MissingHomework => Some(missing_homework(records)),
        Intent::PerformanceReport => Some(performance_report(records)),
        Intent::UpcomingQuizzes => Some(upcoming_quizzes(records, today)),
        Intent::Unclassified => None,
    }
}

/// Comma-joined names of students whose homework is not submitted.
pub fn missing_homework(records: &[&StudentRecord]) -> String {
    let names: Vec<&str> = records
        .iter()
        .filter(|r| !r.homework_submitted)
        .map(|r| r.name.as_str())
        .collect();

    if names.is_empty() {
        ALL_SUBMITTED.to_string()
    } else {
        format!("{MISSING_HOMEWORK_HEADER}{}", names.join(", "))
    }
}

/// One `name — quiz_name — quiz_score` line per record, in scoped order.
pub fn performance_report(records: &[&StudentRecord]) -> String {
    if records.is_empty() {
        return NO_PERFORMANCE_DATA.to_string();
    }
    let mut out = String::from(PERFORMANCE_HEADER);
    for r in records {
        let score = r
            .quiz_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| NULL_SCORE.to_string());
        out.push('\n');
        out.push_str(&format!("{} — {} — {}", r.name, r.quiz_name, score));
    }
    out
}

/// Quizzes dated within `[today, today + 7 days]`.
pub fn upcoming_quizzes(records: &[&StudentRecord], today: NaiveDate) -> String {
    let window_end = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let lines: Vec<String> = records
        .iter()
        .filter_map(|r| {
            let date = r.quiz_date?;
            (today <= date && date <= window_end).then(|| {
                let grade = r.grade.map(|g| g.to_string()).unwrap_or_else(|| "?".to_string());
                match r.class_label.as_deref() {
                    Some(class_label) => {
                        format!("{} on {date} (Grade {grade} {class_label})", r.quiz_name)
                    }
                    None => format!("{} on {date} (Grade {grade})", r.quiz_name),
                }
            })
        })
        .collect();

    if lines.is_empty() {
        NO_UPCOMING_QUIZZES.to_string()
    } else {
        format!("{UPCOMING_HEADER}\n{}", lines.join("\n"))
    }
}

/// Plain listing of the scoped rows, at most `max_rows` of them.
pub fn roster_context(records: &[&StudentRecord], max_rows: usize) -> String {
    let lines: Vec<String> = records
        .iter()
        .take(max_rows)
        .map(|r| {
            format!(
                "- {}: {}, Grade {}, Class {}, Region {}, HomeworkSubmitted={}, Quiz={} on {}, Score={}, Date={}",
                r.student_id,
                r.name,
                display_opt(r.grade),
                r.class_label.as_deref().unwrap_or(NULL_SCORE),
                r.region.as_deref().unwrap_or(NULL_SCORE),
                r.homework_submitted,
                r.quiz_name,
                display_opt(r.quiz_date),
                display_opt(r.quiz_score),
                display_opt(r.record_date),
            )
        })
        .collect();

    if lines.is_empty() {
        NO_ROWS.to_string()
    } else {
        lines.join("\n")
    }
}

fn display_opt<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NULL_SCORE.to_string())
}
