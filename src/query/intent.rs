use std::fmt;

/// The fixed set of questions the engine can answer on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MissingHomework,
    PerformanceReport,
    UpcomingQuizzes,
    /// Nothing matched; the question goes to the fallback responder.
    Unclassified,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::MissingHomework => "missing homework",
            Intent::PerformanceReport => "performance report",
            Intent::UpcomingQuizzes => "upcoming quizzes",
            Intent::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const HOMEWORK: &str = "homework";
const HOMEWORK_NEGATIONS: &[&str] = &["not", "haven't"];
const PERFORMANCE_TRIGGERS: &[&str] = &["performance", "score"];
const QUIZ: &str = "quiz";
const QUIZ_WINDOW_TRIGGERS: &[&str] = &["next week", "upcoming"];

/// Classify a question by case-insensitive substring triggers.
///
/// First match wins, in this order: missing homework, performance report,
/// upcoming quizzes. Compound questions resolve by that order, so
/// "which scores are missing because homework is not in" is a
/// missing-homework question.
pub fn classify(question: &str) -> Intent {
    let q = question.to_lowercase();

    if q.contains(HOMEWORK) && contains_any(&q, HOMEWORK_NEGATIONS) {
        Intent::MissingHomework
    } else if contains_any(&q, PERFORMANCE_TRIGGERS) {
        Intent::PerformanceReport
    } else if q.contains(QUIZ) && contains_any(&q, QUIZ_WINDOW_TRIGGERS) {
        Intent::UpcomingQuizzes
    } else {
        Intent::Unclassified
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}
