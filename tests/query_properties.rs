//! Property-based tests for the scoped query engine.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use roster_query::query::format::{
    format_answer, ALL_SUBMITTED, NO_UPCOMING_QUIZZES,
};
use roster_query::{apply_scope, classify, Intent, QueryEngine, ScopeSpec, StudentRecord};

fn arb_record() -> impl Strategy<Value = StudentRecord> {
    (
        "[A-Z][a-z]{1,8}",
        prop::option::of(1i64..=12),
        prop::option::of("[a-cA-C]"),
        prop::option::of("(north|South|EAST|west)"),
        any::<bool>(),
        prop::option::of(0i64..=100),
        prop::option::of(0u64..30),
    )
        .prop_map(|(name, grade, class_label, region, submitted, score, offset)| StudentRecord {
            student_id: format!("id-{name}"),
            name,
            grade,
            class_label,
            region,
            homework_submitted: submitted,
            quiz_name: "Quiz".to_string(),
            quiz_date: offset.and_then(|d| base_day().checked_add_days(Days::new(d))),
            quiz_score: score,
            record_date: None,
        })
}

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn flip_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                c.to_uppercase().next().unwrap_or(c)
            }
        })
        .collect()
}

/// Property: an unrestricted scope is the identity on order and content.
#[test]
fn prop_unrestricted_scope_is_identity() {
    proptest!(|(records in prop::collection::vec(arb_record(), 0..20))| {
        let scoped: Vec<StudentRecord> = apply_scope(&records, &ScopeSpec::unrestricted())
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(scoped, records);
    });
}

/// Property: flipping the case of class and region in the scope does not
/// change which records pass.
#[test]
fn prop_scope_strings_ignore_case() {
    proptest!(|(
        records in prop::collection::vec(arb_record(), 0..20),
        class_label in "[a-cA-C]",
        region in "(north|South|EAST|west)",
    )| {
        let scope = ScopeSpec::unrestricted().with_class(class_label.clone()).with_region(region.clone());
        let flipped = ScopeSpec::unrestricted()
            .with_class(flip_case(&class_label))
            .with_region(flip_case(&region));

        let a: Vec<&str> = apply_scope(&records, &scope).iter().map(|r| r.name.as_str()).collect();
        let b: Vec<&str> = apply_scope(&records, &flipped).iter().map(|r| r.name.as_str()).collect();
        prop_assert_eq!(a, b);
    });
}

/// Property: any question carrying both a score trigger and a
/// homework-not trigger is a missing-homework question.
#[test]
fn prop_missing_homework_takes_precedence() {
    proptest!(|(
        prefix in "[a-z ]{0,10}",
        middle in "[a-z ]{0,10}",
        suffix in "[a-z ]{0,10}",
        negation in "(not|haven't|NOT|Haven't)",
        perf in "(score|performance|SCORE)",
        order in 0usize..3,
    )| {
        let question = match order {
            0 => format!("{prefix}{perf}{middle}homework {negation}{suffix}"),
            1 => format!("{prefix}homework{middle}{negation} {perf}{suffix}"),
            _ => format!("{prefix}{negation} {perf}{middle}HOMEWORK{suffix}"),
        };
        prop_assert_eq!(classify(&question), Intent::MissingHomework);
    });
}

/// Property: answering twice with identical inputs gives identical text.
#[test]
fn prop_answer_is_idempotent() {
    proptest!(|(
        records in prop::collection::vec(arb_record(), 0..15),
        question in "(Who hasn't submitted homework\\?|Show me performance|upcoming quiz|hello)",
    )| {
        let engine = QueryEngine::offline();
        let scope = ScopeSpec::unrestricted().with_grade(8);
        let first = engine.answer(&records, &scope, &question, base_day());
        let second = engine.answer(&records, &scope, &question, base_day());
        prop_assert_eq!(first, second);
    });
}

/// Property: an empty scoped set yields the sentinels, never an empty string.
#[test]
fn prop_empty_scope_yields_sentinels() {
    proptest!(|(year in 2000i32..2100, ordinal in 1u32..=365)| {
        let today = NaiveDate::from_yo_opt(year, ordinal).unwrap();
        let missing = format_answer(Intent::MissingHomework, &[], today);
        prop_assert_eq!(
            missing.as_deref(),
            Some(ALL_SUBMITTED)
        );
        let upcoming = format_answer(Intent::UpcomingQuizzes, &[], today);
        prop_assert_eq!(
            upcoming.as_deref(),
            Some(NO_UPCOMING_QUIZZES)
        );
    });
}
