use chrono::NaiveDate;

use super::format::format_answer;
use super::intent::classify;
use crate::data::model::StudentRecord;
use crate::data::scope::{apply_scope, ScopeSpec};
use crate::fallback::{FallbackResponder, OfflineResponder};

/// Scope → classify → format, or fall back for unclassified questions.
///
/// Holds no records: callers pass the roster on every call, so one engine
/// can serve any number of rosters and concurrent readers.
pub struct QueryEngine {
    fallback: Box<dyn FallbackResponder>,
}

impl QueryEngine {
    pub fn new(fallback: Box<dyn FallbackResponder>) -> Self {
        QueryEngine { fallback }
    }

    /// Engine whose fallback never leaves the process.
    pub fn offline() -> Self {
        Self::new(Box::new(OfflineResponder))
    }

    pub fn fallback_name(&self) -> &str {
        self.fallback.name()
    }

    /// Answer `question` over the records visible through `scope`.
    pub fn answer(
        &self,
        records: &[StudentRecord],
        scope: &ScopeSpec,
        question: &str,
        today: NaiveDate,
    ) -> String {
        let scoped = apply_scope(records, scope);
        log::debug!("{} of {} records in scope ({scope})", scoped.len(), records.len());
        self.answer_scoped(&scoped, question, today)
    }

    /// Answer over records the caller has already scoped.
    pub fn answer_scoped(&self, scoped: &[&StudentRecord], question: &str, today: NaiveDate) -> String {
        let intent = classify(question);
        log::debug!("question classified as {intent}");

        match format_answer(intent, scoped, today) {
            Some(answer) => answer,
            None => self.ask_fallback(question),
        }
    }

    fn ask_fallback(&self, question: &str) -> String {
        match self.fallback.respond(question) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("fallback responder {} failed: {e}", self.fallback.name());
                format!("Error: {e}")
            }
        }
    }
}
