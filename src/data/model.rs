use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// StudentRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single student row. Never mutated after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRecord {
    /// Opaque identifier; duplicates are kept as separate records.
    pub student_id: String,
    pub name: String,
    /// Expected 1–12, not validated. `None` when missing or unparsable.
    pub grade: Option<i64>,
    /// Matched case-insensitively. `None` for an empty cell.
    pub class_label: Option<String>,
    /// Matched case-insensitively. `None` for an empty cell.
    pub region: Option<String>,
    pub homework_submitted: bool,
    /// May be empty.
    pub quiz_name: String,
    pub quiz_date: Option<NaiveDate>,
    pub quiz_score: Option<i64>,
    /// The `date` column.
    pub record_date: Option<NaiveDate>,
}

impl StudentRecord {
    /// Class label normalised for grouping (upper case, `?` when absent).
    pub fn class_key(&self) -> String {
        self.class_label
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "?".to_string())
    }
}

// ---------------------------------------------------------------------------
// Roster – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset in input row order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<StudentRecord>,
    /// Number of cells that failed to parse and were degraded to null/false.
    degraded_fields: usize,
    source: Option<PathBuf>,
}

impl Roster {
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        Roster {
            records,
            degraded_fields: 0,
            source: None,
        }
    }

    pub(crate) fn with_load_info(mut self, source: &Path, degraded_fields: usize) -> Self {
        self.source = Some(source.to_path_buf());
        self.degraded_fields = degraded_fields;
        self
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn degraded_fields(&self) -> usize {
        self.degraded_fields
    }

    /// File the roster was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Sorted set of normalised class labels, used for colouring.
    pub fn class_keys(&self) -> BTreeSet<String> {
        self.records.iter().map(StudentRecord::class_key).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
