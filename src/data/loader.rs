use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use super::model::{Roster, StudentRecord};
use crate::error::LoadError;

/// Column names recognised in the dataset header.
pub const COL_STUDENT_ID: &str = "student_id";
pub const COL_NAME: &str = "name";
pub const COL_GRADE: &str = "grade";
pub const COL_CLASS: &str = "class";
pub const COL_REGION: &str = "region";
pub const COL_HOMEWORK: &str = "homework_submitted";
pub const COL_QUIZ_NAME: &str = "quiz_name";
pub const COL_QUIZ_DATE: &str = "quiz_date";
pub const COL_QUIZ_SCORE: &str = "quiz_score";
pub const COL_DATE: &str = "date";

pub const COLUMNS: [&str; 10] = [
    COL_STUDENT_ID,
    COL_NAME,
    COL_GRADE,
    COL_CLASS,
    COL_REGION,
    COL_HOMEWORK,
    COL_QUIZ_NAME,
    COL_QUIZ_DATE,
    COL_QUIZ_SCORE,
    COL_DATE,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a roster from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.tsv`  – tab-delimited with a header row
/// * `.json` – `[{ "student_id": "S1", "name": "Alice", ... }, ...]`
/// * anything else is read as comma-delimited with a header row
///
/// Only an unreadable source fails the load. Cells that do not parse
/// degrade to null/false and the row is kept.
pub fn load_file(path: &Path) -> Result<Roster, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let roster = match ext.as_str() {
        "json" => load_json(path)?,
        "tsv" => load_delimited(path, b'\t')?,
        _ => load_delimited(path, b',')?,
    };

    log::info!(
        "Loaded {} records from {} ({} degraded fields)",
        roster.len(),
        path.display(),
        roster.degraded_fields()
    );
    Ok(roster)
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Roster, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::unavailable(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| LoadError::unavailable(path, e))?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();

    let mut column_index: HashMap<&str, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        column_index.entry(header.as_str()).or_insert(idx);
    }
    warn_missing_columns(path, |col| column_index.contains_key(col));

    let mut parser = RowParser::default();
    let mut records = Vec::new();
    let mut row = csv::ByteRecord::new();

    // With a flexible byte reader only I/O failures remain, and those end the load.
    while reader
        .read_byte_record(&mut row)
        .map_err(|e| LoadError::unavailable(path, e))?
    {
        let row_no = records.len();
        let raw = RawFields::from_lookup(|col| {
            column_index
                .get(col)
                .and_then(|&idx| row.get(idx))
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        });
        records.push(parser.record(row_no, raw));
    }

    Ok(Roster::from_records(records).with_load_info(path, parser.degraded))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "student_id": "S1", "name": "Alice", "grade": 8, "class": "A",
///     "region": "North", "homework_submitted": false, "quiz_name": "Algebra",
///     "quiz_date": "2024-05-01", "quiz_score": 72, "date": "2024-04-28" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Roster, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::unavailable(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| LoadError::malformed(path, format!("invalid JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::malformed(path, "expected a top-level array of records"))?;

    let first_object = rows.iter().find_map(|r| r.as_object());
    if let Some(obj) = first_object {
        warn_missing_columns(path, |col| obj.contains_key(col));
    }

    let mut parser = RowParser::default();
    let mut records = Vec::with_capacity(rows.len());

    for (row_no, value) in rows.iter().enumerate() {
        let raw = match value.as_object() {
            Some(obj) => RawFields::from_lookup(|col| obj.get(col).and_then(json_cell)),
            None => {
                log::debug!("row {row_no}: not a JSON object, all fields treated as null");
                parser.degraded += 1;
                RawFields::default()
            }
        };
        records.push(parser.record(row_no, raw));
    }

    Ok(Roster::from_records(records).with_load_info(path, parser.degraded))
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn warn_missing_columns(path: &Path, present: impl Fn(&str) -> bool) {
    let missing: Vec<&str> = COLUMNS.iter().copied().filter(|c| !present(c)).collect();
    if !missing.is_empty() {
        log::warn!(
            "{} is missing columns {:?}; those fields load as null",
            path.display(),
            missing
        );
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Raw cell text for one row, keyed by the recognised columns.
#[derive(Debug, Default)]
struct RawFields {
    student_id: Option<String>,
    name: Option<String>,
    grade: Option<String>,
    class_label: Option<String>,
    region: Option<String>,
    homework_submitted: Option<String>,
    quiz_name: Option<String>,
    quiz_date: Option<String>,
    quiz_score: Option<String>,
    record_date: Option<String>,
}

impl RawFields {
    fn from_lookup(mut cell: impl FnMut(&str) -> Option<String>) -> Self {
        RawFields {
            student_id: cell(COL_STUDENT_ID),
            name: cell(COL_NAME),
            grade: cell(COL_GRADE),
            class_label: cell(COL_CLASS),
            region: cell(COL_REGION),
            homework_submitted: cell(COL_HOMEWORK),
            quiz_name: cell(COL_QUIZ_NAME),
            quiz_date: cell(COL_QUIZ_DATE),
            quiz_score: cell(COL_QUIZ_SCORE),
            record_date: cell(COL_DATE),
        }
    }
}

/// Turns raw cells into typed fields, counting every cell that had to be
/// degraded.
#[derive(Debug, Default)]
struct RowParser {
    degraded: usize,
}

impl RowParser {
    fn record(&mut self, row: usize, raw: RawFields) -> StudentRecord {
        StudentRecord {
            student_id: text(raw.student_id),
            name: text(raw.name),
            grade: self.integer(row, COL_GRADE, raw.grade.as_deref()),
            class_label: non_empty(raw.class_label),
            region: non_empty(raw.region),
            homework_submitted: self.boolean(row, raw.homework_submitted.as_deref()),
            quiz_name: text(raw.quiz_name),
            quiz_date: self.date(row, COL_QUIZ_DATE, raw.quiz_date.as_deref()),
            quiz_score: self.integer(row, COL_QUIZ_SCORE, raw.quiz_score.as_deref()),
            record_date: self.date(row, COL_DATE, raw.record_date.as_deref()),
        }
    }

    fn integer(&mut self, row: usize, column: &str, raw: Option<&str>) -> Option<i64> {
        let value = raw.map(str::trim).filter(|s| !s.is_empty())?;
        let parsed = parse_integer(value);
        if parsed.is_none() {
            self.degrade(row, column, value);
        }
        parsed
    }

    fn date(&mut self, row: usize, column: &str, raw: Option<&str>) -> Option<NaiveDate> {
        let value = raw.map(str::trim).filter(|s| !s.is_empty())?;
        let parsed = parse_date(value);
        if parsed.is_none() {
            self.degrade(row, column, value);
        }
        parsed
    }

    fn boolean(&mut self, row: usize, raw: Option<&str>) -> bool {
        let value = raw.map(str::trim).unwrap_or("");
        let lowered = value.to_ascii_lowercase();
        if !matches!(lowered.as_str(), "" | "true" | "1" | "yes" | "false" | "0" | "no") {
            self.degrade(row, COL_HOMEWORK, value);
        }
        parse_bool(value)
    }

    fn degrade(&mut self, row: usize, column: &str, value: &str) {
        self.degraded += 1;
        log::debug!("row {row}: {column} value {value:?} did not parse, treated as null/false");
    }
}

fn text(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// `true`, `1` and `yes` (any case) are true; everything else is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Strict `YYYY-MM-DD`; `None` on any failure.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Whole numbers, including the `85.0` form that DataFrame exports write
/// for integer columns containing gaps.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(i);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}
