use std::fmt;

use serde::Deserialize;

use super::model::StudentRecord;

// ---------------------------------------------------------------------------
// Scope predicate: the caller's authorised view of the roster
// ---------------------------------------------------------------------------

/// Optional (grade, class, region) restriction.
///
/// An absent dimension means "no restriction", not "match only empty
/// values". Class and region compare case-insensitively, grade exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScopeSpec {
    pub grade: Option<i64>,
    #[serde(rename = "class")]
    pub class_label: Option<String>,
    pub region: Option<String>,
}

impl ScopeSpec {
    pub fn new(grade: Option<i64>, class_label: Option<String>, region: Option<String>) -> Self {
        ScopeSpec {
            grade,
            class_label,
            region,
        }
    }

    /// Scope with every dimension open.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Build from front-end inputs; blank text boxes mean "no restriction".
    pub fn from_inputs(grade: Option<i64>, class_label: &str, region: &str) -> Self {
        ScopeSpec {
            grade,
            class_label: non_blank(class_label),
            region: non_blank(region),
        }
    }

    pub fn with_grade(mut self, grade: i64) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn with_class(mut self, class_label: impl Into<String>) -> Self {
        self.class_label = Some(class_label.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.grade.is_none() && self.class_label.is_none() && self.region.is_none()
    }

    /// Whether `record` passes every active dimension. A record with a
    /// null field never passes an active dimension on that field.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        if let Some(grade) = self.grade {
            if record.grade != Some(grade) {
                return false;
            }
        }
        if let Some(class_label) = &self.class_label {
            if !eq_ignore_case(record.class_label.as_deref(), class_label) {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if !eq_ignore_case(record.region.as_deref(), region) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for ScopeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return write!(f, "all students");
        }
        let mut parts = Vec::new();
        if let Some(grade) = self.grade {
            parts.push(format!("grade {grade}"));
        }
        if let Some(class_label) = &self.class_label {
            parts.push(format!("class {class_label}"));
        }
        if let Some(region) = &self.region {
            parts.push(format!("region {region}"));
        }
        write!(f, "{}", parts.join(", "))
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn eq_ignore_case(field: Option<&str>, wanted: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase() == wanted.to_lowercase())
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records passing `scope`, in input order.
pub fn apply_scope<'a>(records: &'a [StudentRecord], scope: &ScopeSpec) -> Vec<&'a StudentRecord> {
    records.iter().filter(|r| scope.matches(r)).collect()
}

/// Indices of records passing `scope`, in input order.
pub fn scoped_indices(records: &[StudentRecord], scope: &ScopeSpec) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| scope.matches(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, grade: Option<i64>, class: Option<&str>, region: Option<&str>) -> StudentRecord {
        StudentRecord {
            name: name.to_string(),
            grade,
            class_label: class.map(String::from),
            region: region.map(String::from),
            ..Default::default()
        }
    }

    fn names(records: &[&StudentRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn unrestricted_scope_keeps_everything_in_order() {
        let records = vec![
            record("Alice", Some(8), Some("A"), Some("North")),
            record("Bob", None, None, None),
            record("Cara", Some(9), Some("B"), Some("South")),
        ];
        let scoped = apply_scope(&records, &ScopeSpec::unrestricted());
        assert_eq!(names(&scoped), vec!["Alice", "Bob", "Cara"]);
    }

    #[test]
    fn string_dimensions_ignore_case() {
        let records = vec![
            record("Alice", Some(8), Some("a"), Some("NORTH")),
            record("Bob", Some(8), Some("B"), Some("north")),
        ];
        let scope = ScopeSpec::unrestricted().with_class("A").with_region("North");
        assert_eq!(names(&apply_scope(&records, &scope)), vec!["Alice"]);
    }

    #[test]
    fn grade_is_exact() {
        let records = vec![
            record("Alice", Some(8), None, None),
            record("Bob", Some(9), None, None),
        ];
        let scope = ScopeSpec::unrestricted().with_grade(9);
        assert_eq!(scoped_indices(&records, &scope), vec![1]);
    }

    #[test]
    fn null_fields_fail_active_dimensions_only() {
        let records = vec![record("Alice", None, None, None)];

        assert!(apply_scope(&records, &ScopeSpec::unrestricted().with_region("North")).is_empty());
        assert!(apply_scope(&records, &ScopeSpec::unrestricted().with_grade(8)).is_empty());
        assert!(apply_scope(&records, &ScopeSpec::unrestricted().with_class("A")).is_empty());
        assert_eq!(apply_scope(&records, &ScopeSpec::unrestricted()).len(), 1);
    }

    #[test]
    fn blank_inputs_mean_unrestricted() {
        let scope = ScopeSpec::from_inputs(None, "  ", "");
        assert!(scope.is_unrestricted());
        assert_eq!(scope.to_string(), "all students");

        let scope = ScopeSpec::from_inputs(Some(8), " A ", "North");
        assert_eq!(scope.class_label.as_deref(), Some("A"));
        assert_eq!(scope.to_string(), "grade 8, class A, region North");
    }
}
