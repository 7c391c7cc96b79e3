//! Enrollment row records and cleaning rules
//!
//! A sheet row arrives as a [`RawRecord`] (header name → cell). Cleaning maps
//! every raw record to exactly one [`CleanedRecord`]; nothing is filtered out.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A single spreadsheet cell, reduced to the shapes the cleaning rules care about
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Build a cell from raw text (CSV fields are always text)
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }

    /// Falsy in the loose sense the department default relies on:
    /// empty, blank text, zero, NaN and `false`
    fn is_falsy(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Bool(b) => !b,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One sheet row: header name → cell value, in column order
pub type RawRecord = IndexMap<String, CellValue>;

/// Names of the three consumed columns
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConfig {
    pub term: String,
    pub department: String,
    pub students: String,
    /// Label used when the department cell is missing or blank
    pub default_department: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            term: "Term".to_string(),
            department: "Department".to_string(),
            students: "Student_Count".to_string(),
            default_department: "Unknown".to_string(),
        }
    }
}

/// A normalized enrollment record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    pub term: String,
    pub department: String,
    pub students: f64,
}

/// Coerce a student-count cell to a number.
///
/// Numbers pass through unchanged (including negative and fractional values),
/// numeric text is trimmed and parsed, `true`/`false` count as 1/0. Anything
/// else (missing, blank, non-numeric text, non-finite) becomes 0.
pub fn coerce_students(cell: Option<&CellValue>) -> f64 {
    let value = match cell {
        None | Some(CellValue::Empty) => 0.0,
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(CellValue::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Clean one raw record
pub fn clean_record(raw: &RawRecord, columns: &ColumnConfig) -> CleanedRecord {
    let term = raw
        .get(&columns.term)
        .map(|c| c.to_string())
        .unwrap_or_default();

    let department = match raw.get(&columns.department) {
        Some(cell) if !cell.is_falsy() => cell.to_string(),
        _ => columns.default_department.clone(),
    };

    let students = coerce_students(raw.get(&columns.students));

    CleanedRecord {
        term,
        department,
        students,
    }
}

/// Clean every raw record, one output per input
pub fn clean_records(raw: &[RawRecord], columns: &ColumnConfig) -> Vec<CleanedRecord> {
    raw.iter().map(|r| clean_record(r, columns)).collect()
}

/// Distinct terms, sorted ascending (x-axis order)
pub fn term_set(records: &[CleanedRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.term.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct departments in first-seen order (stack and legend order)
pub fn department_set(records: &[CleanedRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.department.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, CellValue)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_coerce_students() {
        assert_eq!(coerce_students(Some(&text("42"))), 42.0);
        assert_eq!(coerce_students(Some(&text(" 17 "))), 17.0);
        assert_eq!(coerce_students(Some(&CellValue::Number(-3.0))), -3.0);
        assert_eq!(coerce_students(Some(&text("-3"))), -3.0);
        assert_eq!(coerce_students(Some(&CellValue::Number(2.5))), 2.5);

        assert_eq!(coerce_students(None), 0.0);
        assert_eq!(coerce_students(Some(&CellValue::Empty)), 0.0);
        assert_eq!(coerce_students(Some(&text("abc"))), 0.0);
        assert_eq!(coerce_students(Some(&text("   "))), 0.0);
        assert_eq!(coerce_students(Some(&text("NaN"))), 0.0);
        assert_eq!(coerce_students(Some(&text("inf"))), 0.0);

        assert_eq!(coerce_students(Some(&CellValue::Bool(true))), 1.0);
        assert_eq!(coerce_students(Some(&CellValue::Bool(false))), 0.0);
    }

    #[test]
    fn test_missing_department_is_unknown() {
        let columns = ColumnConfig::default();

        let missing = raw(&[("Term", text("F23")), ("Student_Count", text("4"))]);
        assert_eq!(clean_record(&missing, &columns).department, "Unknown");

        let blank = raw(&[("Term", text("F23")), ("Department", CellValue::Empty)]);
        assert_eq!(clean_record(&blank, &columns).department, "Unknown");

        let zero = raw(&[("Department", CellValue::Number(0.0))]);
        assert_eq!(clean_record(&zero, &columns).department, "Unknown");
    }

    #[test]
    fn test_clean_record_fields() {
        let columns = ColumnConfig::default();
        let record = raw(&[
            ("Term", CellValue::Number(2023.0)),
            ("Department", text("CS")),
            ("Student_Count", text("10")),
            ("Ignored", text("whatever")),
        ]);

        let cleaned = clean_record(&record, &columns);
        assert_eq!(cleaned.term, "2023");
        assert_eq!(cleaned.department, "CS");
        assert_eq!(cleaned.students, 10.0);
    }

    #[test]
    fn test_missing_term_becomes_empty_label() {
        let columns = ColumnConfig::default();
        let record = raw(&[("Department", text("CS"))]);
        assert_eq!(clean_record(&record, &columns).term, "");
    }

    #[test]
    fn test_custom_columns() {
        let columns = ColumnConfig {
            term: "Semester".to_string(),
            department: "Dept".to_string(),
            students: "Headcount".to_string(),
            default_department: "Other".to_string(),
        };
        let record = raw(&[("Semester", text("S24")), ("Headcount", text("7"))]);

        let cleaned = clean_record(&record, &columns);
        assert_eq!(cleaned.term, "S24");
        assert_eq!(cleaned.department, "Other");
        assert_eq!(cleaned.students, 7.0);
    }

    #[test]
    fn test_term_set_sorted_and_unique() {
        let records: Vec<CleanedRecord> = ["S24", "F23", "S24", "F22", "F23"]
            .iter()
            .map(|t| CleanedRecord {
                term: t.to_string(),
                department: "CS".to_string(),
                students: 1.0,
            })
            .collect();

        let terms = term_set(&records);
        assert_eq!(terms, vec!["F22", "F23", "S24"]);
        assert!(terms.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_department_set_first_seen_order() {
        let records: Vec<CleanedRecord> = ["Math", "CS", "Math", "EE", "CS"]
            .iter()
            .map(|d| CleanedRecord {
                term: "F23".to_string(),
                department: d.to_string(),
                students: 1.0,
            })
            .collect();

        assert_eq!(department_set(&records), vec!["Math", "CS", "EE"]);
    }

    #[test]
    fn test_one_cleaned_record_per_raw_record() {
        let columns = ColumnConfig::default();
        let rows = vec![raw(&[]), raw(&[("Term", text("F23"))]), raw(&[])];
        assert_eq!(clean_records(&rows, &columns).len(), 3);
    }
}
