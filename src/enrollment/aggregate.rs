//! Term × department aggregation and pivoting
//!
//! Summation is done with a polars `group_by` on (term, department); the
//! grouped frame is then read back into a two-level map and pivoted into one
//! row per term that carries every department key.

use super::error::Result;
use super::records::{department_set, term_set, CleanedRecord};
use indexmap::IndexMap;
use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::debug;

/// Summed students keyed by term, then department
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationMatrix {
    cells: HashMap<String, HashMap<String, f64>>,
}

impl AggregationMatrix {
    /// Sum for a (term, department) pair, zero when the pair never occurs
    pub fn get(&self, term: &str, department: &str) -> f64 {
        self.cells
            .get(term)
            .and_then(|by_dep| by_dep.get(department))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of (term, department) pairs that occur in the data
    pub fn len(&self) -> usize {
        self.cells.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total over every department for one term
    pub fn term_total(&self, term: &str) -> f64 {
        self.cells
            .get(term)
            .map(|by_dep| by_dep.values().sum())
            .unwrap_or(0.0)
    }
}

/// Group cleaned records by term and department, summing students
pub fn aggregate(records: &[CleanedRecord]) -> Result<AggregationMatrix> {
    if records.is_empty() {
        return Ok(AggregationMatrix::default());
    }

    let terms: Vec<&str> = records.iter().map(|r| r.term.as_str()).collect();
    let departments: Vec<&str> = records.iter().map(|r| r.department.as_str()).collect();
    let students: Vec<f64> = records.iter().map(|r| r.students).collect();

    let df = df!(
        "term" => terms,
        "department" => departments,
        "students" => students,
    )?;

    let summed = df
        .lazy()
        .group_by([col("term"), col("department")])
        .agg([col("students").sum()])
        .collect()?;

    debug!(groups = summed.height(), "aggregated term/department groups");

    let term_col = summed.column("term")?.as_materialized_series().str()?;
    let dep_col = summed.column("department")?.as_materialized_series().str()?;
    let sum_col = summed.column("students")?.as_materialized_series().f64()?;

    let mut cells: HashMap<String, HashMap<String, f64>> = HashMap::new();
    for ((term, department), total) in term_col
        .into_iter()
        .zip(dep_col.into_iter())
        .zip(sum_col.into_iter())
    {
        if let (Some(term), Some(department)) = (term, department) {
            cells
                .entry(term.to_string())
                .or_default()
                .insert(department.to_string(), total.unwrap_or(0.0));
        }
    }

    Ok(AggregationMatrix { cells })
}

/// One row per term: the term plus a count for every department
#[derive(Debug, Clone, PartialEq)]
pub struct PivotedRow {
    pub term: String,
    pub values: IndexMap<String, f64>,
}

impl PivotedRow {
    /// Count for a department (zero if the key is unknown)
    pub fn value(&self, department: &str) -> f64 {
        self.values.get(department).copied().unwrap_or(0.0)
    }
}

/// Key holding the term label in serialized rows
const TERM_KEY: &str = "Term";

/// Serializes flat, as `{"Term": "F23", "CS": 10, "Math": 5}`. A department
/// named `Term` is left out so the key stays unique.
impl Serialize for PivotedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let departments = self.values.iter().filter(|(department, _)| *department != TERM_KEY);
        let mut map = serializer.serialize_map(Some(departments.clone().count() + 1))?;
        map.serialize_entry(TERM_KEY, &self.term)?;
        for (department, count) in departments {
            map.serialize_entry(department, count)?;
        }
        map.end()
    }
}

/// Build pivoted rows in term order, filling absent pairs with zero
pub fn pivot(
    terms: &[String],
    departments: &[String],
    matrix: &AggregationMatrix,
) -> Vec<PivotedRow> {
    terms
        .iter()
        .map(|term| PivotedRow {
            term: term.clone(),
            values: departments
                .iter()
                .map(|dep| (dep.clone(), matrix.get(term, dep)))
                .collect(),
        })
        .collect()
}

/// Everything the renderer needs, derived from the cleaned records
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub record_count: usize,
    pub terms: Vec<String>,
    pub departments: Vec<String>,
    pub matrix: AggregationMatrix,
    pub rows: Vec<PivotedRow>,
}

impl Enrollment {
    /// Derive term/department sets, aggregate and pivot
    pub fn from_records(records: &[CleanedRecord]) -> Result<Self> {
        let terms = term_set(records);
        let departments = department_set(records);
        let matrix = aggregate(records)?;
        let rows = pivot(&terms, &departments, &matrix);

        Ok(Self {
            record_count: records.len(),
            terms,
            departments,
            matrix,
            rows,
        })
    }
}
