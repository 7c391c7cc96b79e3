//! Enrollment data module
//!
//! Everything between the input file and the pivoted rows the chart consumes.
//!
//! Structure:
//! - `source.rs`: reading spreadsheet/CSV bytes into raw records
//! - `records.rs`: raw and cleaned records, cleaning rules
//! - `aggregate.rs`: polars grouping and pivoting
//! - `properties.rs`: property registry (streamgraph.json) and reader
//! - `palettes.rs`: categorical palettes (palettes.json)
//! - `error.rs`: error types

pub mod aggregate;
pub mod error;
pub mod palettes;
pub mod properties;
pub mod records;
pub mod source;

// Re-exports for convenience
pub use aggregate::{aggregate, pivot, AggregationMatrix, Enrollment, PivotedRow};
pub use error::{EnrollmentError, Result};
pub use palettes::{PaletteDefinition, PALETTE_REGISTRY};
pub use properties::{registry, PropertyReader};
pub use records::{
    clean_record, clean_records, coerce_students, department_set, term_set, CellValue,
    CleanedRecord, ColumnConfig, RawRecord,
};
pub use source::{parse_bytes, read_source, SourceFormat};
