use thiserror::Error;

/// Errors that can occur while loading and pivoting enrollment data
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// Source could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not a readable spreadsheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Workbook decoded but has no sheets to read
    #[error("Workbook has no sheets")]
    EmptyWorkbook,

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Aggregation failed inside polars
    #[error("Aggregation error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Source extension is not a known spreadsheet or CSV format
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error (unknown property, malformed config file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using EnrollmentError
pub type Result<T> = std::result::Result<T, EnrollmentError>;
