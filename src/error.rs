//! Error types for loading and aggregating tracker data

use thiserror::Error;

pub type InsightResult<T> = Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    /// Grouping or sorting on a column the table does not have
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("row {row}: '{value}' is not a known application status")]
    UnknownStatus { row: usize, value: String },

    #[error("row {row}: '{value}' is not a known cover letter value")]
    UnknownCoverLetter { row: usize, value: String },

    #[error("sheet '{sheet}', row {row}, column '{column}': expected a number, found '{value}'")]
    MalformedNumber {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: '{value}' does not match date format '{format}'")]
    MalformedDate {
        row: usize,
        value: String,
        format: String,
    },

    #[error("response times from {min} to {max} days need more than {limit} histogram bins")]
    HistogramRange { min: f64, max: f64, limit: usize },

    #[error("no {0} to aggregate")]
    EmptyInput(&'static str),

    #[error("division by zero computing {0}")]
    DivisionByZero(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
