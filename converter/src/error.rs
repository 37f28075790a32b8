//! Error types for the case series conversion pipeline.
//!
//! Errors are layered the same way the pipeline is:
//!
//! - [`CsvError`] - reading and decoding the daily dashboard CSV
//! - [`TransformError`] - deriving and expanding the daily rows
//! - [`ConfigError`] - loading and checking the conversion configuration
//! - [`OutputError`] - writing or reading back the hourly counts CSV
//! - [`ValidationError`] - invariant checks on the produced series
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Every layer converts into [`PipelineError`] via `From`, so `?` works across
//! the boundaries. [`PipelineError::kind`] folds the variants back into the four
//! coarse classes callers care about (IO, format, parse, value).

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Error classification
// =============================================================================

/// Coarse error class, independent of which layer raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File not found, unreadable or unwritable.
    Io,
    /// Missing or malformed column, duplicate dates.
    Format,
    /// Unparsable date.
    Parse,
    /// Value outside the accepted domain (cases above population, date before epoch).
    Value,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "IOError",
            ErrorKind::Format => "FormatError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Value => "ValueError",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Located field errors
// =============================================================================

/// A problem with one field of one CSV line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => write!(f, "Line {}, column '{}': {}", self.line, col, self.message),
            _ => write!(f, "Line {}: {}", self.line, self.message),
        }
    }
}

impl FieldError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading the daily case CSV.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Empty file (not even a header).
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required column is absent from the header.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A field holds a value of the wrong shape.
    #[error("Invalid field: {0}")]
    Format(FieldError),

    /// A date field could not be parsed.
    #[error("Unparsable date: {0}")]
    Date(FieldError),

    /// The csv reader rejected the input.
    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

impl CsvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsvError::Io(_) => ErrorKind::Io,
            CsvError::Date(_) => ErrorKind::Parse,
            CsvError::Malformed(e) if e.is_io_error() => ErrorKind::Io,
            CsvError::EmptyFile
            | CsvError::MissingColumn(_)
            | CsvError::Format(_)
            | CsvError::Malformed(_) => ErrorKind::Format,
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while deriving or expanding the daily rows.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Cumulative cases exceed the configured population.
    #[error("Cumulative cases {cumulative} on {date} exceed population {population}")]
    CasesExceedPopulation {
        date: NaiveDate,
        cumulative: u32,
        population: u32,
    },

    /// Two rows share a date.
    #[error("Duplicate date in input: {0}")]
    DuplicateDate(NaiveDate),

    /// Calendar hour indexing cannot represent a date before the epoch.
    #[error("Date {date} precedes epoch {epoch}")]
    BeforeEpoch { date: NaiveDate, epoch: NaiveDate },

    /// Hour index does not fit the output column.
    #[error("Hour index overflow at {0}")]
    HourOverflow(NaiveDate),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::DuplicateDate(_) => ErrorKind::Format,
            TransformError::CasesExceedPopulation { .. }
            | TransformError::BeforeEpoch { .. }
            | TransformError::HourOverflow(_) => ErrorKind::Value,
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from loading or checking a [`crate::config::ConversionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Io(_) => ErrorKind::Io,
            ConfigError::Json(_) => ErrorKind::Format,
            ConfigError::Invalid(_) => ErrorKind::Value,
        }
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors writing or reading back the hourly counts CSV.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Header of a counts file read back does not match the expected columns.
    #[error("Unexpected counts header: {0:?}")]
    Header(Vec<String>),
}

impl OutputError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OutputError::Io(_) | OutputError::Persist(_) => ErrorKind::Io,
            OutputError::Csv(e) if e.is_io_error() => ErrorKind::Io,
            OutputError::Csv(_) | OutputError::Header(_) => ErrorKind::Format,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// The produced series broke one of its invariants.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Series validation failed: {}", .errors.join("; "))]
    SeriesInvalid { errors: Vec<String> },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline`] entry points.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    /// Coarse class of the underlying failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Csv(e) => e.kind(),
            PipelineError::Transform(e) => e.kind(),
            PipelineError::Config(e) => e.kind(),
            PipelineError::Output(e) => e.kind(),
            PipelineError::Validation(_) => ErrorKind::Value,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type CsvResult<T> = Result<T, CsvError>;

pub type TransformResult<T> = Result<T, TransformError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

pub type OutputResult<T> = Result<T, OutputError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
