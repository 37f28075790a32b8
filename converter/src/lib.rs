//! # Casecounts - daily case series to hourly SEIHRD counts
//!
//! Casecounts turns a COVID dashboard export (daily cumulative cases and
//! deaths for one region) into the hourly compartment counts file the
//! epidemic simulation engine works with.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Daily CSV  │────▶│   Parser    │────▶│  Transform  │────▶│ Hourly CSV  │
//! │ (dashboard) │     │  (auto-enc) │     │ (day → 24h) │     │  (SEIHRD)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use casecounts::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let summary = convert_file(
//!     Path::new("york_actual_cases.csv"),
//!     Path::new("york_formatted_actual_cases.csv"),
//!     &ConvertOptions::default(),
//! ).unwrap();
//! println!("Wrote {} hourly rows", summary.hourly_rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Input, daily and hourly row types
//! - [`config`] - Population, epoch and indexing options
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Daily derivation, hourly expansion, pipeline
//! - [`validation`] - Series invariant checks
//! - [`output`] - Hourly counts CSV reading and writing
//! - [`logs`] - Pipeline log helpers

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod output;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    CsvError,
    ErrorKind,
    FieldError,
    OutputError,
    PipelineError,
    TransformError,
    ValidationError,
};

// =============================================================================
// Re-exports - Models and configuration
// =============================================================================

pub use models::{CompartmentCounts, DailyCaseRecord, DailySnapshot, HOURS_PER_DAY};

pub use config::{ConversionConfig, HourIndexing, RowOrder, DEFAULT_EPOCH, DEFAULT_POPULATION};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes_auto,
    parse_csv_file_auto,
    parse_daily_csv,
    ParseResult,
    REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{derive_daily, expand_hourly};

pub use transform::pipeline::{
    convert_bytes,
    convert_file,
    convert_records,
    format_delimiter,
    ConversionResult,
    ConversionSummary,
    ConvertOptions,
    CsvInfo,
};

// =============================================================================
// Re-exports - Validation and output
// =============================================================================

pub use validation::{is_valid_series, validate_series};

pub use output::{counts_to_csv_string, read_counts, read_counts_file, write_counts, write_counts_file};
