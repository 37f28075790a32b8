//! High-level pipeline API: daily dashboard CSV to hourly counts CSV.
//!
//! Combines every step: parsing, ordering and derivation, hourly expansion,
//! series validation and the atomic write.
//!
//! # Example
//!
//! ```rust,ignore
//! use casecounts::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = convert_file(
//!         Path::new("york_actual_cases.csv"),
//!         Path::new("york_formatted_actual_cases.csv"),
//!         &ConvertOptions::default(),
//!     )?;
//!
//!     println!("Wrote {} hourly rows", summary.hourly_rows);
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::daily::derive_daily;
use super::expand::expand_hourly;
use crate::config::{ConversionConfig, HourIndexing, RowOrder};
use crate::error::{PipelineResult, ValidationError};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{CompartmentCounts, DailyCaseRecord, DailySnapshot};
use crate::output::write_counts_file;
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};
use crate::validation::validate_series;

/// Options for the conversion pipeline
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub config: ConversionConfig,

    /// Skip the series invariant checks before writing.
    pub skip_validation: bool,
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// In-memory result of a conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Hourly rows, in output order.
    pub counts: Vec<CompartmentCounts>,
    /// Daily snapshots the hourly rows were expanded from, ascending by date.
    pub days: Vec<DailySnapshot>,
    pub csv_info: CsvInfo,
}

/// What a file conversion produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub csv_info: CsvInfo,
    pub output: PathBuf,
    pub daily_rows: usize,
    pub hourly_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub first_hour: Option<u32>,
    pub last_hour: Option<u32>,
}

impl ConversionSummary {
    fn new(result: &ConversionResult, output: &Path) -> Self {
        Self {
            csv_info: result.csv_info.clone(),
            output: output.to_path_buf(),
            daily_rows: result.days.len(),
            hourly_rows: result.counts.len(),
            first_date: result.days.first().map(|d| d.date),
            last_date: result.days.last().map(|d| d.date),
            first_hour: result.counts.first().map(|c| c.hour),
            last_hour: result.counts.last().map(|c| c.hour),
        }
    }
}

/// Convert a daily case CSV file into an hourly counts CSV file.
///
/// Nothing is written unless every step succeeds.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> PipelineResult<ConversionSummary> {
    options.config.validate()?;

    log_info(format!("📖 Reading {}", input.display()));
    let parse_result = parse_csv_file_auto(input)?;
    let result = convert_parsed(parse_result, options)?;

    log_info(format!("💾 Writing {}", output.display()));
    write_counts_file(output, &result.counts)?;
    log_success(format!("Wrote {} hourly rows", result.counts.len()));

    Ok(ConversionSummary::new(&result, output))
}

/// Convert raw CSV bytes in memory.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> PipelineResult<ConversionResult> {
    options.config.validate()?;
    let parse_result = parse_bytes_auto(bytes)?;
    convert_parsed(parse_result, options)
}

/// Convert already-parsed records, validating the result.
pub fn convert_records(records: Vec<DailyCaseRecord>, config: &ConversionConfig) -> PipelineResult<Vec<CompartmentCounts>> {
    config.validate()?;
    let days = derive_daily(records, config)?;
    let counts = expand_hourly(&days, config.hour_indexing)?;
    check_series(&counts, &days, config.hour_indexing)?;
    Ok(counts)
}

fn convert_parsed(parse_result: ParseResult, options: &ConvertOptions) -> PipelineResult<ConversionResult> {
    let config = &options.config;

    log_success(format!("Detected encoding: {}", parse_result.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parse_result.delimiter)));
    log_success(format!("Read {} daily rows", parse_result.records.len()));

    let csv_info = CsvInfo {
        encoding: parse_result.encoding,
        delimiter: parse_result.delimiter,
        headers: parse_result.headers,
        row_count: parse_result.records.len(),
    };

    if parse_result.records.is_empty() {
        log_warning("Input has no data rows, output will hold only the header");
    }

    log_info(format!(
        "⚙️  Deriving daily compartments (population {}, epoch {})",
        config.population, config.epoch_date
    ));
    if config.row_order == RowOrder::Reverse {
        log_warning("Reversing file order instead of sorting by date");
    }
    let days = derive_daily(parse_result.records, config)?;
    print_daily_summary(&days);

    log_info(format!("⏱️  Expanding to hourly rows ({:?} hours)", config.hour_indexing));
    let counts = expand_hourly(&days, config.hour_indexing)?;
    log_success(format!("Generated {} hourly rows", counts.len()));

    if options.skip_validation {
        log_info("(validation skipped)");
    } else {
        log_info("✔️  Validating series...");
        check_series(&counts, &days, config.hour_indexing)?;
        log_success("Series valid");
    }

    Ok(ConversionResult { counts, days, csv_info })
}

fn check_series(counts: &[CompartmentCounts], days: &[DailySnapshot], indexing: HourIndexing) -> PipelineResult<()> {
    if let Err(errors) = validate_series(counts, days, indexing) {
        for error in &errors {
            log_error(format!("✗ {}", error));
        }
        return Err(ValidationError::SeriesInvalid { errors }.into());
    }
    Ok(())
}

fn print_daily_summary(days: &[DailySnapshot]) {
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return;
    };

    let new_cases: u64 = days.iter().map(|d| u64::from(d.infected)).sum();
    log_success(format!("{} days from {} to {}", days.len(), first.date, last.date));
    log_info_indent(format!("new cases over the period: {}", new_cases), 1);
    log_info_indent(
        format!("susceptible {} → {}, deceased {} → {}", first.susceptible, last.susceptible, first.deceased, last.deceased),
        1,
    );
}

/// Printable form of a detected delimiter.
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PipelineError};

    const HEADER: &str = "areaCode,areaName,areaType,date,cumCasesBySpecimenDate,newCasesBySpecimenDate,cumDeaths28DaysByDeathDate";

    fn york_csv() -> String {
        format!(
            "{}\nE06000014,York,utla,2020-01-31,5,5,1\nE06000014,York,utla,2020-01-30,0,0,\n",
            HEADER
        )
    }

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert!(!opts.skip_validation);
        assert_eq!(opts.config.population, 198051);
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter(','), ",");
        assert_eq!(format_delimiter('\t'), "\\t");
    }

    #[test]
    fn test_reference_example() {
        let result = convert_bytes(york_csv().as_bytes(), &ConvertOptions::default()).unwrap();

        assert_eq!(result.counts.len(), 48);
        assert_eq!(result.csv_info.row_count, 2);
        for (i, row) in result.counts.iter().enumerate() {
            assert_eq!(row.hour as usize, i);
            let expected = if i < 24 {
                [198051, 0, 0, 0, 0, 0]
            } else {
                [198046, 0, 5, 0, 0, 1]
            };
            assert_eq!(row.compartments(), expected);
        }
    }

    #[test]
    fn test_reverse_order_matches_sorted_for_descending_input() {
        let sorted = convert_bytes(york_csv().as_bytes(), &ConvertOptions::default()).unwrap();
        let reversed = convert_bytes(
            york_csv().as_bytes(),
            &ConvertOptions {
                config: ConversionConfig::default().with_row_order(RowOrder::Reverse),
                skip_validation: false,
            },
        )
        .unwrap();

        assert_eq!(sorted.counts, reversed.counts);
    }

    #[test]
    fn test_calendar_hours() {
        let csv = format!(
            "{}\nE06000014,York,utla,2020-02-02,5,5,1\nE06000014,York,utla,2020-01-31,0,0,\n",
            HEADER
        );
        let options = ConvertOptions {
            config: ConversionConfig::default().with_hour_indexing(HourIndexing::Calendar),
            skip_validation: false,
        };
        let result = convert_bytes(csv.as_bytes(), &options).unwrap();

        assert_eq!(result.counts[0].hour, 24);
        assert_eq!(result.counts[24].hour, 72);
    }

    #[test]
    fn test_cases_above_population_is_value_error() {
        let options = ConvertOptions {
            config: ConversionConfig::default().with_population(3),
            skip_validation: false,
        };
        let err = convert_bytes(york_csv().as_bytes(), &options).unwrap_err();

        assert!(matches!(err, PipelineError::Transform(_)));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_check_series_reports_broken_rows() {
        let mut result = convert_bytes(york_csv().as_bytes(), &ConvertOptions::default()).unwrap();
        result.counts[5].exposed = 1;

        let err = check_series(&result.counts, &result.days, HourIndexing::Sequential).unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert!(err.to_string().contains("row 5"));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_convert_records() {
        let records = vec![DailyCaseRecord {
            date: NaiveDate::from_ymd_opt(2020, 1, 30).unwrap(),
            cum_cases: 2,
            new_cases: 2,
            cum_deaths: None,
            area_code: String::new(),
            area_name: String::new(),
            area_type: String::new(),
        }];
        let counts = convert_records(records, &ConversionConfig::default()).unwrap();

        assert_eq!(counts.len(), 24);
        assert!(counts.iter().all(|c| c.susceptible == 198049 && c.deceased == 0));
    }

    #[test]
    fn test_convert_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("york_actual_cases.csv");
        let output = dir.path().join("york_formatted_actual_cases.csv");
        std::fs::write(&input, york_csv()).unwrap();

        let summary = convert_file(&input, &output, &ConvertOptions::default()).unwrap();

        assert_eq!(summary.daily_rows, 2);
        assert_eq!(summary.hourly_rows, 48);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2020, 1, 30));
        assert_eq!(summary.last_hour, Some(47));

        let back = crate::output::read_counts_file(&output).unwrap();
        assert_eq!(back.len(), 48);
    }

    #[test]
    fn test_failed_conversion_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, format!("{}\nE06000014,York,utla,not-a-date,0,0,0\n", HEADER)).unwrap();

        let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_conversion_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        std::fs::write(&output, "previous run\n").unwrap();

        let bad_date = dir.path().join("bad_date.csv");
        std::fs::write(&bad_date, format!("{}\nE06000014,York,utla,2020-02-31,0,0,0\n", HEADER)).unwrap();
        let york = dir.path().join("york.csv");
        std::fs::write(&york, york_csv()).unwrap();
        let tiny_population = ConvertOptions {
            config: ConversionConfig::default().with_population(3),
            skip_validation: false,
        };

        let err = convert_file(&bad_date, &output, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        let err = convert_file(&york, &output, &tiny_population).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous run\n");
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["bad_date.csv", "out.csv", "york.csv"]);
    }
}
