//! Daily case CSV parser with encoding and delimiter auto-detection.
//!
//! Columns are located by header name, so their order in the file does not
//! matter and extra columns are ignored. Every field error carries the line
//! and column it came from.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

use crate::error::{CsvError, CsvResult, FieldError};
use crate::models::DailyCaseRecord;

pub const COL_DATE: &str = "date";
pub const COL_CUM_CASES: &str = "cumCasesBySpecimenDate";
pub const COL_NEW_CASES: &str = "newCasesBySpecimenDate";
pub const COL_CUM_DEATHS: &str = "cumDeaths28DaysByDeathDate";
pub const COL_AREA_CODE: &str = "areaCode";
pub const COL_AREA_NAME: &str = "areaName";
pub const COL_AREA_TYPE: &str = "areaType";

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_DATE,
    COL_CUM_CASES,
    COL_NEW_CASES,
    COL_CUM_DEATHS,
    COL_AREA_CODE,
    COL_AREA_NAME,
    COL_AREA_TYPE,
];

/// Spellings of a missing numeric value (compared case-insensitively).
const MISSING_MARKERS: [&str; 4] = ["", "nan", "na", "null"];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub records: Vec<DailyCaseRecord>,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// Column headers as found in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        // single-byte encodings map every byte, so decoding cannot fail
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Defaults to a comma when none of the candidates appear.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Positions of the required columns in a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    cum_cases: usize,
    new_cases: usize,
    cum_deaths: usize,
    area_code: usize,
    area_name: usize,
    area_type: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> CsvResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find(COL_DATE)?,
            cum_cases: find(COL_CUM_CASES)?,
            new_cases: find(COL_NEW_CASES)?,
            cum_deaths: find(COL_CUM_DEATHS)?,
            area_code: find(COL_AREA_CODE)?,
            area_name: find(COL_AREA_NAME)?,
            area_type: find(COL_AREA_TYPE)?,
        })
    }
}

/// Parse daily case CSV text with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use casecounts::parse_daily_csv;
///
/// let csv = "areaCode,areaName,areaType,date,cumCasesBySpecimenDate,newCasesBySpecimenDate,cumDeaths28DaysByDeathDate\n\
///            E06000014,York,utla,2020-01-30,0,0,";
/// let (headers, rows) = parse_daily_csv(csv, ',').unwrap();
///
/// assert_eq!(headers.len(), 7);
/// assert_eq!(rows[0].cum_deaths, None);
/// ```
pub fn parse_daily_csv(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<DailyCaseRecord>)> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_matches('"').to_string())
        .collect();

    let index = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
        records.push(parse_row(&row, &index, line)?);
    }

    Ok((headers, records))
}

fn parse_row(row: &StringRecord, index: &ColumnIndex, line: usize) -> CsvResult<DailyCaseRecord> {
    let field = |i: usize| row.get(i).unwrap_or("");

    Ok(DailyCaseRecord {
        date: parse_date(field(index.date), line)?,
        cum_cases: parse_count(field(index.cum_cases), COL_CUM_CASES, line)?
            .ok_or_else(|| missing_value(COL_CUM_CASES, line))?,
        new_cases: parse_count(field(index.new_cases), COL_NEW_CASES, line)?
            .ok_or_else(|| missing_value(COL_NEW_CASES, line))?,
        cum_deaths: parse_count(field(index.cum_deaths), COL_CUM_DEATHS, line)?,
        area_code: field(index.area_code).to_string(),
        area_name: field(index.area_name).to_string(),
        area_type: field(index.area_type).to_string(),
    })
}

fn parse_date(raw: &str, line: usize) -> CsvResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        CsvError::Date(
            FieldError::new(line, format!("expected YYYY-MM-DD ({})", e))
                .with_column(COL_DATE)
                .with_value(raw),
        )
    })
}

/// Parse a non-negative count; `None` for a missing marker.
///
/// Integral floats such as `12.0` are accepted, since files re-exported from
/// dataframes often carry them.
fn parse_count(raw: &str, column: &str, line: usize) -> CsvResult<Option<u32>> {
    let trimmed = raw.trim_matches('"');
    if MISSING_MARKERS.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }

    if let Ok(n) = trimmed.parse::<u32>() {
        return Ok(Some(n));
    }

    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
            Ok(Some(f as u32))
        }
        _ => Err(CsvError::Format(
            FieldError::new(line, "expected a non-negative integer")
                .with_column(column)
                .with_value(raw),
        )),
    }
}

fn missing_value(column: &str, line: usize) -> CsvError {
    CsvError::Format(FieldError::new(line, "value is required").with_column(column))
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    let (headers, records) = parse_daily_csv(&content, delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("york_actual_cases.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Records: {}", result.records.len());
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}
