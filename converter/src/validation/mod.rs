//! Invariant checks for an expanded hourly series.
//!
//! Run after expansion and before anything is written:
//!
//! - the series holds exactly 24 rows per daily snapshot
//! - each block of 24 rows repeats its snapshot's compartment values
//! - `exposed`, `hospitalized` and `recovered` are zero everywhere
//! - hours are `0, 1, 2, ...` (sequential) or `day_hour + slot` (calendar)
//!
//! Like the schema validators elsewhere in the workspace, failures come back
//! as a list of human-readable messages.

use crate::config::HourIndexing;
use crate::models::{CompartmentCounts, DailySnapshot, HOURS_PER_DAY};

/// Stop collecting after this many problems.
const MAX_ERRORS: usize = 10;

/// Check an hourly series against the snapshots it was expanded from.
pub fn validate_series(
    rows: &[CompartmentCounts],
    days: &[DailySnapshot],
    indexing: HourIndexing,
) -> Result<(), Vec<String>> {
    let per_day = HOURS_PER_DAY as usize;
    let mut errors = Vec::new();

    if rows.len() != days.len() * per_day {
        errors.push(format!(
            "expected {} hourly rows for {} days, found {}",
            days.len() * per_day,
            days.len(),
            rows.len()
        ));
        return Err(errors);
    }

    for (day_idx, (day, block)) in days.iter().zip(rows.chunks(per_day)).enumerate() {
        for (slot, row) in block.iter().enumerate() {
            let index = day_idx * per_day + slot;

            let expected_hour = match indexing {
                HourIndexing::Sequential => index as i64,
                HourIndexing::Calendar => day.day_hour + slot as i64,
            };
            if i64::from(row.hour) != expected_hour {
                errors.push(format!("row {}: hour {} (expected {})", index, row.hour, expected_hour));
            }

            if (row.exposed, row.hospitalized, row.recovered) != (0, 0, 0) {
                errors.push(format!("row {}: unobserved compartments must be zero", index));
            }

            if row.compartments() != day.at_hour(row.hour).compartments() {
                errors.push(format!("row {}: values differ from {}", index, day.date));
            }

            if errors.len() >= MAX_ERRORS {
                return Err(errors);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check, true when [`validate_series`] passes.
pub fn is_valid_series(rows: &[CompartmentCounts], days: &[DailySnapshot], indexing: HourIndexing) -> bool {
    validate_series(rows, days, indexing).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::expand::expand_hourly;
    use chrono::NaiveDate;

    fn days() -> Vec<DailySnapshot> {
        vec![
            DailySnapshot {
                date: NaiveDate::from_ymd_opt(2020, 1, 30).unwrap(),
                day_hour: 0,
                susceptible: 198051,
                exposed: 0,
                infected: 0,
                hospitalized: 0,
                recovered: 0,
                deceased: 0,
            },
            DailySnapshot {
                date: NaiveDate::from_ymd_opt(2020, 2, 2).unwrap(),
                day_hour: 72,
                susceptible: 198046,
                exposed: 0,
                infected: 5,
                hospitalized: 0,
                recovered: 0,
                deceased: 1,
            },
        ]
    }

    #[test]
    fn test_expanded_series_is_valid() {
        let days = days();
        for indexing in [HourIndexing::Sequential, HourIndexing::Calendar] {
            let rows = expand_hourly(&days, indexing).unwrap();
            assert!(is_valid_series(&rows, &days, indexing));
        }
    }

    #[test]
    fn test_wrong_length() {
        let days = days();
        let mut rows = expand_hourly(&days, HourIndexing::Sequential).unwrap();
        rows.pop();

        let errors = validate_series(&rows, &days, HourIndexing::Sequential).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected 48"));
    }

    #[test]
    fn test_hour_gap_detected() {
        let days = days();
        let mut rows = expand_hourly(&days, HourIndexing::Sequential).unwrap();
        rows[30].hour = 31;

        let errors = validate_series(&rows, &days, HourIndexing::Sequential).unwrap_err();
        assert!(errors[0].contains("row 30: hour 31"));
    }

    #[test]
    fn test_nonzero_unobserved_compartment() {
        let days = days();
        let mut rows = expand_hourly(&days, HourIndexing::Sequential).unwrap();
        rows[3].recovered = 2;

        let errors = validate_series(&rows, &days, HourIndexing::Sequential).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("must be zero")));
    }

    #[test]
    fn test_error_list_is_capped() {
        let days = days();
        let mut rows = expand_hourly(&days, HourIndexing::Sequential).unwrap();
        for row in rows.iter_mut() {
            row.infected += 1;
        }

        let errors = validate_series(&rows, &days, HourIndexing::Sequential).unwrap_err();
        assert_eq!(errors.len(), MAX_ERRORS);
    }
}
