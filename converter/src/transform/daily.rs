//! Daily derivation: dashboard rows to per-day compartment snapshots.
//!
//! ```text
//! date, cumCases, newCases, cumDeaths, area*      day_hour, S, E, I, H, R, D
//! ┌──────────────────────────────────────┐       ┌──────────────────────────┐
//! │ 2020-01-31, 5, 5, 1, York...         │       │ 0,  198051, 0, 0, 0, 0, 0│
//! │ 2020-01-30, 0, 0, NaN, York...       │  →    │ 24, 198046, 0, 5, 0, 0, 1│
//! └──────────────────────────────────────┘       └──────────────────────────┘
//! ```
//!
//! Rows are first put in ascending date order, then each is mapped to a
//! snapshot: `susceptible = population - cumCases`, `infected = newCases`,
//! `deceased = cumDeaths` (missing as 0), and the unobserved compartments held
//! at zero. Area identifiers and the cumulative case column are dropped.

use chrono::NaiveDate;

use crate::config::{ConversionConfig, RowOrder};
use crate::error::{TransformError, TransformResult};
use crate::models::{DailyCaseRecord, DailySnapshot, HOURS_PER_DAY};

/// Hours between the epoch and midnight of `date`.
pub fn day_hour(date: NaiveDate, epoch: NaiveDate) -> i64 {
    (date - epoch).num_days() * i64::from(HOURS_PER_DAY)
}

/// Put rows in ascending date order.
///
/// `Chronological` sorts by date and rejects duplicate dates. `Reverse` flips
/// the file order without looking at the dates.
pub fn order_rows(mut records: Vec<DailyCaseRecord>, order: RowOrder) -> TransformResult<Vec<DailyCaseRecord>> {
    match order {
        RowOrder::Reverse => records.reverse(),
        RowOrder::Chronological => {
            records.sort_by_key(|r| r.date);
            if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
                return Err(TransformError::DuplicateDate(pair[0].date));
            }
        }
    }
    Ok(records)
}

/// Derive the snapshot for one record.
pub fn to_snapshot(record: &DailyCaseRecord, config: &ConversionConfig) -> TransformResult<DailySnapshot> {
    let susceptible = config
        .population
        .checked_sub(record.cum_cases)
        .ok_or(TransformError::CasesExceedPopulation {
            date: record.date,
            cumulative: record.cum_cases,
            population: config.population,
        })?;

    Ok(DailySnapshot {
        date: record.date,
        day_hour: day_hour(record.date, config.epoch_date),
        susceptible,
        exposed: 0,
        infected: record.new_cases,
        hospitalized: 0,
        recovered: 0,
        deceased: record.cum_deaths.unwrap_or(0),
    })
}

/// Order the records and derive one snapshot per date.
pub fn derive_daily(records: Vec<DailyCaseRecord>, config: &ConversionConfig) -> TransformResult<Vec<DailySnapshot>> {
    order_rows(records, config.row_order)?
        .iter()
        .map(|r| to_snapshot(r, config))
        .collect()
}
