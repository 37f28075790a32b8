//! Domain models for the conversion pipeline.
//!
//! - [`DailyCaseRecord`] - one row of the dashboard CSV
//! - [`DailySnapshot`] - compartment values derived for one date
//! - [`CompartmentCounts`] - one hourly row of the simulation counts file

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Hours emitted per daily row.
pub const HOURS_PER_DAY: u32 = 24;

// =============================================================================
// Input
// =============================================================================

/// A daily case/death row as published by the dashboard.
///
/// Serde names match the dashboard column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCaseRecord {
    pub date: NaiveDate,

    #[serde(rename = "cumCasesBySpecimenDate")]
    pub cum_cases: u32,

    #[serde(rename = "newCasesBySpecimenDate")]
    pub new_cases: u32,

    /// Missing on dates where no death figure was published yet.
    #[serde(rename = "cumDeaths28DaysByDeathDate")]
    pub cum_deaths: Option<u32>,

    #[serde(rename = "areaCode")]
    pub area_code: String,

    #[serde(rename = "areaName")]
    pub area_name: String,

    #[serde(rename = "areaType")]
    pub area_type: String,
}

// =============================================================================
// Derived daily row
// =============================================================================

/// Compartment values for one date, before hourly expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    /// `(date - epoch) * 24`; negative for dates before the epoch.
    pub day_hour: i64,
    pub susceptible: u32,
    pub exposed: u32,
    pub infected: u32,
    pub hospitalized: u32,
    pub recovered: u32,
    pub deceased: u32,
}

impl DailySnapshot {
    /// Hourly row carrying this day's values at `hour`.
    pub fn at_hour(&self, hour: u32) -> CompartmentCounts {
        CompartmentCounts {
            hour,
            susceptible: self.susceptible,
            exposed: self.exposed,
            infected: self.infected,
            hospitalized: self.hospitalized,
            recovered: self.recovered,
            deceased: self.deceased,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// One hourly row of SEIHRD counts.
///
/// Field order is the column order of the counts CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentCounts {
    pub hour: u32,
    pub susceptible: u32,
    pub exposed: u32,
    pub infected: u32,
    pub hospitalized: u32,
    pub recovered: u32,
    pub deceased: u32,
}

impl CompartmentCounts {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 7] = [
        "hour",
        "susceptible",
        "exposed",
        "infected",
        "hospitalized",
        "recovered",
        "deceased",
    ];

    /// Compartment values without the hour, for comparing rows of the same day.
    pub fn compartments(&self) -> [u32; 6] {
        [
            self.susceptible,
            self.exposed,
            self.infected,
            self.hospitalized,
            self.recovered,
            self.deceased,
        ]
    }

    pub fn total(&self) -> u64 {
        self.compartments().iter().map(|&c| u64::from(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DailySnapshot {
        DailySnapshot {
            date: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
            day_hour: 24,
            susceptible: 198046,
            exposed: 0,
            infected: 5,
            hospitalized: 0,
            recovered: 0,
            deceased: 1,
        }
    }

    #[test]
    fn test_snapshot_at_hour() {
        let row = snapshot().at_hour(30);
        assert_eq!(row.hour, 30);
        assert_eq!(row.compartments(), [198046, 0, 5, 0, 0, 1]);
        assert_eq!(row.total(), 198052);
    }

    #[test]
    fn test_record_serializes_with_dashboard_names() {
        let record = DailyCaseRecord {
            date: NaiveDate::from_ymd_opt(2020, 1, 30).unwrap(),
            cum_cases: 0,
            new_cases: 0,
            cum_deaths: None,
            area_code: "E06000014".into(),
            area_name: "York".into(),
            area_type: "utla".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2020-01-30");
        assert_eq!(json["cumCasesBySpecimenDate"], 0);
        assert!(json["cumDeaths28DaysByDeathDate"].is_null());
        assert_eq!(json["areaName"], "York");
    }
}
