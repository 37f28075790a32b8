//! Hourly expansion: each daily snapshot becomes 24 identical hourly rows.

use crate::config::HourIndexing;
use crate::error::{TransformError, TransformResult};
use crate::models::{CompartmentCounts, DailySnapshot, HOURS_PER_DAY};

/// Expand daily snapshots (already in ascending order) into hourly rows.
///
/// With [`HourIndexing::Sequential`] the hour is a single running counter over
/// the whole output. With [`HourIndexing::Calendar`] each day starts at its own
/// offset from the epoch, so gaps between dates show up as gaps in hours.
pub fn expand_hourly(days: &[DailySnapshot], indexing: HourIndexing) -> TransformResult<Vec<CompartmentCounts>> {
    let mut rows = Vec::with_capacity(days.len() * HOURS_PER_DAY as usize);
    let mut next_hour: u32 = 0;

    for day in days {
        let base = match indexing {
            HourIndexing::Sequential => next_hour,
            HourIndexing::Calendar => calendar_base(day)?,
        };

        for slot in 0..HOURS_PER_DAY {
            let hour = base
                .checked_add(slot)
                .ok_or(TransformError::HourOverflow(day.date))?;
            rows.push(day.at_hour(hour));
        }

        next_hour = base
            .checked_add(HOURS_PER_DAY)
            .ok_or(TransformError::HourOverflow(day.date))?;
    }

    Ok(rows)
}

fn calendar_base(day: &DailySnapshot) -> TransformResult<u32> {
    if day.day_hour < 0 {
        let epoch = day.date + chrono::Duration::hours(-day.day_hour);
        return Err(TransformError::BeforeEpoch { date: day.date, epoch });
    }
    u32::try_from(day.day_hour).map_err(|_| TransformError::HourOverflow(day.date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32, day_hour: i64, s: u32, i: u32, dead: u32) -> DailySnapshot {
        DailySnapshot {
            date: NaiveDate::from_ymd_opt(2020, 2, d).unwrap(),
            day_hour,
            susceptible: s,
            exposed: 0,
            infected: i,
            hospitalized: 0,
            recovered: 0,
            deceased: dead,
        }
    }

    #[test]
    fn test_sequential_hours_run_across_days() {
        let days = vec![day(1, 48, 100, 1, 0), day(5, 144, 90, 2, 1)];
        let rows = expand_hourly(&days, HourIndexing::Sequential).unwrap();

        assert_eq!(rows.len(), 48);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.hour as usize, i);
        }
        assert!(rows[..24].iter().all(|r| r.compartments() == [100, 0, 1, 0, 0, 0]));
        assert!(rows[24..].iter().all(|r| r.compartments() == [90, 0, 2, 0, 0, 1]));
    }

    #[test]
    fn test_calendar_hours_follow_dates() {
        let days = vec![day(1, 48, 100, 1, 0), day(5, 144, 90, 2, 1)];
        let rows = expand_hourly(&days, HourIndexing::Calendar).unwrap();

        assert_eq!(rows.len(), 48);
        assert_eq!(rows[0].hour, 48);
        assert_eq!(rows[23].hour, 71);
        assert_eq!(rows[24].hour, 144);
        assert_eq!(rows[47].hour, 167);
    }

    #[test]
    fn test_calendar_rejects_dates_before_epoch() {
        let days = vec![day(1, -24, 100, 1, 0)];
        let err = expand_hourly(&days, HourIndexing::Calendar).unwrap_err();
        match err {
            TransformError::BeforeEpoch { date, epoch } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
                assert_eq!(epoch, NaiveDate::from_ymd_opt(2020, 2, 2).unwrap());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sequential_ignores_negative_day_hour() {
        let rows = expand_hourly(&[day(1, -24, 100, 1, 0)], HourIndexing::Sequential).unwrap();
        assert_eq!(rows.first().map(|r| r.hour), Some(0));
        assert_eq!(rows.last().map(|r| r.hour), Some(23));
    }

    #[test]
    fn test_empty_input() {
        assert!(expand_hourly(&[], HourIndexing::Sequential).unwrap().is_empty());
    }
}
