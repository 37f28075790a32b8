//! Conversion configuration.
//!
//! The population and epoch date used to default to York's 2020 figures; they
//! are kept as the defaults here and can be overridden from a JSON file or the
//! command line.
//!
//! ```json
//! {
//!   "population": 198051,
//!   "epoch_date": "2020-01-30",
//!   "hour_indexing": "sequential",
//!   "row_order": "chronological"
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Regional population used when none is configured.
pub const DEFAULT_POPULATION: u32 = 198_051;

/// Epoch the hour offsets are measured from.
pub const DEFAULT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 30) {
    Some(date) => date,
    None => panic!("default epoch is not a calendar date"),
};

/// How the `hour` column of the expanded series is numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourIndexing {
    /// One running counter over the whole output, starting at 0.
    #[default]
    Sequential,
    /// `(date - epoch) * 24 + hour_of_day`.
    Calendar,
}

/// How the daily rows are put in ascending date order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Sort by date; duplicate dates are rejected.
    #[default]
    Chronological,
    /// Reverse file order. Only correct for files published newest first.
    Reverse,
}

/// Options for turning daily records into hourly counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Total regional population, used to derive `susceptible`.
    #[serde(default = "default_population")]
    pub population: u32,

    /// Date from which hour offsets are measured.
    #[serde(default = "default_epoch_date")]
    pub epoch_date: NaiveDate,

    #[serde(default)]
    pub hour_indexing: HourIndexing,

    #[serde(default)]
    pub row_order: RowOrder,
}

fn default_population() -> u32 {
    DEFAULT_POPULATION
}

fn default_epoch_date() -> NaiveDate {
    DEFAULT_EPOCH
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            population: default_population(),
            epoch_date: default_epoch_date(),
            hour_indexing: HourIndexing::default(),
            row_order: RowOrder::default(),
        }
    }
}

impl ConversionConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_population(mut self, population: u32) -> Self {
        self.population = population;
        self
    }

    pub fn with_epoch_date(mut self, epoch_date: NaiveDate) -> Self {
        self.epoch_date = epoch_date;
        self
    }

    pub fn with_hour_indexing(mut self, hour_indexing: HourIndexing) -> Self {
        self.hour_indexing = hour_indexing;
        self
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    /// Reject configurations no input could be converted with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.population == 0 {
            return Err(ConfigError::Invalid("population must be positive".into()));
        }
        Ok(())
    }
}
