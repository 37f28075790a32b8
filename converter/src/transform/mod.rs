//! Transformation module.
//!
//! - Daily: order dashboard rows and derive per-day compartments
//! - Expand: hold each day's values over 24 hourly rows
//! - Pipeline: main conversion pipeline

pub mod daily;
pub mod expand;
pub mod pipeline;

pub use daily::{day_hour, derive_daily, order_rows, to_snapshot};
pub use expand::expand_hourly;
pub use pipeline::*;
