#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County statistics panel generation and ingestion.
//!
//! [`generator::StatisticsGenerator`] synthesizes a smooth, seeded panel
//! for a set of county boundaries; [`table::StatisticsTable`] holds a
//! validated panel (generated or read from CSV) as immutable data.

pub mod generator;
pub mod table;

use chrono::NaiveDate;
use county_atlas_geography_models::CountyKey;
use county_atlas_statistics_models::Metric;
use thiserror::Error;

pub use generator::{GeneratorParams, StatisticsGenerator, StepBounds};
pub use table::{StatisticsTable, write_records_csv};

/// Errors that can occur while generating or ingesting statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The requested time range has no periods.
    #[error("Time range contains no periods")]
    EmptyRange,

    /// No counties were supplied to the generator.
    #[error("No counties to generate statistics for")]
    NoCounties,

    /// A table was built from zero records.
    #[error("Statistics table is empty")]
    Empty,

    /// Generator parameters are inconsistent.
    #[error("Invalid generator parameters: {message}")]
    InvalidParams {
        /// Description of what went wrong.
        message: String,
    },

    /// A metric value falls outside its realistic band.
    #[error("{metric} value {value} for {key} on {date} is outside its realistic band")]
    OutOfBand {
        /// County identity.
        key: CountyKey,
        /// Period of the offending row.
        date: NaiveDate,
        /// Offending metric.
        metric: Metric,
        /// Offending value.
        value: f64,
    },

    /// Two rows share the same (county, state, date).
    #[error("Duplicate row for {key} on {date}")]
    DuplicateRow {
        /// County identity.
        key: CountyKey,
        /// Repeated period.
        date: NaiveDate,
    },

    /// A county is missing some of the table's periods.
    #[error("{key} has {found} of {expected} periods")]
    IncompletePanel {
        /// County identity.
        key: CountyKey,
        /// Periods present for this county.
        found: usize,
        /// Distinct periods in the table.
        expected: usize,
    },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failed while flushing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
