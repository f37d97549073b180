#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County dashboard engine.
//!
//! Turns a [`county_atlas_geography::BoundaryStore`] and a
//! [`county_atlas_statistics::StatisticsTable`] into map and trend views
//! for a user's selection:
//!
//! * [`filter`] narrows the tables to a [`filter::FilteredSlice`].
//! * [`map_view`] and [`trend_view`] render a slice.
//! * [`controller::DashboardController`] owns the data and the current
//!   selection, and recomputes the active view on every change.

pub mod config;
pub mod controller;
pub mod export;
pub mod filter;
pub mod map_view;
pub mod trend_view;

use county_atlas_dashboard_models::InvalidSelectionError;
use county_atlas_geography::BoundaryError;
use county_atlas_statistics::StatsError;
use thiserror::Error;

pub use config::DashboardConfig;
pub use controller::{DashboardController, DashboardState, SelectionInputs};
pub use export::{DirectorySink, ExportError, ExportSink};

/// Errors surfaced by the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The dashboard has not been loaded, or has been shut down.
    #[error("Dashboard is not ready: {state}")]
    NotReady {
        /// State the dashboard was in.
        state: DashboardState,
    },

    /// Configuration is malformed or inconsistent.
    #[error("Config error: {0}")]
    Config(String),

    /// Boundaries failed to load or validate.
    #[error("Boundary error: {0}")]
    Boundary(#[from] BoundaryError),

    /// Statistics failed to generate or validate.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// The selection cannot be honored.
    #[error("Invalid selection: {0}")]
    Selection(#[from] InvalidSelectionError),

    /// An export sink failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Reading a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
