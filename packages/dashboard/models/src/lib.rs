#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard selection state, input controls, and view types.
//!
//! The presentation layer talks to the engine through these types only:
//! it reads [`controls::Selectable`] controls into a
//! [`selection::SelectionState`] and receives a [`view::MapArtifact`] or
//! [`view::TrendChart`] back.

pub mod controls;
pub mod selection;
pub mod view;

use thiserror::Error;

pub use controls::{Dropdown, Selectable, Slider};
pub use selection::{RawSelection, Scope, SelectionState, ViewMode};

/// A selection the engine cannot honor.
///
/// Recoverable: the caller should reset or re-prompt the offending control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelectionError {
    /// The metric name is not one of the known metrics.
    #[error("Unknown metric '{name}'")]
    UnknownMetric {
        /// The rejected name.
        name: String,
    },

    /// The view mode name is not `map` or `trends`.
    #[error("Unknown view mode '{name}'")]
    UnknownViewMode {
        /// The rejected name.
        name: String,
    },

    /// The time index is past the end of the date sequence.
    #[error("Time index {index} is out of range for {len} periods")]
    TimeIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of available periods.
        len: usize,
    },
}

/// A valid selection produced zero rows for a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No {view} data for {context}")]
pub struct EmptyDataError {
    /// Which view was being rendered.
    pub view: ViewMode,
    /// Human-readable description of the selection.
    pub context: String,
}
