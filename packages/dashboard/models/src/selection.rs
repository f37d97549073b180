//! Selection state.

use std::str::FromStr as _;

use county_atlas_statistics_models::Metric;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::InvalidSelectionError;

/// A state or county filter: everything, or one exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// No restriction.
    #[default]
    All,
    /// Exact, case-sensitive name.
    Named(String),
}

impl Scope {
    /// Dropdown label meaning "every state".
    pub const ALL_STATES_LABEL: &str = "All States";
    /// Dropdown label meaning "every county".
    pub const ALL_COUNTIES_LABEL: &str = "All Counties";

    /// Parses a dropdown value. `"all"`, `"All States"`, `"All Counties"`
    /// (any case) and blank input mean [`Scope::All`]; anything else is a
    /// name, kept verbatim and matched exactly.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let is_all = trimmed.is_empty()
            || ["all", Self::ALL_STATES_LABEL, Self::ALL_COUNTIES_LABEL]
                .iter()
                .any(|label| label.eq_ignore_ascii_case(trimmed));
        if is_all {
            Self::All
        } else {
            Self::Named(input.to_string())
        }
    }

    /// Shorthand for [`Scope::Named`].
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns `true` if `value` passes this filter.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == value,
        }
    }

    /// Returns `true` for [`Scope::All`].
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The selected name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Which view the dashboard renders.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ViewMode {
    /// Choropleth snapshot for one period.
    #[default]
    Map,
    /// Time series across all periods.
    #[strum(serialize = "trends", serialize = "trend")]
    Trends,
}

impl ViewMode {
    /// Parses a view mode name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelectionError::UnknownViewMode`] for anything but
    /// `map` or `trends`.
    pub fn parse(name: &str) -> Result<Self, InvalidSelectionError> {
        Self::from_str(name.trim()).map_err(|_| InvalidSelectionError::UnknownViewMode {
            name: name.to_string(),
        })
    }
}

/// The user's current filter choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// State filter.
    pub state: Scope,
    /// County filter, applied after the state filter.
    pub county: Scope,
    /// Column the views read.
    pub metric: Metric,
    /// Index into the sorted distinct period dates.
    pub time_index: usize,
}

impl SelectionState {
    /// Everything selected, population metric, most recent of `periods`.
    #[must_use]
    pub const fn initial(periods: usize) -> Self {
        Self {
            state: Scope::All,
            county: Scope::All,
            metric: Metric::Population,
            time_index: periods.saturating_sub(1),
        }
    }

    /// Returns a copy with the state filter replaced. Changing the state
    /// resets the county filter, since county names are per-state.
    #[must_use]
    pub fn with_state(mut self, state: Scope) -> Self {
        if self.state != state {
            self.county = Scope::All;
        }
        self.state = state;
        self
    }

    /// Returns a copy with the county filter replaced.
    #[must_use]
    pub fn with_county(mut self, county: Scope) -> Self {
        self.county = county;
        self
    }

    /// Returns a copy with the metric replaced.
    #[must_use]
    pub const fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns a copy with the time index replaced.
    #[must_use]
    pub const fn with_time_index(mut self, time_index: usize) -> Self {
        self.time_index = time_index;
        self
    }

    /// Short description used in logs and empty-data messages.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "state={}, county={}, metric={}, time_index={}",
            self.state, self.county, self.metric, self.time_index
        )
    }
}

/// Untrusted selection values as delivered by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelection {
    /// State dropdown value.
    pub state: String,
    /// County dropdown value.
    pub county: String,
    /// Metric dropdown value.
    pub metric: String,
    /// Time slider value.
    pub time_index: usize,
}

impl RawSelection {
    /// Validates the raw values into a [`SelectionState`].
    ///
    /// The time index is checked later against the actual date sequence.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSelectionError::UnknownMetric`] if the metric name
    /// is not one of the known metrics.
    pub fn parse(&self) -> Result<SelectionState, InvalidSelectionError> {
        let metric =
            Metric::from_str(self.metric.trim()).map_err(|_| InvalidSelectionError::UnknownMetric {
                name: self.metric.clone(),
            })?;

        Ok(SelectionState {
            state: Scope::parse(&self.state),
            county: Scope::parse(&self.county),
            metric,
            time_index: self.time_index,
        })
    }
}
