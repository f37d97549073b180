#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County statistics panel types.
//!
//! A panel is one [`StatRecord`] per (county, month-end date). The four
//! numeric columns are addressed through [`Metric`], which also declares
//! the realistic band every value must fall in.

use chrono::{Datelike as _, Months, NaiveDate};
use county_atlas_geography_models::{CountyKey, CountyType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default number of monthly periods in a generated panel.
pub const DEFAULT_MONTHS: usize = 12;

/// One county's statistics for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// County name, matching the boundary source.
    pub county: String,
    /// Full state name.
    pub state: String,
    /// Month-end date of the period.
    pub date: NaiveDate,
    /// Resident population.
    pub population: u64,
    /// Gross domestic product in millions of USD.
    pub gdp_millions: f64,
    /// Unemployment rate in percent.
    pub unemployment_rate: f64,
    /// Median household income in USD.
    pub median_income: f64,
    /// County type carried over from the boundary.
    pub county_type: CountyType,
}

impl StatRecord {
    /// Returns the (county, state) identity of this record.
    #[must_use]
    pub fn key(&self) -> CountyKey {
        CountyKey::new(&self.county, &self.state)
    }

    /// Returns `true` if this record belongs to `county` in `state`.
    #[must_use]
    pub fn matches(&self, county: &str, state: &str) -> bool {
        self.county == county && self.state == state
    }
}

/// A selectable numeric column of the panel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Resident population.
    Population,
    /// GDP in millions of USD.
    GdpMillions,
    /// Unemployment rate in percent.
    UnemploymentRate,
    /// Median household income in USD.
    MedianIncome,
}

impl Metric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Population,
            Self::GdpMillions,
            Self::UnemploymentRate,
            Self::MedianIncome,
        ]
    }

    /// Human-readable axis/legend label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Population => "Population",
            Self::GdpMillions => "GDP (millions USD)",
            Self::UnemploymentRate => "Unemployment rate (%)",
            Self::MedianIncome => "Median household income (USD)",
        }
    }

    /// The realistic range every value of this metric must fall in.
    #[must_use]
    pub const fn band(self) -> MetricBand {
        match self {
            Self::Population => MetricBand::inclusive(10_000.0, 15_000_000.0),
            Self::GdpMillions => MetricBand::positive(2_000_000.0),
            Self::UnemploymentRate => MetricBand::inclusive(1.0, 15.0),
            Self::MedianIncome => MetricBand::inclusive(20_000.0, 250_000.0),
        }
    }

    /// Reads this metric's column from a record.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self, record: &StatRecord) -> f64 {
        match self {
            Self::Population => record.population as f64,
            Self::GdpMillions => record.gdp_millions,
            Self::UnemploymentRate => record.unemployment_rate,
            Self::MedianIncome => record.median_income,
        }
    }
}

/// Realistic value range for a [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBand {
    /// Lower bound.
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
    /// Whether `min` itself is excluded (strictly-positive metrics).
    pub min_exclusive: bool,
}

impl MetricBand {
    /// A closed `[min, max]` band.
    #[must_use]
    pub const fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
        }
    }

    /// A `(0, max]` band.
    #[must_use]
    pub const fn positive(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            min_exclusive: true,
        }
    }

    /// Returns `true` if `value` is finite and inside the band.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };
        value.is_finite() && above_min && value <= self.max
    }

    /// Clamps `value` into the band. For exclusive lower bounds the result
    /// is nudged one epsilon above `min`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let floor = if self.min_exclusive {
            self.min + f64::EPSILON * self.min.abs().max(1.0)
        } else {
            self.min
        };
        value.clamp(floor, self.max)
    }
}

/// A run of consecutive month-end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Last month-end date in the range.
    pub end: NaiveDate,
    /// Number of monthly periods, ending at `end`.
    pub months: usize,
}

impl TimeRange {
    /// The `months` month-ends ending at the latest month end on or before
    /// `anchor`.
    #[must_use]
    pub fn ending_at(anchor: NaiveDate, months: usize) -> Self {
        let end = if is_month_end(anchor) {
            anchor
        } else {
            anchor
                .with_day(1)
                .and_then(|first| first.pred_opt())
                .unwrap_or(anchor)
        };
        Self { end, months }
    }

    /// The `months` most recent complete months as of today (UTC).
    #[must_use]
    pub fn last_months(months: usize) -> Self {
        Self::ending_at(chrono::Utc::now().date_naive(), months)
    }

    /// Month-end dates in ascending order.
    #[must_use]
    pub fn periods(&self) -> Vec<NaiveDate> {
        let end_index = i64::from(self.end.year()) * 12 + i64::from(self.end.month0());
        (0..self.months)
            .rev()
            .filter_map(|back| {
                let index = end_index - i64::try_from(back).ok()?;
                let year = i32::try_from(index.div_euclid(12)).ok()?;
                let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
                month_end(year, month)
            })
            .collect()
    }
}

/// Last day of the given month.
#[must_use]
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Returns `true` if `date` is the last day of its month.
#[must_use]
pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

/// Short label for a period, e.g. `"Jun 2025"`.
#[must_use]
pub fn period_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn metric_names_roundtrip() {
        for metric in Metric::all() {
            assert_eq!(Metric::from_str(metric.as_ref()).unwrap(), *metric);
        }
        assert_eq!(Metric::UnemploymentRate.to_string(), "unemployment_rate");
        assert!(Metric::from_str("crime_rate").is_err());
    }

    #[test]
    fn bands_enforce_bounds() {
        let pop = Metric::Population.band();
        assert!(pop.contains(10_000.0));
        assert!(pop.contains(15_000_000.0));
        assert!(!pop.contains(9_999.0));

        let gdp = Metric::GdpMillions.band();
        assert!(!gdp.contains(0.0));
        assert!(gdp.contains(0.01));
        assert!(gdp.clamp(-5.0) > 0.0);

        assert!(!Metric::UnemploymentRate.band().contains(f64::NAN));
        assert!((Metric::UnemploymentRate.band().clamp(22.0) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metric_value_reads_column() {
        let record = StatRecord {
            county: "Travis".into(),
            state: "Texas".into(),
            date: date(2025, 1, 31),
            population: 1_300_000,
            gdp_millions: 150_000.0,
            unemployment_rate: 3.4,
            median_income: 92_000.0,
            county_type: CountyType::County,
        };
        assert!((Metric::Population.value(&record) - 1_300_000.0).abs() < f64::EPSILON);
        assert!((Metric::UnemploymentRate.value(&record) - 3.4).abs() < f64::EPSILON);
        assert!(record.matches("Travis", "Texas"));
    }

    #[test]
    fn month_ends() {
        assert_eq!(month_end(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(month_end(2025, 2), Some(date(2025, 2, 28)));
        assert_eq!(month_end(2025, 12), Some(date(2025, 12, 31)));
        assert!(is_month_end(date(2025, 4, 30)));
        assert!(!is_month_end(date(2025, 4, 29)));
    }

    #[test]
    fn range_snaps_to_previous_month_end() {
        let range = TimeRange::ending_at(date(2025, 6, 15), 12);
        assert_eq!(range.end, date(2025, 5, 31));

        let range = TimeRange::ending_at(date(2025, 6, 30), 12);
        assert_eq!(range.end, date(2025, 6, 30));
    }

    #[test]
    fn periods_cross_year_boundary() {
        let periods = TimeRange::ending_at(date(2025, 3, 31), 12).periods();
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0], date(2024, 4, 30));
        assert_eq!(periods[11], date(2025, 3, 31));
        assert!(periods.windows(2).all(|w| w[0] < w[1]));
        assert!(periods.iter().all(|d| is_month_end(*d)));
    }

    #[test]
    fn zero_month_range_is_empty() {
        assert!(TimeRange::ending_at(date(2025, 3, 31), 0).periods().is_empty());
    }

    #[test]
    fn period_labels() {
        assert_eq!(period_label(date(2025, 6, 30)), "Jun 2025");
    }
}
