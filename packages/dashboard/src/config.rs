//! Dashboard configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use county_atlas_dashboard_models::view::{Binning, DEFAULT_BINS};
use county_atlas_geography::LoadOptions;
use county_atlas_statistics_models::{DEFAULT_MONTHS, TimeRange};
use serde::Deserialize;

use crate::DashboardError;
use crate::map_view::MAX_BINS;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Where county boundaries come from.
    pub boundaries: BoundariesConfig,
    /// How statistics are generated.
    pub statistics: StatisticsConfig,
    /// Map styling.
    pub map: MapConfig,
}

/// `[boundaries]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundariesConfig {
    /// `GeoJSON` file on disk.
    pub path: Option<PathBuf>,
    /// `GeoJSON` URL, fetched at startup.
    pub url: Option<String>,
    /// Accept Web Mercator input and reproject it.
    pub reproject_web_mercator: bool,
    /// Close rings whose endpoints differ.
    pub close_open_rings: bool,
}

impl BoundariesConfig {
    /// Loader opt-ins from this section.
    #[must_use]
    pub const fn load_options(&self) -> LoadOptions {
        LoadOptions {
            reproject_web_mercator: self.reproject_web_mercator,
            close_open_rings: self.close_open_rings,
        }
    }
}

/// `[statistics]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticsConfig {
    /// Random seed for the generator.
    pub seed: u64,
    /// Number of monthly periods.
    pub months: usize,
    /// Last period; defaults to the latest complete month.
    pub end_date: Option<NaiveDate>,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            months: DEFAULT_MONTHS,
            end_date: None,
        }
    }
}

impl StatisticsConfig {
    /// Periods to generate.
    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        self.end_date.map_or_else(
            || TimeRange::last_months(self.months),
            |end| TimeRange::ending_at(end, self.months),
        )
    }
}

/// How map classes are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningKind {
    /// Equal-count classes.
    #[default]
    Quantile,
    /// Fixed cut points.
    Thresholds,
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Class computation.
    pub binning: BinningKind,
    /// Number of quantile classes.
    pub bins: usize,
    /// Ascending cut points for threshold classes.
    pub thresholds: Vec<f64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            binning: BinningKind::Quantile,
            bins: DEFAULT_BINS,
            thresholds: Vec::new(),
        }
    }
}

impl MapConfig {
    /// The binning this section describes.
    #[must_use]
    pub fn binning(&self) -> Binning {
        match self.binning {
            BinningKind::Quantile => Binning::Quantile { bins: self.bins },
            BinningKind::Thresholds => Binning::Thresholds(self.thresholds.clone()),
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the TOML is malformed, has
    /// unknown keys, or fails [`Self::validate`].
    pub fn from_toml_str(toml_str: &str) -> Result<Self, DashboardError> {
        let config: Self =
            toml::de::from_str(toml_str).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] if the file cannot be read, or
    /// [`DashboardError::Config`] if it is invalid.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        log::info!("Loading dashboard config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] describing the first problem.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let invalid = |message: String| Err(DashboardError::Config(message));

        if self.boundaries.path.is_some() && self.boundaries.url.is_some() {
            return invalid("boundaries: set either path or url, not both".to_string());
        }
        if self.statistics.months == 0 {
            return invalid("statistics.months must be at least 1".to_string());
        }
        if !(1..=MAX_BINS).contains(&self.map.bins) {
            return invalid(format!("map.bins must be between 1 and {MAX_BINS}"));
        }
        if self.map.binning == BinningKind::Thresholds {
            let thresholds = &self.map.thresholds;
            if thresholds.is_empty() {
                return invalid("map.thresholds is required when binning = \"thresholds\"".into());
            }
            if thresholds.len() >= MAX_BINS {
                return invalid(format!("map.thresholds allows at most {} cut points", MAX_BINS - 1));
            }
            if thresholds.iter().any(|t| !t.is_finite()) {
                return invalid("map.thresholds must be finite numbers".to_string());
            }
            if thresholds.windows(2).any(|w| w[0] >= w[1]) {
                return invalid("map.thresholds must be strictly ascending".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.statistics.seed, DEFAULT_SEED);
        assert_eq!(config.statistics.months, 12);
        assert_eq!(config.map.binning(), Binning::Quantile { bins: 5 });
        assert_eq!(config.boundaries.load_options(), LoadOptions::default());
    }

    #[test]
    fn full_file() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [boundaries]
            path = "data/counties.geojson"
            close_open_rings = true

            [statistics]
            seed = 7
            months = 24
            end_date = "2025-06-30"

            [map]
            binning = "thresholds"
            thresholds = [4.0, 6.0, 8.0]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.boundaries.path.as_deref(),
            Some(Path::new("data/counties.geojson"))
        );
        assert!(config.boundaries.load_options().close_open_rings);
        assert!(!config.boundaries.load_options().reproject_web_mercator);
        assert_eq!(config.statistics.seed, 7);

        let range = config.statistics.time_range();
        assert_eq!(range.months, 24);
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert_eq!(config.map.binning(), Binning::Thresholds(vec![4.0, 6.0, 8.0]));
    }

    #[test]
    fn rejects_bad_values() {
        for toml_str in [
            "[boundaries]\npath = \"a\"\nurl = \"https://example.com/c.geojson\"",
            "[statistics]\nmonths = 0",
            "[map]\nbins = 0",
            "[map]\nbins = 12",
            "[map]\nbinning = \"thresholds\"",
            "[map]\nbinning = \"thresholds\"\nthresholds = [5.0, 3.0]",
            "[map]\nbinning = \"jenks\"",
            "[map]\ncolor = \"red\"",
            "[statistics]\nend_date = \"June\"",
        ] {
            assert!(
                matches!(
                    DashboardConfig::from_toml_str(toml_str),
                    Err(DashboardError::Config(_))
                ),
                "expected config error for {toml_str:?}"
            );
        }
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.toml");
        std::fs::write(&path, "[statistics]\nseed = 99\n").unwrap();
        assert_eq!(DashboardConfig::load(&path).unwrap().statistics.seed, 99);
        assert!(matches!(
            DashboardConfig::load(&dir.path().join("missing.toml")),
            Err(DashboardError::Io(_))
        ));
    }
}
