//! Rendered view artifacts.
//!
//! These are plain owned values: a front end can draw them, serialize
//! them, or compare them without touching the engine again.

use chrono::NaiveDate;
use county_atlas_geography_models::CountyType;
use county_atlas_statistics_models::Metric;
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// Fill color for counties with no statistics in the snapshot.
pub const NO_DATA_COLOR: &str = "#d9d9d9";

/// Default number of quantile bins.
pub const DEFAULT_BINS: usize = 5;

/// How metric values are grouped into map color classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Binning {
    /// Equal-count classes computed from the snapshot's values.
    Quantile {
        /// Requested number of classes. Fewer may result when values repeat.
        bins: usize,
    },
    /// Fixed ascending cut points; `n` cuts make `n + 1` classes.
    Thresholds(Vec<f64>),
}

impl Default for Binning {
    fn default() -> Self {
        Self::Quantile { bins: DEFAULT_BINS }
    }
}

/// How one county is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FeatureStyle {
    /// The county has a value in class `index`.
    Bin {
        /// Zero-based class index.
        index: usize,
        /// Hex fill color.
        color: &'static str,
    },
    /// The county has no statistics for the snapshot.
    NoData,
}

impl FeatureStyle {
    /// Hex fill color.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Bin { color, .. } => color,
            Self::NoData => NO_DATA_COLOR,
        }
    }

    /// Class index, or `None` for [`FeatureStyle::NoData`].
    #[must_use]
    pub const fn bin(&self) -> Option<usize> {
        match self {
            Self::Bin { index, .. } => Some(*index),
            Self::NoData => None,
        }
    }
}

/// One county on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    /// County name.
    pub county: String,
    /// State name.
    pub state: String,
    /// Legal type of the county.
    pub county_type: CountyType,
    /// Boundary in WGS84.
    pub boundary: MultiPolygon<f64>,
    /// Metric value, if the county has a row in the snapshot.
    pub value: Option<f64>,
    /// Fill style.
    pub style: FeatureStyle,
}

/// One class in the map legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Zero-based class index.
    pub index: usize,
    /// Smallest value in the class.
    pub lower: f64,
    /// Largest value in the class.
    pub upper: f64,
    /// Hex fill color.
    pub color: String,
}

/// Descriptive statistics over the mapped values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    /// Number of counties with a value.
    pub count: usize,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the two middle values for even counts).
    pub median: f64,
}

/// A county and its value, for rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCounty {
    /// County name.
    pub county: String,
    /// State name.
    pub state: String,
    /// Metric value.
    pub value: f64,
}

/// A rendered choropleth snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MapArtifact {
    /// Mapped metric.
    pub metric: Metric,
    /// Snapshot period.
    pub date: NaiveDate,
    /// One feature per county in scope, ordered by state then county.
    pub features: Vec<MapFeature>,
    /// Color classes in ascending order.
    pub legend: Vec<LegendEntry>,
    /// Statistics over the features that have values. `None` when no
    /// county could be joined to a boundary.
    pub summary: Option<SnapshotSummary>,
}

impl MapArtifact {
    /// Number of features drawn with a data color.
    #[must_use]
    pub fn styled_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| matches!(f.style, FeatureStyle::Bin { .. }))
            .count()
    }

    /// Number of features drawn as no-data.
    #[must_use]
    pub fn no_data_count(&self) -> usize {
        self.features.len() - self.styled_count()
    }

    /// Looks up a feature by identity.
    #[must_use]
    pub fn feature(&self, county: &str, state: &str) -> Option<&MapFeature> {
        self.features
            .iter()
            .find(|f| f.county == county && f.state == state)
    }

    /// The `n` counties with the highest values, descending. Ties are
    /// ordered by state then county.
    #[must_use]
    pub fn top_counties(&self, n: usize) -> Vec<RankedCounty> {
        let mut ranked: Vec<RankedCounty> = self
            .features
            .iter()
            .filter_map(|f| {
                f.value.map(|value| RankedCounty {
                    county: f.county.clone(),
                    state: f.state.clone(),
                    value,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.state.cmp(&b.state))
                .then_with(|| a.county.cmp(&b.county))
        });
        ranked.truncate(n);
        ranked
    }

    /// Serializes the map as a GeoJSON `FeatureCollection` whose features
    /// carry `name`, `state`, `county_type`, `value`, `bin`, and `fill`
    /// properties.
    #[must_use]
    pub fn to_geojson(&self) -> serde_json::Value {
        let features: Vec<serde_json::Value> = self
            .features
            .iter()
            .map(|f| {
                let geometry = geojson::Geometry::new(geojson::Value::from(&f.boundary));
                serde_json::json!({
                    "type": "Feature",
                    "geometry": geometry,
                    "properties": {
                        "name": f.county,
                        "state": f.state,
                        "county_type": f.county_type,
                        "value": f.value,
                        "bin": f.style.bin(),
                        "fill": f.style.color(),
                    }
                })
            })
            .collect();

        serde_json::json!({
            "type": "FeatureCollection",
            "metric": self.metric,
            "date": self.date,
            "legend": self.legend,
            "features": features,
        })
    }
}

/// How trend rows are grouped into series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGrouping {
    /// One series per (county, state).
    PerCounty,
    /// One series of per-date means across all counties in scope.
    Aggregate,
}

/// One point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Period end date.
    pub date: NaiveDate,
    /// Metric value (or mean) for the period.
    pub value: f64,
}

/// A labeled time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// Display label, e.g. `"Adams, Ohio"` or `"Ohio (mean)"`.
    pub label: String,
    /// County, for per-county series.
    pub county: Option<String>,
    /// State, for per-county series.
    pub state: Option<String>,
    /// Points in ascending date order.
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Value at the latest period.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Percent change from the first to the last period. `None` for
    /// fewer than two points or a zero starting value.
    #[must_use]
    pub fn percent_change(&self) -> Option<f64> {
        let first = self.points.first()?.value;
        let last = self.points.last()?.value;
        if self.points.len() < 2 || first.abs() < f64::EPSILON {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

/// A rendered trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChart {
    /// Charted metric.
    pub metric: Metric,
    /// How rows were grouped.
    pub grouping: TrendGrouping,
    /// Series ordered by state then county (a single series when
    /// aggregated).
    pub series: Vec<TrendSeries>,
}

/// What the dashboard currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// A choropleth snapshot.
    Map(MapArtifact),
    /// A trend chart.
    Trend(TrendChart),
    /// The selection is valid but matched nothing.
    NoData {
        /// Explanation suitable for display.
        reason: String,
    },
}

impl DashboardView {
    /// The map, if this is a map view.
    #[must_use]
    pub const fn as_map(&self) -> Option<&MapArtifact> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The chart, if this is a trend view.
    #[must_use]
    pub const fn as_trend(&self) -> Option<&TrendChart> {
        match self {
            Self::Trend(chart) => Some(chart),
            _ => None,
        }
    }
}
