//! Choropleth rendering.
//!
//! Statistics are joined to boundaries by (county, state). Values are
//! classed by [`Binning`] and colored from a sequential palette chosen per
//! metric; counties in scope without a row are drawn as no-data.

use std::collections::BTreeMap;

use county_atlas_dashboard_models::view::{
    Binning, FeatureStyle, LegendEntry, MapArtifact, MapFeature, SnapshotSummary,
};
use county_atlas_dashboard_models::{EmptyDataError, ViewMode};
use county_atlas_geography_models::CountyGeometry;
use county_atlas_statistics_models::{Metric, StatRecord};

const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];
const GREENS: &[&str] = &[
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#006d2c",
    "#00441b",
];
const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
    "#67000d",
];
const PURPLES: &[&str] = &[
    "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#54278f",
    "#3f007d",
];

/// Most classes a palette can tell apart.
pub const MAX_BINS: usize = 9;

/// Sequential palette for `metric`, lightest first.
#[must_use]
pub const fn palette(metric: Metric) -> &'static [&'static str] {
    match metric {
        Metric::Population => BLUES,
        Metric::GdpMillions => GREENS,
        Metric::UnemploymentRate => REDS,
        Metric::MedianIncome => PURPLES,
    }
}

/// Color for class `index` of `bin_count`, spread across the palette so
/// the darkest color always marks the top class.
fn color_for(metric: Metric, index: usize, bin_count: usize) -> &'static str {
    let colors = palette(metric);
    let last = colors.len() - 1;
    let position = if bin_count <= 1 {
        last / 2
    } else {
        (index * last / (bin_count - 1)).min(last)
    };
    colors[position]
}

/// Class boundaries for `values` (need not be sorted).
///
/// Quantile cuts use linear interpolation between order statistics;
/// duplicate cuts collapse and cuts at or above the maximum are dropped so
/// no class is empty at the top. Threshold cuts are sorted and
/// deduplicated.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cut_points(values: &[f64], binning: &Binning) -> Vec<f64> {
    let mut cuts = match binning {
        Binning::Quantile { bins } => {
            let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
            if sorted.is_empty() {
                return Vec::new();
            }
            sorted.sort_by(f64::total_cmp);
            let max = sorted[sorted.len() - 1];
            let bins = (*bins).max(1);
            let mut cuts: Vec<f64> = (1..bins)
                .map(|k| quantile(&sorted, k as f64 / bins as f64))
                .collect();
            cuts.retain(|c| *c < max);
            cuts
        }
        Binning::Thresholds(thresholds) => {
            let mut cuts: Vec<f64> = thresholds.iter().copied().filter(|c| c.is_finite()).collect();
            cuts.sort_by(f64::total_cmp);
            cuts
        }
    };
    cuts.dedup_by(|a, b| (*a - *b).abs() <= f64::EPSILON * a.abs().max(1.0));
    cuts
}

/// Linear-interpolated quantile of ascending `sorted` at `q` in `[0, 1]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Class of `value`: the number of cut points strictly below it.
#[must_use]
pub fn bin_index(cuts: &[f64], value: f64) -> usize {
    cuts.partition_point(|cut| *cut < value)
}

/// Count, extremes, mean, and median of `values`. `None` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(values: &[f64]) -> Option<SnapshotSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();
    let mid = count / 2;
    let median = if count % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    };
    Some(SnapshotSummary {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        mean: sorted.iter().sum::<f64>() / count as f64,
        median,
    })
}

/// Renders a choropleth of `metric` over `geometries` from the snapshot
/// rows.
///
/// Rows without a matching boundary are left off the map. Boundaries
/// without a matching row are drawn as [`FeatureStyle::NoData`].
///
/// # Errors
///
/// Returns [`EmptyDataError`] if `snapshot` has no rows.
pub fn render(
    snapshot: &[StatRecord],
    metric: Metric,
    geometries: &[CountyGeometry],
    binning: &Binning,
) -> Result<MapArtifact, EmptyDataError> {
    let Some(first) = snapshot.first() else {
        return Err(EmptyDataError {
            view: ViewMode::Map,
            context: format!("{} in the selected period", metric.label()),
        });
    };
    let date = first.date;

    let by_key: BTreeMap<(&str, &str), f64> = snapshot
        .iter()
        .map(|r| ((r.county.as_str(), r.state.as_str()), metric.value(r)))
        .collect();

    let joined: Vec<f64> = geometries
        .iter()
        .filter_map(|g| by_key.get(&(g.name.as_str(), g.state.as_str())).copied())
        .collect();

    let unmatched = snapshot.len().saturating_sub(joined.len());
    if unmatched > 0 {
        log::debug!("{unmatched} snapshot rows have no boundary and are left off the map");
    }

    let cuts = cut_points(&joined, binning);
    let bin_count = cuts.len() + 1;

    let features: Vec<MapFeature> = geometries
        .iter()
        .map(|g| {
            let value = by_key.get(&(g.name.as_str(), g.state.as_str())).copied();
            let style = value.map_or(FeatureStyle::NoData, |v| {
                let index = bin_index(&cuts, v);
                FeatureStyle::Bin {
                    index,
                    color: color_for(metric, index, bin_count),
                }
            });
            MapFeature {
                county: g.name.clone(),
                state: g.state.clone(),
                county_type: g.county_type,
                boundary: g.boundary.clone(),
                value,
                style,
            }
        })
        .collect();

    let summary = summarize(&joined);
    let legend = summary.map_or_else(Vec::new, |s| build_legend(metric, &cuts, s.min, s.max));

    log::debug!(
        "Rendered {} map for {date}: {} of {} counties styled in {bin_count} classes",
        metric,
        joined.len(),
        features.len(),
    );

    Ok(MapArtifact {
        metric,
        date,
        features,
        legend,
        summary,
    })
}

fn build_legend(metric: Metric, cuts: &[f64], min: f64, max: f64) -> Vec<LegendEntry> {
    let bin_count = cuts.len() + 1;
    (0..bin_count)
        .map(|index| {
            let lower = if index == 0 {
                cuts.first().map_or(min, |c| min.min(*c))
            } else {
                cuts[index - 1]
            };
            let upper = if index == bin_count - 1 {
                cuts.last().map_or(max, |c| max.max(*c))
            } else {
                cuts[index]
            };
            LegendEntry {
                index,
                lower,
                upper,
                color: color_for(metric, index, bin_count).to_string(),
            }
        })
        .collect()
}
