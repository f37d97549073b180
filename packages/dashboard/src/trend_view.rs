//! Time series rendering.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use county_atlas_dashboard_models::view::{TrendChart, TrendGrouping, TrendPoint, TrendSeries};
use county_atlas_dashboard_models::{EmptyDataError, Scope, ViewMode};
use county_atlas_geography_models::CountyKey;
use county_atlas_statistics_models::{Metric, StatRecord};

/// Grouping the dashboard uses for a county scope: one mean line when
/// every county is selected, individual lines otherwise.
#[must_use]
pub const fn grouping_for(county: &Scope) -> TrendGrouping {
    match county {
        Scope::All => TrendGrouping::Aggregate,
        Scope::Named(_) => TrendGrouping::PerCounty,
    }
}

/// Renders `metric` over time from `records`.
///
/// Aggregate series are labeled with the single state the rows come from,
/// or "All States" when they span several.
///
/// # Errors
///
/// Returns [`EmptyDataError`] if `records` is empty.
pub fn render(
    records: &[StatRecord],
    metric: Metric,
    grouping: TrendGrouping,
) -> Result<TrendChart, EmptyDataError> {
    if records.is_empty() {
        return Err(EmptyDataError {
            view: ViewMode::Trends,
            context: format!("{} across the selected counties", metric.label()),
        });
    }

    let series = match grouping {
        TrendGrouping::PerCounty => per_county(records, metric),
        TrendGrouping::Aggregate => vec![aggregate(records, metric)],
    };

    log::debug!(
        "Rendered {} trend with {} series over {} periods",
        metric,
        series.len(),
        series.first().map_or(0, |s| s.points.len())
    );

    Ok(TrendChart {
        metric,
        grouping,
        series,
    })
}

fn per_county(records: &[StatRecord], metric: Metric) -> Vec<TrendSeries> {
    let mut grouped: BTreeMap<(&str, &str), Vec<TrendPoint>> = BTreeMap::new();
    for record in records {
        grouped
            .entry((record.state.as_str(), record.county.as_str()))
            .or_default()
            .push(TrendPoint {
                date: record.date,
                value: metric.value(record),
            });
    }

    grouped
        .into_iter()
        .map(|((state, county), mut points)| {
            points.sort_by_key(|p| p.date);
            TrendSeries {
                label: CountyKey::new(county, state).to_string(),
                county: Some(county.to_string()),
                state: Some(state.to_string()),
                points,
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn aggregate(records: &[StatRecord], metric: Metric) -> TrendSeries {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.date).or_insert((0.0, 0));
        entry.0 += metric.value(record);
        entry.1 += 1;
    }

    let states: BTreeSet<&str> = records.iter().map(|r| r.state.as_str()).collect();
    let scope = match states.iter().next() {
        Some(state) if states.len() == 1 => (*state).to_string(),
        _ => Scope::ALL_STATES_LABEL.to_string(),
    };

    TrendSeries {
        label: format!("{scope} (mean)"),
        county: None,
        state: (states.len() == 1).then(|| scope.clone()),
        points: sums
            .into_iter()
            .map(|(date, (sum, count))| TrendPoint {
                date,
                value: sum / count as f64,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use county_atlas_geography_models::CountyType;
    use county_atlas_statistics_models::month_end;

    use super::*;

    fn row(county: &str, state: &str, month: u32, population: u64) -> StatRecord {
        StatRecord {
            county: county.to_string(),
            state: state.to_string(),
            date: month_end(2025, month).unwrap(),
            population,
            gdp_millions: 1_000.0,
            unemployment_rate: 5.0,
            median_income: 50_000.0,
            county_type: CountyType::County,
        }
    }

    #[test]
    fn grouping_follows_county_scope() {
        assert_eq!(grouping_for(&Scope::All), TrendGrouping::Aggregate);
        assert_eq!(
            grouping_for(&Scope::named("Adams")),
            TrendGrouping::PerCounty
        );
    }

    #[test]
    fn aggregate_is_mean_per_date() {
        let rows = vec![
            row("Adams", "Ohio", 1, 10_000),
            row("Brown", "Ohio", 1, 30_000),
            row("Adams", "Ohio", 2, 20_000),
            row("Brown", "Ohio", 2, 40_000),
        ];
        let chart = render(&rows, Metric::Population, TrendGrouping::Aggregate).unwrap();
        assert_eq!(chart.series.len(), 1);
        let series = &chart.series[0];
        assert_eq!(series.label, "Ohio (mean)");
        assert_eq!(series.state.as_deref(), Some("Ohio"));
        assert_eq!(series.points.len(), 2);
        assert!((series.points[0].value - 20_000.0).abs() < f64::EPSILON);
        assert!((series.points[1].value - 30_000.0).abs() < f64::EPSILON);
        assert!(series.points[0].date < series.points[1].date);
    }

    #[test]
    fn aggregate_across_states() {
        let rows = vec![row("Adams", "Ohio", 1, 10_000), row("Kent", "Delaware", 1, 20_000)];
        let chart = render(&rows, Metric::Population, TrendGrouping::Aggregate).unwrap();
        assert_eq!(chart.series[0].label, "All States (mean)");
        assert_eq!(chart.series[0].state, None);
    }

    #[test]
    fn per_county_series_split_by_state() {
        let rows = vec![
            row("Adams", "Ohio", 2, 12_000),
            row("Adams", "Colorado", 1, 50_000),
            row("Adams", "Ohio", 1, 11_000),
            row("Adams", "Colorado", 2, 51_000),
        ];
        let chart = render(&rows, Metric::Population, TrendGrouping::PerCounty).unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].label, "Adams, Colorado");
        assert_eq!(chart.series[1].label, "Adams, Ohio");
        assert!((chart.series[1].points[0].value - 11_000.0).abs() < f64::EPSILON);
        assert!(chart.series[1].points[0].date < chart.series[1].points[1].date);
    }

    #[test]
    fn empty_rows_are_error() {
        let err = render(&[], Metric::MedianIncome, TrendGrouping::PerCounty).unwrap_err();
        assert_eq!(err.view, ViewMode::Trends);
    }
}
