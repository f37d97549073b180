//! Applies a selection to the boundary and statistics tables.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use county_atlas_dashboard_models::{InvalidSelectionError, SelectionState};
use county_atlas_geography_models::CountyGeometry;
use county_atlas_statistics_models::{Metric, StatRecord};

/// The subset of data one selection covers.
///
/// Owned and detached from the source tables; recomputed on every
/// selection change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSlice {
    /// Selection that produced this slice.
    pub selection: SelectionState,
    /// Snapshot period the time index resolved to.
    pub date: NaiveDate,
    /// Rows in scope for the snapshot period, ordered by state then county.
    pub snapshot: Vec<StatRecord>,
    /// Rows in scope for every period, ordered by date, state, county.
    pub trend: Vec<StatRecord>,
    /// Boundaries in the state scope. The county filter is not applied so
    /// the map keeps its surrounding context.
    pub geometries: Vec<CountyGeometry>,
}

impl FilteredSlice {
    /// Selected metric.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.selection.metric
    }

    /// Returns `true` if no rows matched the state and county filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }
}

/// Filters `records` and `geometries` by `selection`.
///
/// The snapshot period is looked up in the sorted distinct dates of the
/// full `records` table, not the filtered subset.
///
/// # Errors
///
/// Returns [`InvalidSelectionError::TimeIndexOutOfRange`] if the time
/// index is past the last distinct date.
pub fn filter(
    records: &[StatRecord],
    geometries: &[CountyGeometry],
    selection: &SelectionState,
) -> Result<FilteredSlice, InvalidSelectionError> {
    let dates: Vec<NaiveDate> = records
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    filter_with_dates(records, &dates, geometries, selection)
}

/// Like [`filter`], with the table's sorted distinct dates supplied by the
/// caller.
///
/// # Errors
///
/// Returns [`InvalidSelectionError::TimeIndexOutOfRange`] if the time
/// index is not a valid index into `dates`.
pub fn filter_with_dates(
    records: &[StatRecord],
    dates: &[NaiveDate],
    geometries: &[CountyGeometry],
    selection: &SelectionState,
) -> Result<FilteredSlice, InvalidSelectionError> {
    let date = *dates.get(selection.time_index).ok_or(
        InvalidSelectionError::TimeIndexOutOfRange {
            index: selection.time_index,
            len: dates.len(),
        },
    )?;

    let mut trend: Vec<StatRecord> = records
        .iter()
        .filter(|r| selection.state.matches(&r.state) && selection.county.matches(&r.county))
        .cloned()
        .collect();
    trend.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.state.cmp(&b.state))
            .then_with(|| a.county.cmp(&b.county))
    });

    let snapshot: Vec<StatRecord> = trend.iter().filter(|r| r.date == date).cloned().collect();

    let geometries: Vec<CountyGeometry> = geometries
        .iter()
        .filter(|g| selection.state.matches(&g.state))
        .cloned()
        .collect();

    log::debug!(
        "Filtered {}: {} snapshot rows, {} trend rows, {} boundaries",
        selection.describe(),
        snapshot.len(),
        trend.len(),
        geometries.len()
    );

    Ok(FilteredSlice {
        selection: selection.clone(),
        date,
        snapshot,
        trend,
        geometries,
    })
}

#[cfg(test)]
mod tests {
    use county_atlas_dashboard_models::Scope;
    use county_atlas_geography_models::CountyType;
    use county_atlas_statistics_models::month_end;
    use geo::{MultiPolygon, polygon};
    use proptest::prelude::*;

    use super::*;

    const COUNTIES: &[(&str, &str)] = &[
        ("Adams", "Ohio"),
        ("Brown", "Ohio"),
        ("Adams", "Colorado"),
        ("Denver", "Colorado"),
        ("Kent", "Delaware"),
    ];

    fn records(months: u32) -> Vec<StatRecord> {
        let mut out = Vec::new();
        for (i, (county, state)) in COUNTIES.iter().enumerate() {
            for month in 1..=months {
                out.push(StatRecord {
                    county: (*county).to_string(),
                    state: (*state).to_string(),
                    date: month_end(2025, month).unwrap(),
                    population: 40_000 + 1_000 * i as u64 + u64::from(month),
                    gdp_millions: 1_500.0,
                    unemployment_rate: 3.0 + f64::from(month) / 10.0,
                    median_income: 55_000.0,
                    county_type: CountyType::County,
                });
            }
        }
        out
    }

    fn geometries() -> Vec<CountyGeometry> {
        COUNTIES
            .iter()
            .enumerate()
            .map(|(i, (county, state))| {
                #[allow(clippy::cast_precision_loss)]
                let x = -100.0 + i as f64;
                CountyGeometry {
                    name: (*county).to_string(),
                    state: (*state).to_string(),
                    county_type: CountyType::County,
                    geoid: None,
                    boundary: MultiPolygon(vec![polygon![
                        (x: x, y: 40.0),
                        (x: x + 0.5, y: 40.0),
                        (x: x + 0.5, y: 40.5),
                        (x: x, y: 40.0),
                    ]]),
                }
            })
            .collect()
    }

    #[test]
    fn everything_selected() {
        let records = records(12);
        let slice = filter(&records, &geometries(), &SelectionState::initial(12)).unwrap();
        assert_eq!(slice.date, month_end(2025, 12).unwrap());
        assert_eq!(slice.snapshot.len(), COUNTIES.len());
        assert_eq!(slice.trend.len(), COUNTIES.len() * 12);
        assert_eq!(slice.geometries.len(), COUNTIES.len());
        assert!(slice.trend.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn state_scope_keeps_state_geometries_only() {
        let records = records(3);
        let selection = SelectionState::initial(3)
            .with_state(Scope::named("Ohio"))
            .with_county(Scope::named("Adams"));
        let slice = filter(&records, &geometries(), &selection).unwrap();

        assert_eq!(slice.snapshot.len(), 1);
        assert_eq!(slice.snapshot[0].state, "Ohio");
        assert_eq!(slice.trend.len(), 3);
        assert_eq!(slice.geometries.len(), 2);
        assert!(slice.geometries.iter().all(|g| g.state == "Ohio"));
    }

    #[test]
    fn county_name_across_states() {
        let records = records(2);
        let selection = SelectionState::initial(2).with_county(Scope::named("Adams"));
        let slice = filter(&records, &geometries(), &selection).unwrap();
        assert_eq!(slice.snapshot.len(), 2);
        assert_eq!(slice.snapshot[0].state, "Colorado");
        assert_eq!(slice.snapshot[1].state, "Ohio");
    }

    #[test]
    fn unknown_county_is_empty_not_error() {
        let records = records(2);
        let selection = SelectionState::initial(2)
            .with_state(Scope::named("Delaware"))
            .with_county(Scope::named("Adams"));
        let slice = filter(&records, &geometries(), &selection).unwrap();
        assert!(slice.is_empty());
        assert!(slice.snapshot.is_empty());
        assert_eq!(slice.geometries.len(), 1);
    }

    #[test]
    fn time_index_out_of_range() {
        let records = records(12);
        let selection = SelectionState::initial(12).with_time_index(12);
        assert_eq!(
            filter(&records, &geometries(), &selection),
            Err(InvalidSelectionError::TimeIndexOutOfRange { index: 12, len: 12 })
        );
        assert_eq!(
            filter(&[], &geometries(), &SelectionState::initial(0)),
            Err(InvalidSelectionError::TimeIndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn snapshot_date_comes_from_full_table() {
        let mut records = records(3);
        // Delaware stops reporting after January.
        records.retain(|r| r.state != "Delaware" || r.date == month_end(2025, 1).unwrap());
        let selection = SelectionState::initial(3).with_state(Scope::named("Delaware"));
        let slice = filter(&records, &geometries(), &selection).unwrap();
        assert_eq!(slice.date, month_end(2025, 3).unwrap());
        assert!(slice.snapshot.is_empty());
        assert_eq!(slice.trend.len(), 1);
    }

    fn scope_strategy() -> impl Strategy<Value = Scope> {
        prop_oneof![
            Just(Scope::All),
            Just(Scope::named("Ohio")),
            Just(Scope::named("Colorado")),
            Just(Scope::named("Nowhere")),
        ]
    }

    fn county_strategy() -> impl Strategy<Value = Scope> {
        prop_oneof![
            Just(Scope::All),
            Just(Scope::named("Adams")),
            Just(Scope::named("Kent")),
            Just(Scope::named("Missing")),
        ]
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            state in scope_strategy(),
            county in county_strategy(),
            metric_index in 0..Metric::all().len(),
            time_index in 0usize..8,
        ) {
            let records = records(6);
            let geometries = geometries();
            let selection = SelectionState {
                state,
                county,
                metric: Metric::all()[metric_index],
                time_index,
            };

            let first = filter(&records, &geometries, &selection);
            let second = filter(&records, &geometries, &selection);
            prop_assert_eq!(&first, &second);

            if let Ok(slice) = first {
                prop_assert!(slice.snapshot.iter().all(|r| r.date == slice.date));
                prop_assert!(slice.trend.iter().all(|r| selection.state.matches(&r.state)
                    && selection.county.matches(&r.county)));
            } else {
                prop_assert!(time_index >= 6);
            }
        }
    }
}
