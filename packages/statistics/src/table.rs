//! Validated, immutable statistics panel.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use chrono::NaiveDate;
use county_atlas_geography_models::CountyKey;
use county_atlas_statistics_models::{Metric, StatRecord};

use crate::StatsError;

/// A complete panel: every county has exactly one row for every date.
///
/// Rows are ordered by state, county, then date. The table is never
/// mutated after construction; consumers filter and copy out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsTable {
    records: Vec<StatRecord>,
    dates: Vec<NaiveDate>,
    county_count: usize,
}

impl StatisticsTable {
    /// Validates `records` and builds a table.
    ///
    /// # Errors
    ///
    /// * [`StatsError::Empty`] if `records` is empty.
    /// * [`StatsError::OutOfBand`] if any metric is outside its band.
    /// * [`StatsError::DuplicateRow`] if a (county, state, date) repeats.
    /// * [`StatsError::IncompletePanel`] if a county lacks any date.
    pub fn from_records(mut records: Vec<StatRecord>) -> Result<Self, StatsError> {
        if records.is_empty() {
            return Err(StatsError::Empty);
        }

        let mut seen = BTreeSet::new();
        let mut per_county: BTreeMap<CountyKey, usize> = BTreeMap::new();
        let mut dates = BTreeSet::new();

        for record in &records {
            for metric in Metric::all() {
                let value = metric.value(record);
                if !metric.band().contains(value) {
                    return Err(StatsError::OutOfBand {
                        key: record.key(),
                        date: record.date,
                        metric: *metric,
                        value,
                    });
                }
            }

            if !seen.insert((record.key(), record.date)) {
                return Err(StatsError::DuplicateRow {
                    key: record.key(),
                    date: record.date,
                });
            }

            *per_county.entry(record.key()).or_default() += 1;
            dates.insert(record.date);
        }

        let expected = dates.len();
        if let Some((key, &found)) = per_county.iter().find(|(_, n)| **n != expected) {
            return Err(StatsError::IncompletePanel {
                key: key.clone(),
                found,
                expected,
            });
        }

        records.sort_by(|a, b| {
            a.state
                .cmp(&b.state)
                .then_with(|| a.county.cmp(&b.county))
                .then_with(|| a.date.cmp(&b.date))
        });

        Ok(Self {
            records,
            dates: dates.into_iter().collect(),
            county_count: per_county.len(),
        })
    }

    /// All rows, ordered by state, county, date.
    #[must_use]
    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; an empty table cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct period dates.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of distinct counties.
    #[must_use]
    pub const fn county_count(&self) -> usize {
        self.county_count
    }

    /// One county's rows, ordered by date.
    pub fn series_for<'a>(
        &'a self,
        county: &'a str,
        state: &'a str,
    ) -> impl Iterator<Item = &'a StatRecord> + 'a {
        self.records.iter().filter(move |r| r.matches(county, state))
    }

    /// Writes the table as CSV with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if serialization or the write fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), StatsError> {
        write_records_csv(&self.records, writer)
    }

    /// Reads and validates a table from CSV written by [`Self::write_csv`].
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if a row cannot be parsed or the panel fails
    /// validation.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, StatsError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let records = rdr
            .deserialize::<StatRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Read {} statistics rows from CSV", records.len());
        Self::from_records(records)
    }
}

/// Writes `records` as CSV with a header row, in the order given.
///
/// # Errors
///
/// Returns [`StatsError`] if serialization or the write fails.
pub fn write_records_csv<W: Write>(records: &[StatRecord], writer: W) -> Result<(), StatsError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    log::info!("Exported {} statistics rows", records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use county_atlas_geography_models::CountyType;

    use super::*;

    fn record(county: &str, state: &str, month: u32) -> StatRecord {
        StatRecord {
            county: county.to_string(),
            state: state.to_string(),
            date: county_atlas_statistics_models::month_end(2025, month).unwrap(),
            population: 50_000,
            gdp_millions: 2_500.5,
            unemployment_rate: 4.2,
            median_income: 61_000.0,
            county_type: CountyType::County,
        }
    }

    #[test]
    fn sorts_and_indexes_dates() {
        let table = StatisticsTable::from_records(vec![
            record("Kent", "Delaware", 2),
            record("Kent", "Delaware", 1),
            record("Adams", "Colorado", 2),
            record("Adams", "Colorado", 1),
        ])
        .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.county_count(), 2);
        assert_eq!(table.dates().len(), 2);
        assert_eq!(table.records()[0].county, "Adams");
        assert!(table.records()[0].date < table.records()[1].date);
        assert_eq!(table.series_for("Kent", "Delaware").count(), 2);
    }

    #[test]
    fn rejects_out_of_band() {
        let mut bad = record("Kent", "Delaware", 1);
        bad.unemployment_rate = 27.0;
        assert!(matches!(
            StatisticsTable::from_records(vec![bad]),
            Err(StatsError::OutOfBand {
                metric: Metric::UnemploymentRate,
                ..
            })
        ));
    }

    #[test]
    fn rejects_duplicates() {
        assert!(matches!(
            StatisticsTable::from_records(vec![
                record("Kent", "Delaware", 1),
                record("Kent", "Delaware", 1),
            ]),
            Err(StatsError::DuplicateRow { .. })
        ));
    }

    #[test]
    fn rejects_incomplete_panel() {
        assert!(matches!(
            StatisticsTable::from_records(vec![
                record("Kent", "Delaware", 1),
                record("Kent", "Delaware", 2),
                record("Adams", "Colorado", 1),
            ]),
            Err(StatsError::IncompletePanel {
                found: 1,
                expected: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            StatisticsTable::from_records(Vec::new()),
            Err(StatsError::Empty)
        ));
    }

    #[test]
    fn csv_header_and_reload() {
        let table = StatisticsTable::from_records(vec![
            record("Kent", "Delaware", 1),
            record("Kent", "Delaware", 2),
        ])
        .unwrap();

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with(
            "county,state,date,population,gdp_millions,unemployment_rate,median_income,county_type\n"
        ));
        assert!(text.contains("Kent,Delaware,2025-01-31,50000,2500.5,4.2,61000.0,county"));

        let reloaded = StatisticsTable::read_csv(buf.as_slice()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn csv_with_missing_field_fails() {
        let text = "county,state,date,population,gdp_millions,unemployment_rate,median_income,county_type\n\
                    Kent,Delaware,2025-01-31,50000,,4.2,61000.0,county\n";
        assert!(matches!(
            StatisticsTable::read_csv(text.as_bytes()),
            Err(StatsError::Csv(_))
        ));
    }
}
