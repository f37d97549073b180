//! Deterministic sample county boundaries.
//!
//! Lays out square county cells on a half-degree grid over the contiguous
//! US and deals them round-robin across the 50 states + DC. Useful when no
//! real boundary file is at hand: demos, the CLI's `--sample-counties`
//! flag, and full-scale (3,143 county) tests.
//!
//! The grid holds `GRID_COLUMNS * GRID_ROWS` cells; larger counts wrap back
//! to the first row, so later cells sit on top of earlier ones.

use county_atlas_geography_models::{CountyType, fips};

/// Number of county-equivalents in the 50 states + DC.
pub const US_COUNTY_COUNT: usize = 3_143;

/// Grid columns before wrapping to the next row.
const GRID_COLUMNS: usize = 110;

/// Grid rows before wrapping back to the origin. Keeps every cell below
/// latitude 90.
const GRID_ROWS: usize = 130;

/// Grid spacing in degrees.
const CELL_SPACING: f64 = 0.5;

/// Side length of each county square in degrees.
const CELL_SIZE: f64 = 0.45;

const ORIGIN_LON: f64 = -124.5;
const ORIGIN_LAT: f64 = 24.5;

/// Builds a `GeoJSON` `FeatureCollection` of `count` sample counties.
///
/// Names follow `"Sample <n>"` with `n` counting per state, so identities
/// are unique. Louisiana entries are parishes and Alaska entries boroughs.
#[must_use]
pub fn sample_feature_collection(count: usize) -> serde_json::Value {
    let states = fips::STATE_FIPS;
    let mut per_state = vec![0usize; states.len()];

    let features: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let slot = i % states.len();
            per_state[slot] += 1;
            let state_fips = states[slot];
            let number = per_state[slot];

            #[allow(clippy::cast_precision_loss)]
            let (x, y) = (
                ((i % GRID_COLUMNS) as f64).mul_add(CELL_SPACING, ORIGIN_LON),
                (((i / GRID_COLUMNS) % GRID_ROWS) as f64).mul_add(CELL_SPACING, ORIGIN_LAT),
            );

            let county_type = match state_fips {
                "22" => CountyType::Parish,
                "02" => CountyType::Borough,
                _ => CountyType::County,
            };

            serde_json::json!({
                "type": "Feature",
                "properties": {
                    "name": format!("Sample {number}"),
                    "state": fips::state_name(state_fips),
                    "STUSPS": fips::state_abbr(state_fips),
                    "county_type": county_type,
                    "geoid": format!("{state_fips}{number:03}"),
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [x, y],
                        [x + CELL_SIZE, y],
                        [x + CELL_SIZE, y + CELL_SIZE],
                        [x, y + CELL_SIZE],
                        [x, y],
                    ]],
                },
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
