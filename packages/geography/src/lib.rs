#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County boundary loading and validation.
//!
//! Reads county polygons from a `GeoJSON` `FeatureCollection` (file, inline
//! text, or a remote URL fetched up front), validates every geometry and the
//! declared coordinate reference system, and exposes them through the
//! immutable [`BoundaryStore`]. Invalid input is rejected rather than
//! dropped; the only repairs performed are the ones a caller opts into via
//! [`LoadOptions`].

pub mod export;
pub mod fetch;
pub mod parse;
pub mod sample;

use std::collections::BTreeMap;
use std::path::PathBuf;

use county_atlas_geography_models::{CountyGeometry, CountyKey, Crs};
use geo::{BoundingRect as _, Contains as _, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

/// Errors raised when a boundary source cannot be read or understood.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the source file failed.
    #[error("I/O error reading boundary source: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote boundary source failed.
    #[error("HTTP error fetching boundary source: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote source answered with a non-success status.
    #[error("Boundary request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The source is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A geometry could not be converted by the `GeoJSON` reader.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document is not a `FeatureCollection` with a `features` array.
    #[error("Expected a GeoJSON FeatureCollection, found {found}")]
    NotFeatureCollection {
        /// The `type` member that was found instead.
        found: String,
    },

    /// A feature has no geometry.
    #[error("Feature #{index} has no geometry")]
    MissingGeometry {
        /// Position of the feature in the collection.
        index: usize,
    },

    /// A feature lacks an identifying attribute.
    #[error("Feature #{index} is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Position of the feature in the collection.
        index: usize,
        /// Attribute that could not be resolved.
        attribute: &'static str,
    },

    /// A feature names a state that is not in the FIPS tables.
    #[error("Feature #{index} references unknown state '{value}'")]
    UnknownState {
        /// Position of the feature in the collection.
        index: usize,
        /// The unrecognized state value.
        value: String,
    },

    /// A coordinate position is not a pair of numbers.
    #[error("Feature '{feature}' has a malformed coordinate position")]
    MalformedPosition {
        /// Feature label.
        feature: String,
    },

    /// The collection contains no features.
    #[error("Boundary source contains no features")]
    Empty,
}

/// Errors raised when geometry fails validation.
#[derive(Debug, Error)]
pub enum GeometryValidationError {
    /// The declared CRS is not WGS84 and no reprojection was requested.
    #[error("Feature '{feature}' uses CRS {found}, expected {expected}")]
    CrsMismatch {
        /// Feature label (or `"collection"` for the top-level member).
        feature: String,
        /// Required CRS.
        expected: Crs,
        /// Declared CRS.
        found: Crs,
    },

    /// A coordinate lies outside the geographic lon/lat domain.
    #[error("Feature '{feature}' has coordinate ({lon}, {lat}) outside WGS84 bounds")]
    CoordinateOutOfRange {
        /// Feature label.
        feature: String,
        /// Longitude.
        lon: f64,
        /// Latitude.
        lat: f64,
    },

    /// A ring's first and last positions differ.
    #[error("Feature '{feature}' has an open ring")]
    OpenRing {
        /// Feature label.
        feature: String,
    },

    /// A ring has fewer than four positions.
    #[error("Feature '{feature}' has a ring with {positions} positions (minimum 4)")]
    ShortRing {
        /// Feature label.
        feature: String,
        /// Number of positions found.
        positions: usize,
    },

    /// The geometry is not a `Polygon` or `MultiPolygon`.
    #[error("Feature '{feature}' has unsupported geometry type {kind}")]
    UnsupportedGeometry {
        /// Feature label.
        feature: String,
        /// `GeoJSON` geometry type found.
        kind: String,
    },

    /// The polygon is self-intersecting or otherwise topologically invalid.
    #[error("Feature '{feature}' has an invalid polygon")]
    InvalidPolygon {
        /// Feature label.
        feature: String,
    },

    /// Two features share the same (county, state) identity.
    #[error("Duplicate county {key}")]
    DuplicateCounty {
        /// The repeated identity.
        key: CountyKey,
    },
}

/// Any failure while building a [`BoundaryStore`].
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The source could not be read or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A geometry failed validation.
    #[error(transparent)]
    Validation(#[from] GeometryValidationError),
}

impl From<std::io::Error> for BoundaryError {
    fn from(value: std::io::Error) -> Self {
        Self::Load(value.into())
    }
}

impl From<serde_json::Error> for BoundaryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Load(value.into())
    }
}

/// Where boundary `GeoJSON` comes from.
///
/// Remote sources are fetched ahead of time with [`fetch::fetch_geojson`]
/// and passed in as [`BoundarySource::Text`], keeping loading synchronous.
#[derive(Debug, Clone)]
pub enum BoundarySource {
    /// A `GeoJSON` file on disk.
    File(PathBuf),
    /// `GeoJSON` text already in memory.
    Text(String),
}

/// Caller opt-ins for repairing input that would otherwise be rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Accept EPSG:3857 input and reproject it to WGS84.
    pub reproject_web_mercator: bool,
    /// Close rings whose last position differs from the first.
    pub close_open_rings: bool,
}

/// A county entry in the point-lookup R-tree.
struct IndexedCounty {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedCounty {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable, validated county boundaries in WGS84.
///
/// Every geometry held here has passed validation, shares one CRS, and has
/// a unique (county, state) identity. Counties are ordered by state, then
/// county name.
pub struct BoundaryStore {
    counties: Vec<CountyGeometry>,
    by_key: BTreeMap<CountyKey, usize>,
    tree: RTree<IndexedCounty>,
}

impl std::fmt::Debug for BoundaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryStore")
            .field("counties", &self.counties.len())
            .finish_non_exhaustive()
    }
}

impl BoundaryStore {
    /// Loads and validates county boundaries from `source`.
    ///
    /// # Errors
    ///
    /// * [`BoundaryError::Load`] if the source is unreadable or malformed.
    /// * [`BoundaryError::Validation`] if any geometry or CRS is invalid.
    pub fn load(source: &BoundarySource, options: &LoadOptions) -> Result<Self, BoundaryError> {
        let text = match source {
            BoundarySource::File(path) => {
                log::info!("Loading county boundaries from {}", path.display());
                std::fs::read_to_string(path)?
            }
            BoundarySource::Text(text) => text.clone(),
        };

        let counties = parse::parse_feature_collection(&text, options)?;
        let store = Self::from_counties(counties)?;
        log::info!("Loaded {} county boundaries", store.len());
        Ok(store)
    }

    /// Builds a store from already-validated geometries.
    ///
    /// # Errors
    ///
    /// * [`LoadError::Empty`] if `counties` is empty.
    /// * [`GeometryValidationError::DuplicateCounty`] if two entries share
    ///   an identity.
    pub fn from_counties(mut counties: Vec<CountyGeometry>) -> Result<Self, BoundaryError> {
        if counties.is_empty() {
            return Err(LoadError::Empty.into());
        }

        counties.sort_by(|a, b| a.state.cmp(&b.state).then_with(|| a.name.cmp(&b.name)));

        let mut by_key = BTreeMap::new();
        for (position, county) in counties.iter().enumerate() {
            if by_key.insert(county.key(), position).is_some() {
                return Err(GeometryValidationError::DuplicateCounty { key: county.key() }.into());
            }
        }

        let entries = counties
            .iter()
            .enumerate()
            .map(|(position, county)| IndexedCounty {
                position,
                envelope: envelope(&county.boundary),
            })
            .collect();

        Ok(Self {
            counties,
            by_key,
            tree: RTree::bulk_load(entries),
        })
    }

    /// All counties, ordered by state then name.
    #[must_use]
    pub fn counties(&self) -> &[CountyGeometry] {
        &self.counties
    }

    /// Number of counties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counties.len()
    }

    /// Always `false`; an empty store cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    /// The CRS shared by every stored geometry.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        Crs::Wgs84
    }

    /// Looks up a county by name and state.
    #[must_use]
    pub fn get(&self, county: &str, state: &str) -> Option<&CountyGeometry> {
        self.by_key
            .get(&CountyKey::new(county, state))
            .map(|&position| &self.counties[position])
    }

    /// Sorted distinct state names.
    #[must_use]
    pub fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self.counties.iter().map(|c| c.state.as_str()).collect();
        states.dedup();
        states
    }

    /// Sorted county names within `state`.
    #[must_use]
    pub fn counties_in_state(&self, state: &str) -> Vec<&str> {
        self.counties
            .iter()
            .filter(|c| c.state == state)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Finds the county containing a lon/lat point.
    ///
    /// Counties tile the US without overlap, so the first match wins.
    #[must_use]
    pub fn locate(&self, lon: f64, lat: f64) -> Option<&CountyGeometry> {
        let point = geo::Point::new(lon, lat);
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([lon, lat]))
            .map(|entry| &self.counties[entry.position])
            .find(|county| county.boundary.contains(&point))
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
