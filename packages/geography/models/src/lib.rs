#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County boundary geometry types.
//!
//! These types describe the county polygons the dashboard draws and joins
//! statistics against. Geometry is always held in WGS84 longitude/latitude;
//! loaders convert or reject anything else before a [`CountyGeometry`] is
//! constructed.

pub mod fips;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coordinate reference system of a boundary source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crs {
    /// WGS84 geographic coordinates (EPSG:4326 / OGC CRS84), lon/lat order.
    Wgs84,
    /// Spherical Web Mercator (EPSG:3857), meters.
    WebMercator,
    /// Any other named CRS, kept verbatim for error reporting.
    Other(String),
}

impl Crs {
    /// Identifiers accepted as WGS84.
    pub const WGS84_NAMES: &[&str] = &[
        "EPSG:4326",
        "urn:ogc:def:crs:OGC:1.3:CRS84",
        "urn:ogc:def:crs:OGC::CRS84",
        "urn:ogc:def:crs:EPSG::4326",
    ];

    /// Identifiers accepted as Web Mercator.
    pub const WEB_MERCATOR_NAMES: &[&str] = &[
        "EPSG:3857",
        "EPSG:900913",
        "urn:ogc:def:crs:EPSG::3857",
    ];

    /// Parses a CRS name as found in a legacy `GeoJSON` `crs` member.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if Self::WGS84_NAMES
            .iter()
            .any(|n| n.eq_ignore_ascii_case(trimmed))
        {
            Self::Wgs84
        } else if Self::WEB_MERCATOR_NAMES
            .iter()
            .any(|n| n.eq_ignore_ascii_case(trimmed))
        {
            Self::WebMercator
        } else {
            Self::Other(trimmed.to_string())
        }
    }

    /// Canonical name used when writing geometry back out.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Wgs84 => "EPSG:4326",
            Self::WebMercator => "EPSG:3857",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Legal/statistical kind of a county-equivalent area.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum CountyType {
    /// Ordinary county.
    #[default]
    County,
    /// Louisiana parish.
    Parish,
    /// Alaska borough.
    Borough,
    /// Independent city (Virginia, Baltimore, St. Louis, Carson City).
    City,
    /// Alaska census area.
    CensusArea,
    /// Alaska municipality or Puerto Rico municipio.
    Municipality,
    /// Consolidated city and borough (Juneau, Sitka, ...).
    CityAndBorough,
}

impl CountyType {
    /// Maps a Census Bureau LSAD description to a county type.
    ///
    /// Accepts both the short codes found in the Census cartographic
    /// boundary files (`"CA"`, `"Muno"`, `"Cty&Bor"`) and full words.
    /// Returns `None` for unrecognized codes.
    #[must_use]
    pub fn from_lsad(lsad: &str) -> Option<Self> {
        match lsad.trim().to_ascii_lowercase().as_str() {
            "county" | "06" => Some(Self::County),
            "parish" | "15" => Some(Self::Parish),
            "borough" | "04" => Some(Self::Borough),
            "city" | "25" => Some(Self::City),
            "ca" | "census area" | "05" => Some(Self::CensusArea),
            "muno" | "municipality" | "municipio" | "12" | "13" => Some(Self::Municipality),
            "cty&bor" | "city and borough" | "03" => Some(Self::CityAndBorough),
            _ => None,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::County,
            Self::Parish,
            Self::Borough,
            Self::City,
            Self::CensusArea,
            Self::Municipality,
            Self::CityAndBorough,
        ]
    }
}

/// Composite identity of a county: (county name, state name).
///
/// County names repeat across states ("Washington County" exists in 30
/// of them), so the state is always part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountyKey {
    /// County name as it appears in the boundary source.
    pub county: String,
    /// Full state name (e.g. "California").
    pub state: String,
}

impl CountyKey {
    /// Creates a key from county and state names.
    #[must_use]
    pub fn new(county: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            state: state.into(),
        }
    }
}

impl std::fmt::Display for CountyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.county, self.state)
    }
}

/// A validated county boundary in WGS84.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyGeometry {
    /// County name (e.g. "Los Angeles").
    pub name: String,
    /// Full state name (e.g. "California").
    pub state: String,
    /// Kind of county-equivalent area.
    pub county_type: CountyType,
    /// Five-digit county GEOID (state FIPS + county FIPS), when known.
    pub geoid: Option<String>,
    /// Boundary polygons, longitude/latitude.
    pub boundary: MultiPolygon<f64>,
}

impl CountyGeometry {
    /// Returns the (county, state) identity of this geometry.
    #[must_use]
    pub fn key(&self) -> CountyKey {
        CountyKey::new(&self.name, &self.state)
    }

    /// Returns `true` if this geometry is identified by `county` in `state`.
    #[must_use]
    pub fn matches(&self, county: &str, state: &str) -> bool {
        self.name == county && self.state == state
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn crs_names_parse() {
        assert_eq!(Crs::from_name("EPSG:4326"), Crs::Wgs84);
        assert_eq!(Crs::from_name("urn:ogc:def:crs:OGC:1.3:CRS84"), Crs::Wgs84);
        assert_eq!(Crs::from_name(" epsg:3857 "), Crs::WebMercator);
        assert_eq!(
            Crs::from_name("EPSG:2163"),
            Crs::Other("EPSG:2163".to_string())
        );
    }

    #[test]
    fn crs_display_uses_canonical_name() {
        assert_eq!(Crs::Wgs84.to_string(), "EPSG:4326");
        assert_eq!(Crs::Other("EPSG:2163".into()).to_string(), "EPSG:2163");
    }

    #[test]
    fn lsad_codes_map_to_types() {
        assert_eq!(CountyType::from_lsad("County"), Some(CountyType::County));
        assert_eq!(CountyType::from_lsad("Parish"), Some(CountyType::Parish));
        assert_eq!(CountyType::from_lsad("CA"), Some(CountyType::CensusArea));
        assert_eq!(CountyType::from_lsad("Muno"), Some(CountyType::Municipality));
        assert_eq!(
            CountyType::from_lsad("Cty&Bor"),
            Some(CountyType::CityAndBorough)
        );
        assert_eq!(CountyType::from_lsad("city"), Some(CountyType::City));
        assert_eq!(CountyType::from_lsad("shire"), None);
    }

    #[test]
    fn county_type_strum_roundtrip() {
        for ty in CountyType::all() {
            assert_eq!(CountyType::from_str(ty.as_ref()).unwrap(), *ty);
        }
        assert_eq!(CountyType::CensusArea.to_string(), "census_area");
    }

    #[test]
    fn county_key_display() {
        let key = CountyKey::new("Orleans", "Louisiana");
        assert_eq!(key.to_string(), "Orleans, Louisiana");
    }
}
