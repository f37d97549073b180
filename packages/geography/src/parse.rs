//! `GeoJSON` `FeatureCollection` parsing and validation.
//!
//! Works on the raw `serde_json::Value` first so that problems the typed
//! `GeoJSON` reader would paper over (unclosed rings, a legacy `crs`
//! member, projected coordinates) are caught and reported. Only after a
//! feature passes those checks is it converted to a [`MultiPolygon`] and
//! run through [`geo::Validation`].

use std::str::FromStr as _;

use county_atlas_geography_models::{CountyGeometry, CountyType, Crs, fips};
use geo::{MultiPolygon, Validation as _};

use crate::{BoundaryError, GeometryValidationError, LoadError, LoadOptions};

/// Spherical Web Mercator earth radius in meters.
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Parses and validates every feature of a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// * [`LoadError`] if the document is not a usable `FeatureCollection` or a
///   feature lacks identifying attributes.
/// * [`GeometryValidationError`] if any feature's CRS or geometry is invalid
///   and `options` does not opt into the required repair.
pub fn parse_feature_collection(
    text: &str,
    options: &LoadOptions,
) -> Result<Vec<CountyGeometry>, BoundaryError> {
    let json: serde_json::Value = serde_json::from_str(text)?;

    let kind = json
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("nothing");
    if kind != "FeatureCollection" {
        return Err(LoadError::NotFeatureCollection {
            found: kind.to_string(),
        }
        .into());
    }

    let features = json
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| LoadError::NotFeatureCollection {
            found: "FeatureCollection without features".to_string(),
        })?;

    if features.is_empty() {
        return Err(LoadError::Empty.into());
    }

    let collection_crs = declared_crs(&json).unwrap_or(Crs::Wgs84);
    check_crs(&collection_crs, "collection", options)?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature, &collection_crs, options))
        .collect()
}

fn parse_feature(
    index: usize,
    feature: &serde_json::Value,
    collection_crs: &Crs,
    options: &LoadOptions,
) -> Result<CountyGeometry, BoundaryError> {
    let empty = serde_json::Map::new();
    let props = feature
        .get("properties")
        .and_then(serde_json::Value::as_object)
        .unwrap_or(&empty);

    let name = string_prop(props, &["NAME", "name"]).ok_or(LoadError::MissingAttribute {
        index,
        attribute: "name",
    })?;
    let state = resolve_state(index, props)?;
    let county_type = resolve_county_type(props);
    let geoid = resolve_geoid(props);
    let label = format!("{name}, {state}");

    let crs = declared_crs(feature).unwrap_or_else(|| collection_crs.clone());
    check_crs(&crs, &label, options)?;

    let mut geometry = match feature.get("geometry") {
        Some(g) if !g.is_null() => g.clone(),
        _ => return Err(LoadError::MissingGeometry { index }.into()),
    };

    let kind = geometry
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();
    let multi = match kind.as_str() {
        "Polygon" => false,
        "MultiPolygon" => true,
        _ => {
            return Err(GeometryValidationError::UnsupportedGeometry {
                feature: label,
                kind,
            }
            .into());
        }
    };

    let coordinates = geometry
        .get_mut("coordinates")
        .ok_or_else(|| LoadError::MalformedPosition {
            feature: label.clone(),
        })?;
    let reproject = crs == Crs::WebMercator;
    for_each_ring(coordinates, multi, &label, |ring| {
        check_ring(ring, &label, reproject, options)
    })?;

    let boundary = to_multipolygon(geometry, &label)?;
    if !boundary.is_valid() {
        return Err(GeometryValidationError::InvalidPolygon { feature: label }.into());
    }

    Ok(CountyGeometry {
        name,
        state,
        county_type,
        geoid,
        boundary,
    })
}

/// Reads a legacy `crs` member (`{"type":"name","properties":{"name":...}}`).
///
/// Any other non-null `crs` form (`EPSG` codes, `link` references) is
/// reported verbatim as [`Crs::Other`].
fn declared_crs(value: &serde_json::Value) -> Option<Crs> {
    let crs = value.get("crs").filter(|crs| !crs.is_null())?;
    Some(
        crs.get("properties")
            .and_then(|props| props.get("name"))
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| Crs::Other(crs.to_string()), Crs::from_name),
    )
}

fn check_crs(crs: &Crs, feature: &str, options: &LoadOptions) -> Result<(), GeometryValidationError> {
    match crs {
        Crs::Wgs84 => Ok(()),
        Crs::WebMercator if options.reproject_web_mercator => Ok(()),
        other => Err(GeometryValidationError::CrsMismatch {
            feature: feature.to_string(),
            expected: Crs::Wgs84,
            found: other.clone(),
        }),
    }
}

fn string_prop(props: &serde_json::Map<String, serde_json::Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| props.get(*key))
        .filter_map(serde_json::Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Resolves a full state name from a name, abbreviation, or FIPS code.
fn resolve_state(
    index: usize,
    props: &serde_json::Map<String, serde_json::Value>,
) -> Result<String, LoadError> {
    let value = string_prop(props, &["STATE_NAME", "state_name", "state", "STATE"]).ok_or(
        LoadError::MissingAttribute {
            index,
            attribute: "state",
        },
    )?;

    if fips::name_to_fips(&value).is_some() {
        return Ok(value);
    }
    let by_fips = fips::state_name(&value);
    if by_fips != "Unknown" {
        return Ok(by_fips.to_string());
    }
    if let Some(code) = fips::abbr_to_fips(&value) {
        return Ok(fips::state_name(code).to_string());
    }

    Err(LoadError::UnknownState { index, value })
}

fn resolve_county_type(props: &serde_json::Map<String, serde_json::Value>) -> CountyType {
    if let Some(raw) = string_prop(props, &["county_type"]) {
        if let Ok(ty) = CountyType::from_str(&raw) {
            return ty;
        }
        if let Some(ty) = CountyType::from_lsad(&raw) {
            return ty;
        }
        log::warn!("Unrecognized county_type '{raw}', defaulting to county");
        return CountyType::County;
    }

    string_prop(props, &["LSAD", "lsad"])
        .and_then(|lsad| CountyType::from_lsad(&lsad))
        .unwrap_or_default()
}

/// Returns the 5-digit county GEOID, stripping the `0500000US` summary
/// level prefix used by the Census cartographic files.
fn resolve_geoid(props: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    let raw = string_prop(props, &["geoid", "GEOID", "GEO_ID"])?;
    Some(
        raw.rsplit_once("US")
            .map_or(raw.as_str(), |(_, code)| code)
            .to_string(),
    )
}

/// Calls `f` on every linear ring of a `Polygon` or `MultiPolygon`
/// coordinate array.
fn for_each_ring(
    coordinates: &mut serde_json::Value,
    multi: bool,
    label: &str,
    mut f: impl FnMut(&mut Vec<serde_json::Value>) -> Result<(), BoundaryError>,
) -> Result<(), BoundaryError> {
    let malformed = || LoadError::MalformedPosition {
        feature: label.to_string(),
    };

    let polygons: Vec<&mut serde_json::Value> = if multi {
        coordinates
            .as_array_mut()
            .ok_or_else(malformed)?
            .iter_mut()
            .collect()
    } else {
        vec![coordinates]
    };

    if polygons.is_empty() {
        return Err(GeometryValidationError::ShortRing {
            feature: label.to_string(),
            positions: 0,
        }
        .into());
    }

    for polygon in polygons {
        let rings = polygon.as_array_mut().ok_or_else(malformed)?;
        if rings.is_empty() {
            return Err(GeometryValidationError::ShortRing {
                feature: label.to_string(),
                positions: 0,
            }
            .into());
        }
        for ring in rings {
            f(ring.as_array_mut().ok_or_else(malformed)?)?;
        }
    }

    Ok(())
}

/// Validates (and, when opted in, repairs) a single ring in place.
fn check_ring(
    ring: &mut Vec<serde_json::Value>,
    label: &str,
    reproject: bool,
    options: &LoadOptions,
) -> Result<(), BoundaryError> {
    let mut points = Vec::with_capacity(ring.len() + 1);
    for position in ring.iter() {
        let (x, y) = position_xy(position).ok_or_else(|| LoadError::MalformedPosition {
            feature: label.to_string(),
        })?;
        let (lon, lat) = if reproject {
            web_mercator_to_wgs84(x, y)
        } else {
            (x, y)
        };
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryValidationError::CoordinateOutOfRange {
                feature: label.to_string(),
                lon,
                lat,
            }
            .into());
        }
        points.push((lon, lat));
    }

    let is_open = match (points.first(), points.last()) {
        (Some(first), Some(last)) => first != last,
        _ => false,
    };
    if is_open {
        if !options.close_open_rings {
            return Err(GeometryValidationError::OpenRing {
                feature: label.to_string(),
            }
            .into());
        }
        points.push(points[0]);
    }

    if points.len() < 4 {
        return Err(GeometryValidationError::ShortRing {
            feature: label.to_string(),
            positions: points.len(),
        }
        .into());
    }

    if reproject || is_open {
        *ring = points
            .into_iter()
            .map(|(lon, lat)| serde_json::json!([lon, lat]))
            .collect();
    }

    Ok(())
}

fn position_xy(position: &serde_json::Value) -> Option<(f64, f64)> {
    let coords = position.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    let x = coords[0].as_f64()?;
    let y = coords[1].as_f64()?;
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

/// Inverse spherical Mercator projection (EPSG:3857 meters to degrees).
fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    (lon, lat)
}

fn to_multipolygon(
    geometry: serde_json::Value,
    label: &str,
) -> Result<MultiPolygon<f64>, BoundaryError> {
    let geometry: geojson::Geometry = serde_json::from_value(geometry)?;
    let converted: geo::Geometry<f64> = geometry.try_into().map_err(LoadError::from)?;

    match converted {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err(GeometryValidationError::UnsupportedGeometry {
            feature: label.to_string(),
            kind: "non-polygonal".to_string(),
        }
        .into()),
    }
}
