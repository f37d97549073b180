//! `GeoJSON` export of a [`BoundaryStore`].
//!
//! Produces a `FeatureCollection` that [`BoundaryStore::load`] reads back
//! unchanged: the same identities, county types, GEOIDs, and coordinates,
//! with a `crs` member naming EPSG:4326.

use std::io::Write;

use county_atlas_geography_models::CountyGeometry;

use crate::{BoundaryError, BoundaryStore};

impl BoundaryStore {
    /// Serializes every county as a `GeoJSON` `FeatureCollection`.
    #[must_use]
    pub fn to_geojson(&self) -> serde_json::Value {
        let features: Vec<serde_json::Value> = self.counties().iter().map(feature).collect();

        serde_json::json!({
            "type": "FeatureCollection",
            "crs": {
                "type": "name",
                "properties": { "name": self.crs().name() },
            },
            "features": features,
        })
    }

    /// Writes [`Self::to_geojson`] to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if serialization or the write fails.
    pub fn write_geojson<W: Write>(&self, mut writer: W) -> Result<(), BoundaryError> {
        serde_json::to_writer(&mut writer, &self.to_geojson())?;
        writer.flush()?;
        log::info!("Exported {} county boundary features", self.len());
        Ok(())
    }
}

fn feature(county: &CountyGeometry) -> serde_json::Value {
    let geometry = geojson::Geometry::new(geojson::Value::from(&county.boundary));

    serde_json::json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "name": county.name,
            "state": county.state,
            "county_type": county.county_type,
            "geoid": county.geoid,
        },
    })
}

#[cfg(test)]
mod tests {
    use geo::CoordsIter as _;

    use super::*;
    use crate::{BoundarySource, LoadOptions, sample};

    fn assert_equivalent(a: &BoundaryStore, b: &BoundaryStore) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.crs(), b.crs());
        for (left, right) in a.counties().iter().zip(b.counties()) {
            assert_eq!(left.key(), right.key());
            assert_eq!(left.county_type, right.county_type);
            assert_eq!(left.geoid, right.geoid);
            assert_eq!(left.boundary.coords_count(), right.boundary.coords_count());
            for (p, q) in left
                .boundary
                .coords_iter()
                .zip(right.boundary.coords_iter())
            {
                assert!((p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn export_declares_wgs84() {
        let text = sample::sample_feature_collection(3).to_string();
        let store = BoundaryStore::load(&BoundarySource::Text(text), &LoadOptions::default())
            .unwrap();
        let json = store.to_geojson();
        assert_eq!(json["crs"]["properties"]["name"], "EPSG:4326");
        assert_eq!(json["features"].as_array().unwrap().len(), 3);
        assert_eq!(json["features"][0]["geometry"]["type"], "MultiPolygon");
    }

    #[test]
    fn roundtrip_through_file_preserves_geometry() {
        let text = sample::sample_feature_collection(120).to_string();
        let original = BoundaryStore::load(&BoundarySource::Text(text), &LoadOptions::default())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundaries.geojson");
        original
            .write_geojson(std::fs::File::create(&path).unwrap())
            .unwrap();

        let reloaded =
            BoundaryStore::load(&BoundarySource::File(path), &LoadOptions::default()).unwrap();
        assert_equivalent(&original, &reloaded);
    }

    #[test]
    fn reprojected_input_exports_as_wgs84() {
        let json = serde_json::json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "EPSG:3857" } },
            "features": [{
                "type": "Feature",
                "properties": { "name": "Travis", "state": "Texas" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-10_909_310.0, 3_503_549.0],
                        [-10_859_310.0, 3_503_549.0],
                        [-10_859_310.0, 3_553_549.0],
                        [-10_909_310.0, 3_553_549.0],
                        [-10_909_310.0, 3_503_549.0]
                    ]]
                }
            }]
        });
        let options = LoadOptions {
            reproject_web_mercator: true,
            ..LoadOptions::default()
        };
        let store =
            BoundaryStore::load(&BoundarySource::Text(json.to_string()), &options).unwrap();

        let exported = store.to_geojson().to_string();
        let reloaded =
            BoundaryStore::load(&BoundarySource::Text(exported), &LoadOptions::default()).unwrap();
        assert_equivalent(&store, &reloaded);
    }
}
