//! Remote boundary fetcher.
//!
//! Downloads a `GeoJSON` `FeatureCollection` from a URL so it can be handed
//! to [`crate::BoundaryStore::load`] as [`crate::BoundarySource::Text`].

use crate::LoadError;

/// Browser-like User-Agent; some boundary hosts reject the reqwest default.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; CountyAtlas/1.0)";

/// Builds a `reqwest::Client` configured for boundary downloads.
///
/// # Errors
///
/// Returns [`LoadError`] if the client cannot be built.
pub fn build_client() -> Result<reqwest::Client, LoadError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(Into::into)
}

/// Fetches the raw `GeoJSON` text at `url`.
///
/// The body is not parsed here; validation happens in the loader so that
/// remote and local sources go through the same checks.
///
/// # Errors
///
/// Returns [`LoadError`] if the request fails or the response status is
/// not a success.
pub async fn fetch_geojson(client: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    log::info!("Fetching county boundaries from {url}");
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    let body = resp.text().await?;
    log::info!("Fetched {} bytes of boundary data", body.len());
    Ok(body)
}
