use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::GeocodingConfig;
use crate::database::models::GeoPoint;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("address must not be empty")]
    EmptyAddress,

    /// Provider reported zero results for the address.
    #[error("no results for address")]
    NoResults,

    /// Provider reported anything other than success or zero results:
    /// invalid key, quota, malformed payload. Never treated as success.
    #[error("provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Resolves a free-text address to one coordinate pair.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: GeoPoint,
}

/// Client for the Google geocoding HTTP API. One outbound call per
/// resolve, bounded by the configured timeout; no retries.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Provider(format!(
                "http status {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response.json().await?;
        first_location(body)
    }
}

/// Pick the first result's coordinates out of a provider response.
/// `ZERO_RESULTS` (or an OK status with an empty list) means the address
/// is unknown; every other non-OK status is a provider failure.
fn first_location(response: GeocodeResponse) -> Result<GeoPoint, GeocodeError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(GeocodeError::NoResults),
        other => return Err(GeocodeError::Provider(other.to_string())),
    }

    let location = response
        .results
        .first()
        .map(|r| r.geometry.location)
        .ok_or(GeocodeError::NoResults)?;

    if !location.is_finite() {
        return Err(GeocodeError::Provider("non-finite coordinates".into()));
    }
    Ok(location)
}
