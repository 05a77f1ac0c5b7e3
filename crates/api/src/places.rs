//! Client for the external places / mapping API.
//!
//! Two calls: text autocomplete (ranked place candidates for the event
//! composer's location field) and place-id resolution to coordinates.
//! Both go over HTTPS with the API key as a query parameter. Failures are
//! surfaced to the caller; the handler turns them into inline warnings
//! and leaves the selection unresolved.

use serde::{Deserialize, Serialize};

use crate::config::PlacesConfig;

/// Errors from the places client.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// No API key configured; the endpoints are disabled.
    #[error("Places API is not configured")]
    Disabled,

    /// Transport-level failure.
    #[error("Places API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an error status or an unexpected body.
    #[error("Places API returned an error: {0}")]
    Provider(String),
}

/// A ranked autocomplete candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub description: String,
}

/// A resolved place with coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceLocation {
    pub place_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

// --- provider wire format ---

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Thin reqwest wrapper around the places API.
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    config: PlacesConfig,
}

impl PlacesClient {
    /// Create a client from configuration.
    pub fn new(config: PlacesConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn api_key(&self) -> Result<&str, PlacesError> {
        self.config.api_key.as_deref().ok_or(PlacesError::Disabled)
    }

    /// Text autocomplete: ranked place candidates for a partial query.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let key = self.api_key()?;
        let url = format!("{}/autocomplete/json", self.config.base_url);

        let response: AutocompleteResponse = self
            .http
            .get(&url)
            .query(&[("input", query), ("key", key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" && response.status != "ZERO_RESULTS" {
            return Err(PlacesError::Provider(response.status));
        }

        Ok(response
            .predictions
            .into_iter()
            .map(|p| PlaceCandidate {
                place_id: p.place_id,
                description: p.description,
            })
            .collect())
    }

    /// Resolve a place id to coordinates.
    pub async fn resolve(&self, place_id: &str) -> Result<PlaceLocation, PlacesError> {
        let key = self.api_key()?;
        let url = format!("{}/details/json", self.config.base_url);

        let response: DetailsResponse = self
            .http
            .get(&url)
            .query(&[("place_id", place_id), ("fields", "geometry"), ("key", key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = match (response.status.as_str(), response.result) {
            ("OK", Some(result)) => result,
            (status, _) => return Err(PlacesError::Provider(status.to_string())),
        };

        Ok(PlaceLocation {
            place_id: place_id.to_string(),
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
        })
    }
}
