use crate::geo::Coordinate;
use crate::place::{FIELD_MASK, SearchNearbyRequest, SearchNearbyResponse};
use crate::restaurant::{self, Restaurant};
use chrono::Datelike;
use derive_more::{AsRef, Deref, From, Into};
use std::fmt;
use thiserror::Error;

pub const GOOGLE_PLACES_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";
pub const API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";
pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";
pub const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

#[derive(Clone, PartialEq, Eq, Deref, From, Into, AsRef)]
pub struct ApiKey(String);

crate::impl_string_newtype!(ApiKey);

impl ApiKey {
    /// Reads the key from `GOOGLE_PLACES_API_KEY`; blank values count as unset.
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Self)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Places API error: {status}")]
    Status { status: u16, body: String },
    #[error("Network error: failed to reach the places service")]
    Transport(#[source] reqwest::Error),
    #[error("Malformed places response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct PlacesClient {
    endpoint: String,
    api_key: Option<ApiKey>,
    http: reqwest::Client,
}

impl PlacesClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self::with_http(endpoint, api_key, reqwest::Client::new())
    }

    pub fn with_http(
        endpoint: impl Into<String>,
        api_key: Option<ApiKey>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            http,
        }
    }

    /// One POST to the search endpoint, no retries. The normalizer only runs on a 2xx.
    pub async fn search_nearby(
        &self,
        origin: Coordinate,
        radius_miles: f64,
    ) -> Result<Vec<Restaurant>, PlacesError> {
        let body = SearchNearbyRequest::restaurants(origin, radius_miles);
        log::debug!(
            "Searching {} within {} mi of {:?}",
            self.endpoint,
            radius_miles,
            origin
        );

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        let response = request.send().await.map_err(PlacesError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Places search failed with {}: {}", status, body);
            return Err(PlacesError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(PlacesError::Transport)?;
        let parsed: SearchNearbyResponse = serde_json::from_slice(&bytes)?;
        let today = chrono::Local::now().weekday();

        Ok(restaurant::normalize(parsed.places, origin, today))
    }
}
