//! Forward geocoding through the OpenCage REST API.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::geo::Coordinates;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("OPENCAGE_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeocodingClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Geocodes a postal address. `Ok(None)` when the provider has no match.
    pub async fn forward(&self, address: &str) -> Result<Option<Coordinates>, GeocodingError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GeocodingError::MissingApiKey)?;

        let response = self
            .client
            .get(format!("{}/geocode/v1/json", self.base_url))
            .query(&[("q", address), ("key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: GeocodeResponse = response.json().await?;
        debug!("Geocoder returned {} result(s) for {address:?}", body.results.len());

        Ok(body
            .results
            .first()
            .map(|r| Coordinates::new(r.geometry.lat, r.geometry.lng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeocodingClient {
        GeocodingClient::new(Client::new(), Some("geo-key".to_string()), &server.uri())
    }

    #[tokio::test]
    async fn test_first_result_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/v1/json"))
            .and(query_param("q", "410 Terry Ave N, Seattle, WA"))
            .and(query_param("key", "geo-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "geometry": { "lat": 47.6223, "lng": -122.3366 } },
                    { "geometry": { "lat": 0.0, "lng": 0.0 } }
                ]
            })))
            .mount(&server)
            .await;

        let coords = client(&server)
            .forward("410 Terry Ave N, Seattle, WA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(coords, Coordinates::new(47.6223, -122.3366));
    }

    #[tokio::test]
    async fn test_zero_results_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        assert!(client(&server).forward("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(402).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        match client(&server).forward("anywhere").await {
            Err(GeocodingError::Api { status, .. }) => assert_eq!(status, 402),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_key() {
        let geocoder = GeocodingClient::new(Client::new(), None, "http://127.0.0.1:9");
        assert!(!geocoder.is_configured());
        assert!(matches!(
            geocoder.forward("anywhere").await,
            Err(GeocodingError::MissingApiKey)
        ));
    }
}
