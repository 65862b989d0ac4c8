use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::geocoding::GeocodingClient;
use crate::listings::rentcast::RentCastClient;
use crate::listings::ListingSource;
use crate::llm_client::LlmClient;
use crate::office::OfficeResolver;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: LlmClient,
    pub office_resolver: OfficeResolver,
    /// Pluggable listings provider. Default: RentCast.
    pub listing_source: Arc<dyn ListingSource>,
}

impl AppState {
    /// Wires every provider client from `config`, sharing one HTTP client.
    pub fn new(config: Config, http: Client) -> Self {
        let llm = LlmClient::new(
            http.clone(),
            config.openai_api_key.clone(),
            &config.openai_base_url,
        );
        let geocoder = GeocodingClient::new(
            http.clone(),
            config.opencage_api_key.clone(),
            &config.opencage_base_url,
        );
        let listing_source = Arc::new(RentCastClient::new(
            http,
            config.rentcast_api_key.clone(),
            &config.rentcast_base_url,
        ));

        Self {
            office_resolver: OfficeResolver::new(llm.clone(), geocoder),
            llm,
            listing_source,
            config,
        }
    }
}
