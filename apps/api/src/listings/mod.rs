//! Listing retrieval: provider clients and the retriever that turns their
//! records into ranked `ApartmentListing`s.
//!
//! Providers sit behind the `ListingSource` trait so the retriever and the
//! ranking pipeline never see a provider's wire format.

pub mod rentcast;
pub mod retriever;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use thiserror::Error;
use tracing::warn;

use crate::models::search::SearchParams;

/// Upper bound on records requested from a provider per search.
pub const SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum ListingsError {
    #[error("listings provider API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Provider-neutral search criteria derived from `SearchParams`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub city: Option<String>,
    pub region: Option<String>,
    pub max_price: f64,
    pub bedrooms: u32,
    pub available_by: Option<NaiveDate>,
    pub limit: u32,
}

impl ListingQuery {
    pub fn from_params(params: &SearchParams) -> Self {
        let (city, region) = params.city_and_region();
        Self {
            city: city.map(str::to_string),
            region: region.map(str::to_string),
            max_price: params.max_price,
            bedrooms: params.bedroom_count(),
            available_by: parse_start_date(&params.start_date),
            limit: SEARCH_LIMIT,
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));
    if parsed.is_none() {
        warn!("Ignoring unparseable start date {raw:?}");
    }
    parsed
}

/// One provider record after tolerant decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalListing {
    /// Provider-native identifier, not yet prefixed with the source tag.
    pub native_id: String,
    pub price: f64,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: Option<u32>,
    pub property_type: Option<String>,
    pub photo_url: Option<String>,
    pub amenities: Vec<String>,
    pub url: String,
}

/// A rental listings provider.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Short tag prefixed to every identifier from this source.
    fn tag(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    /// Malformed or empty provider bodies are `Ok(vec![])`; transport and
    /// status failures are errors.
    async fn search(&self, query: &ListingQuery) -> Result<Vec<RentalListing>, ListingsError>;
}
