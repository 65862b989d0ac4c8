//! RentCast long-term rental listings.
//!
//! RentCast records vary in shape between listings (ids as strings or
//! numbers, price under `price`/`rent`/`listPrice`, optional feature maps),
//! so every field is decoded optionally and mapped with fallbacks.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::listings::{ListingQuery, ListingSource, ListingsError, RentalListing};

const LISTING_APP_URL: &str = "https://app.rentcast.io/app";

/// Feature flag → amenity name shown to the user, in display order.
const FEATURE_AMENITIES: &[(&str, &str)] = &[
    ("cooling", "Air Conditioning"),
    ("pool", "Pool"),
    ("garage", "Garage"),
    ("fireplace", "Fireplace"),
    ("heating", "Heating"),
    ("laundry", "Washer/Dryer"),
    ("furnished", "Furnished"),
];

#[derive(Clone)]
pub struct RentCastClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl RentCastClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn query_pairs(query: &ListingQuery) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = &query.city {
            pairs.push(("city", city.clone()));
        }
        if let Some(region) = &query.region {
            pairs.push(("state", region.clone()));
        }
        pairs.push(("maxRent", query.max_price.to_string()));
        pairs.push(("bedrooms", query.bedrooms.to_string()));
        pairs.push(("limit", query.limit.to_string()));
        pairs.push(("propertyType", "Apartment".to_string()));
        pairs.push(("status", "Active".to_string()));
        if let Some(date) = query.available_by {
            pairs.push(("availableBy", date.format("%Y-%m-%d").to_string()));
        }
        pairs.push(("sortBy", "available_date".to_string()));
        pairs
    }
}

#[async_trait]
impl ListingSource for RentCastClient {
    fn tag(&self) -> &'static str {
        "rentcast"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &ListingQuery) -> Result<Vec<RentalListing>, ListingsError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ListingsError::MissingApiKey)?;

        let pairs = Self::query_pairs(query);
        debug!("Querying RentCast with {pairs:?}");

        let response = self
            .client
            .get(format!("{}/listings/rental/long-term", self.base_url))
            .query(&pairs)
            .header("X-Api-Key", api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingsError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => {
                warn!("RentCast returned a body that is not JSON ({e}); treating as zero listings");
                return Ok(Vec::new());
            }
        };
        let Value::Array(records) = body else {
            warn!("RentCast returned a non-array body; treating as zero listings");
            return Ok(Vec::new());
        };

        let total = records.len();
        let listings: Vec<RentalListing> = records.into_iter().filter_map(decode_record).collect();
        info!("RentCast returned {total} record(s), {} usable", listings.len());

        Ok(listings)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RentCastRecord {
    id: Option<Value>,
    property_id: Option<Value>,
    formatted_address: Option<String>,
    address_line1: Option<String>,
    city: Option<String>,
    state: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    price: Option<f64>,
    rent: Option<f64>,
    list_price: Option<f64>,
    bedrooms: Option<f64>,
    property_type: Option<String>,
    photo_urls: Option<Vec<Value>>,
    photos: Option<Vec<Value>>,
    features: Option<Map<String, Value>>,
}

fn decode_record(raw: Value) -> Option<RentalListing> {
    let record: RentCastRecord = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            debug!("Skipping undecodable RentCast record: {e}");
            return None;
        }
    };

    let native_id = [&record.id, &record.property_id]
        .into_iter()
        .flatten()
        .find_map(id_text)
        .or_else(|| record.formatted_address.clone().filter(|a| !a.is_empty()));
    let Some(native_id) = native_id else {
        debug!("Skipping RentCast record without any identifier");
        return None;
    };

    let Some(price) = record.price.or(record.rent).or(record.list_price) else {
        debug!("Skipping RentCast record {native_id} without a price");
        return None;
    };

    let address = record
        .formatted_address
        .clone()
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| {
            [&record.address_line1, &record.city, &record.state]
                .map(|part| part.as_deref().unwrap_or(""))
                .join(", ")
        });

    let photo_url = [&record.photo_urls, &record.photos]
        .into_iter()
        .flatten()
        .find_map(|photos| photos.first().and_then(Value::as_str).map(str::to_string));

    Some(RentalListing {
        url: listing_url(record.formatted_address.as_deref().unwrap_or(&address)),
        native_id,
        price,
        address,
        latitude: record.latitude,
        longitude: record.longitude,
        bedrooms: record
            .bedrooms
            .filter(|b| b.is_finite() && *b >= 0.0)
            .map(|b| b as u32),
        property_type: record.property_type.filter(|t| !t.is_empty()),
        photo_url,
        amenities: features_to_amenities(record.features.as_ref()),
    })
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Truthiness of a loosely typed provider flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn features_to_amenities(features: Option<&Map<String, Value>>) -> Vec<String> {
    let Some(features) = features else {
        return Vec::new();
    };
    FEATURE_AMENITIES
        .iter()
        .filter(|(flag, _)| features.get(*flag).is_some_and(is_truthy))
        .map(|(_, amenity)| amenity.to_string())
        .collect()
}

fn listing_url(address: &str) -> String {
    Url::parse_with_params(
        LISTING_APP_URL,
        &[("address", address), ("type", "single-family")],
    )
    .map(String::from)
    .unwrap_or_else(|_| LISTING_APP_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query() -> ListingQuery {
        ListingQuery {
            city: Some("Arlington".to_string()),
            region: Some("VA".to_string()),
            max_price: 2500.0,
            bedrooms: 1,
            available_by: chrono::NaiveDate::from_ymd_opt(2025, 6, 1),
            limit: 50,
        }
    }

    #[test]
    fn test_features_map_to_amenities_in_order() {
        let features = json!({
            "laundry": "In Unit",
            "cooling": true,
            "pool": false,
            "garage": 2,
            "fireplace": null,
            "unknownFlag": true
        });
        let amenities = features_to_amenities(features.as_object());
        assert_eq!(amenities, vec!["Air Conditioning", "Garage", "Washer/Dryer"]);
    }

    #[test]
    fn test_missing_features_is_empty() {
        assert!(features_to_amenities(None).is_empty());
    }

    #[test]
    fn test_decode_full_record() {
        let listing = decode_record(json!({
            "id": "1600-Crystal-Dr,-Arlington,-VA-22202",
            "formattedAddress": "1600 Crystal Dr, Arlington, VA 22202",
            "latitude": 38.859,
            "longitude": -77.05,
            "price": 2300,
            "bedrooms": 1,
            "propertyType": "Apartment",
            "photoUrls": ["https://img.example/1.jpg"],
            "features": { "cooling": true }
        }))
        .unwrap();

        assert_eq!(listing.native_id, "1600-Crystal-Dr,-Arlington,-VA-22202");
        assert_eq!(listing.price, 2300.0);
        assert_eq!(listing.bedrooms, Some(1));
        assert_eq!(listing.photo_url.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(listing.amenities, vec!["Air Conditioning"]);
        assert!(listing
            .url
            .starts_with("https://app.rentcast.io/app?address=1600+Crystal+Dr"));
        assert!(listing.url.ends_with("&type=single-family"));
    }

    #[test]
    fn test_decode_uses_fallback_fields() {
        let listing = decode_record(json!({
            "propertyId": 9912,
            "addressLine1": "12 Elm St",
            "city": "Seattle",
            "state": "WA",
            "rent": 1800,
            "photos": ["https://img.example/p.jpg"]
        }))
        .unwrap();

        assert_eq!(listing.native_id, "9912");
        assert_eq!(listing.price, 1800.0);
        assert_eq!(listing.address, "12 Elm St, Seattle, WA");
        assert_eq!(listing.photo_url.as_deref(), Some("https://img.example/p.jpg"));
        assert!(listing.amenities.is_empty());
    }

    #[test]
    fn test_decode_skips_records_without_id_or_price() {
        assert!(decode_record(json!({ "price": 1000 })).is_none());
        assert!(decode_record(json!({ "id": "a1" })).is_none());
        assert!(decode_record(json!("not an object")).is_none());
    }

    #[tokio::test]
    async fn test_search_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/listings/rental/long-term"))
            .and(header("X-Api-Key", "rc-key"))
            .and(query_param("city", "Arlington"))
            .and(query_param("state", "VA"))
            .and(query_param("maxRent", "2500"))
            .and(query_param("bedrooms", "1"))
            .and(query_param("limit", "50"))
            .and(query_param("status", "Active"))
            .and(query_param("availableBy", "2025-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "a", "price": 2000, "formattedAddress": "1 A St" },
                { "id": "b" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let source = RentCastClient::new(Client::new(), Some("rc-key".to_string()), &server.uri());
        let listings = source.search(&query()).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].native_id, "a");
    }

    #[tokio::test]
    async fn test_non_array_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "no results" })),
            )
            .mount(&server)
            .await;

        let source = RentCastClient::new(Client::new(), Some("rc-key".to_string()), &server.uri());
        assert!(source.search(&query()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/listings/rental/long-term"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>maintenance</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let source = RentCastClient::new(Client::new(), Some("rc-key".to_string()), &server.uri());
        assert!(source.search(&query()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let source = RentCastClient::new(Client::new(), Some("rc-key".to_string()), &server.uri());
        assert!(source.search(&query()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = RentCastClient::new(Client::new(), Some("rc-key".to_string()), &server.uri());
        assert!(matches!(
            source.search(&query()).await,
            Err(ListingsError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let source = RentCastClient::new(Client::new(), None, "http://127.0.0.1:9");
        assert!(!source.is_configured());
        assert!(matches!(
            source.search(&query()).await,
            Err(ListingsError::MissingApiKey)
        ));
    }
}
