//! Listing Retriever: one provider search turned into annotated, filtered
//! and sorted `ApartmentListing`s.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::geo::{haversine_miles, Coordinates};
use crate::listings::{ListingQuery, ListingSource, ListingsError, RentalListing};
use crate::models::listing::{ApartmentListing, DistanceLabel};
use crate::models::search::SearchParams;
use crate::office::{OfficeLocation, OfficeResolver};
use crate::ranking::compare_by_distance_then_price;

/// Shown when a provider record has no photo.
pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267";

/// Providers carry no rating, so every listing gets the same one.
pub const DEFAULT_RATING: f64 = 4.0;

/// Resolves the office, queries the source, and builds the listing set.
///
/// Missing credentials produce an empty list. Transport and provider
/// status failures are returned so the caller can fall back.
pub async fn retrieve_listings(
    resolver: &OfficeResolver,
    source: &dyn ListingSource,
    params: &SearchParams,
) -> Result<Vec<ApartmentListing>, ListingsError> {
    if !source.is_configured() {
        warn!("{} API key not configured; returning no listings", source.tag());
        return Ok(Vec::new());
    }

    let office = resolver.resolve(&params.company, &params.location).await;
    if office.is_none() {
        warn!("Office location unknown; distances will not be annotated");
    }

    let query = ListingQuery::from_params(params);
    let records = match source.search(&query).await {
        Ok(records) => records,
        Err(ListingsError::MissingApiKey) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let listings = build_listings(source.tag(), records, office.as_ref(), params);
    info!("Retrieved {} listing(s) from {}", listings.len(), source.tag());
    Ok(listings)
}

/// Price filter, distance annotation, over-distance filter, then sort.
pub fn build_listings(
    tag: &str,
    records: Vec<RentalListing>,
    office: Option<&OfficeLocation>,
    params: &SearchParams,
) -> Vec<ApartmentListing> {
    let mut seen = HashSet::new();

    let mut listings: Vec<ApartmentListing> = records
        .into_iter()
        .filter(|r| r.price <= params.max_price)
        .map(|r| to_apartment(tag, r, office, params.max_distance))
        .filter(|l| {
            let fresh = seen.insert(l.id.clone());
            if !fresh {
                debug!("Dropping duplicate listing {}", l.id);
            }
            fresh
        })
        .collect();

    if office.is_some() {
        listings.retain(|l| !l.distance.exceeds_range());
    }

    listings.sort_by(compare_by_distance_then_price);
    listings
}

fn to_apartment(
    tag: &str,
    record: RentalListing,
    office: Option<&OfficeLocation>,
    max_distance: f64,
) -> ApartmentListing {
    let distance = match (office, record.latitude, record.longitude) {
        (Some(office), Some(lat), Some(lon)) => {
            let miles = haversine_miles(office.coordinates(), Coordinates::new(lat, lon));
            DistanceLabel::classify(miles, max_distance, &office.address)
        }
        _ => DistanceLabel::Unknown,
    };

    ApartmentListing {
        id: format!("{tag}-{}", record.native_id),
        title: listing_title(record.bedrooms, record.property_type.as_deref()),
        price: record.price,
        location: record.address,
        distance,
        rating: DEFAULT_RATING,
        image: record
            .photo_url
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        amenities: record.amenities,
        url: record.url,
    }
}

fn listing_title(bedrooms: Option<u32>, property_type: Option<&str>) -> String {
    let property_type = property_type.unwrap_or("Apartment");
    match bedrooms {
        Some(0) => format!("Studio {property_type}"),
        Some(n) => format!("{n} Bedroom {property_type}"),
        None => property_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::GeocodingClient;
    use crate::llm_client::LlmClient;
    use async_trait::async_trait;
    use reqwest::Client;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hq2() -> OfficeLocation {
        OfficeLocation {
            address: "2100 Crystal Drive, Arlington, VA 22202".to_string(),
            latitude: 38.8518,
            longitude: -77.0487,
        }
    }

    fn params(max_price: f64, max_distance: f64) -> SearchParams {
        SearchParams {
            company: "Amazon".to_string(),
            location: "Arlington, VA".to_string(),
            max_price,
            max_distance,
            room_type: "1 Bedroom".to_string(),
            ..Default::default()
        }
    }

    fn record(id: &str, price: f64, coords: Option<(f64, f64)>) -> RentalListing {
        RentalListing {
            native_id: id.to_string(),
            price,
            address: format!("{id} Test St, Arlington, VA"),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            bedrooms: Some(1),
            property_type: Some("Apartment".to_string()),
            ..Default::default()
        }
    }

    // Roughly 0.6, 2.0 and 12 miles from HQ2.
    const NEAR: (f64, f64) = (38.8600, -77.0500);
    const MID: (f64, f64) = (38.8800, -77.0300);
    const FAR: (f64, f64) = (38.9900, -77.1900);

    #[test]
    fn test_every_listing_respects_max_price() {
        let records = vec![
            record("a", 1500.0, None),
            record("b", 2500.0, None),
            record("c", 2000.0, None),
            record("d", 2000.01, None),
        ];
        let listings = build_listings("rentcast", records, None, &params(2000.0, 5.0));
        assert_eq!(listings.len(), 2);
        assert!(listings.iter().all(|l| l.price <= 2000.0));
    }

    #[test]
    fn test_ids_are_prefixed_and_unique() {
        let records = vec![
            record("a", 1000.0, None),
            record("a", 1100.0, None),
            record("b", 1200.0, None),
        ];
        let listings = build_listings("rentcast", records, None, &params(5000.0, 5.0));
        let ids: Vec<_> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["rentcast-a", "rentcast-b"]);
        assert_eq!(listings[0].price, 1000.0);
    }

    #[test]
    fn test_without_office_distance_is_unknown_and_sorted_by_price() {
        let records = vec![
            record("a", 1900.0, Some(NEAR)),
            record("b", 1200.0, Some(FAR)),
        ];
        let listings = build_listings("rentcast", records, None, &params(5000.0, 5.0));
        assert!(listings.iter().all(|l| l.distance == DistanceLabel::Unknown));
        assert_eq!(listings[0].id, "rentcast-b");
    }

    #[test]
    fn test_over_distance_listings_are_dropped_with_office() {
        let office = hq2();
        let records = vec![
            record("far", 1000.0, Some(FAR)),
            record("mid", 1500.0, Some(MID)),
            record("near", 1800.0, Some(NEAR)),
            record("nocoords", 900.0, None),
        ];
        let listings = build_listings("rentcast", records, Some(&office), &params(5000.0, 5.0));

        let ids: Vec<_> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["rentcast-near", "rentcast-mid", "rentcast-nocoords"]);
        assert!(listings[0]
            .distance
            .to_string()
            .ends_with("miles from 2100 Crystal Drive, Arlington, VA 22202"));
        assert!(listings.iter().all(|l| !l.distance.exceeds_range()));
    }

    #[test]
    fn test_listing_defaults() {
        let listings = build_listings(
            "rentcast",
            vec![record("a", 1000.0, None)],
            None,
            &params(5000.0, 5.0),
        );
        assert_eq!(listings[0].rating, DEFAULT_RATING);
        assert_eq!(listings[0].image, PLACEHOLDER_IMAGE);
        assert_eq!(listings[0].title, "1 Bedroom Apartment");
    }

    #[test]
    fn test_titles() {
        assert_eq!(listing_title(Some(0), Some("Condo")), "Studio Condo");
        assert_eq!(listing_title(Some(2), None), "2 Bedroom Apartment");
        assert_eq!(listing_title(None, None), "Apartment");
    }

    struct CountingSource {
        configured: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ListingSource for CountingSource {
        fn tag(&self) -> &'static str {
            "test"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn search(&self, _query: &ListingQuery) -> Result<Vec<RentalListing>, ListingsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![record("x", 100.0, Some(NEAR))])
        }
    }

    fn offline_resolver() -> OfficeResolver {
        OfficeResolver::new(
            LlmClient::new(Client::new(), None, "http://127.0.0.1:9"),
            GeocodingClient::new(Client::new(), None, "http://127.0.0.1:9"),
        )
    }

    #[tokio::test]
    async fn test_unconfigured_source_is_empty_without_search() {
        let source = CountingSource {
            configured: false,
            calls: AtomicUsize::new(0),
        };
        let listings = retrieve_listings(&offline_resolver(), &source, &params(5000.0, 5.0))
            .await
            .unwrap();
        assert!(listings.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_known_office_annotates_distances() {
        let source = CountingSource {
            configured: true,
            calls: AtomicUsize::new(0),
        };
        let listings = retrieve_listings(&offline_resolver(), &source, &params(5000.0, 5.0))
            .await
            .unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "test-x");
        assert!(listings[0].distance.miles().unwrap() < 1.0);
    }
}
