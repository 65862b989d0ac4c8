//! Ranking Pipeline: the `/api/search` orchestration.
//!
//! Office resolution → listing retrieval → re-rank with recommended ids
//! first. Always yields a list: a failed provider call falls back to a
//! fixed pair of sample listings.

pub mod handlers;

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{error, info};

use crate::listings::retriever::retrieve_listings;
use crate::listings::ListingSource;
use crate::models::listing::{ApartmentListing, DistanceLabel};
use crate::models::search::SearchParams;
use crate::office::OfficeResolver;

/// Listings with a known distance first (nearest first), then the rest;
/// ties and unknown distances are broken by ascending price.
pub fn compare_by_distance_then_price(a: &ApartmentListing, b: &ApartmentListing) -> Ordering {
    match (a.distance.miles(), b.distance.miles()) {
        (Some(x), Some(y)) => x.total_cmp(&y).then(a.price.total_cmp(&b.price)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.price.total_cmp(&b.price),
    }
}

/// Moves recommended listings ahead of the others, keeping distance/price
/// order within each group. The result is a permutation of the input.
pub fn rank_listings(listings: &mut [ApartmentListing], recommended_ids: &[String]) {
    let recommended: HashSet<&str> = recommended_ids.iter().map(String::as_str).collect();

    listings.sort_by(|a, b| {
        let a_rec = recommended.contains(a.id.as_str());
        let b_rec = recommended.contains(b.id.as_str());
        b_rec
            .cmp(&a_rec)
            .then_with(|| compare_by_distance_then_price(a, b))
    });
}

/// Runs one search. Never fails: provider errors yield `sample_listings()`.
pub async fn search_apartments(
    resolver: &OfficeResolver,
    source: &dyn ListingSource,
    params: &SearchParams,
    recommended_ids: &[String],
) -> Vec<ApartmentListing> {
    match retrieve_listings(resolver, source, params).await {
        Ok(mut listings) => {
            info!(
                "Found {} listing(s) for {} in {}",
                listings.len(),
                params.company,
                params.location
            );
            rank_listings(&mut listings, recommended_ids);
            listings
        }
        Err(e) => {
            error!("Listing retrieval failed: {e}; falling back to sample listings");
            sample_listings()
        }
    }
}

/// Fixed fallback returned when the listings provider is unreachable.
pub fn sample_listings() -> Vec<ApartmentListing> {
    vec![
        ApartmentListing {
            id: "1".to_string(),
            title: "Modern Studio Apartment".to_string(),
            price: 1200.0,
            location: "123 Tech Street, San Francisco".to_string(),
            distance: DistanceLabel::WithinRange {
                miles: 0.5,
                office_address: None,
            },
            rating: 4.8,
            image: "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267".to_string(),
            amenities: vec!["WiFi".into(), "Parking".into(), "Gym".into()],
            url: "https://example.com/listing1".to_string(),
        },
        ApartmentListing {
            id: "2".to_string(),
            title: "Cozy 1-Bedroom".to_string(),
            price: 1500.0,
            location: "456 Innovation Ave, San Francisco".to_string(),
            distance: DistanceLabel::WithinRange {
                miles: 1.2,
                office_address: None,
            },
            rating: 4.5,
            image: "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688".to_string(),
            amenities: vec!["WiFi".into(), "Washer/Dryer".into(), "Pet Friendly".into()],
            url: "https://example.com/listing2".to_string(),
        },
    ]
}
