//! Recommendation Service: asks the LLM to pick the best listings for a
//! user's preferences and returns their identifiers in the model's order.

pub mod handlers;
pub mod parser;
pub mod prompts;

use std::collections::HashSet;

use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, NO_EXTRA_TEXT};
use crate::llm_client::LlmClient;
use crate::models::listing::ApartmentListing;
use crate::models::search::SearchParams;
use crate::recommendation::parser::parse_recommended_ids;
use crate::recommendation::prompts::{
    LISTING_BLOCK_TEMPLATE, MAX_RECOMMENDATIONS, RECOMMENDATION_OPTIONS,
    RECOMMENDATION_PROMPT_TEMPLATE, RECOMMENDATION_SYSTEM,
};

/// Returns up to three recommended listing ids. Any failure yields an empty list.
pub async fn recommend_listings(
    llm: &LlmClient,
    apartments: &[ApartmentListing],
    params: &SearchParams,
) -> Vec<String> {
    if apartments.is_empty() {
        return Vec::new();
    }

    let prompt = build_prompt(apartments, params);
    info!(
        "Requesting recommendations for {} listing(s)",
        apartments.len()
    );

    let answer = match llm
        .complete(RECOMMENDATION_SYSTEM, &prompt, RECOMMENDATION_OPTIONS)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Recommendation call failed: {e}");
            return Vec::new();
        }
    };

    let ids = select_known_ids(parse_recommended_ids(&answer), apartments);
    if ids.is_empty() {
        warn!("No usable ids in recommendation answer: {answer:?}");
    }
    ids
}

/// Keeps ids that belong to the submitted listings, first occurrence only,
/// capped at `MAX_RECOMMENDATIONS`.
pub fn select_known_ids(ids: Vec<String>, apartments: &[ApartmentListing]) -> Vec<String> {
    let known: HashSet<&str> = apartments.iter().map(|a| a.id.as_str()).collect();
    let mut seen = HashSet::new();

    ids.into_iter()
        .filter(|id| {
            let is_known = known.contains(id.as_str());
            if !is_known {
                warn!("Dropping recommended id not in the listing set: {id}");
            }
            is_known
        })
        .filter(|id| seen.insert(id.clone()))
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join(", ")
    }
}

pub fn build_prompt(apartments: &[ApartmentListing], params: &SearchParams) -> String {
    let listings = apartments
        .iter()
        .map(|apt| {
            fill_template(
                LISTING_BLOCK_TEMPLATE,
                &[
                    ("id", apt.id.as_str()),
                    ("title", apt.title.as_str()),
                    ("price", apt.price.to_string().as_str()),
                    ("location", apt.location.as_str()),
                    ("distance", apt.distance.to_string().as_str()),
                    ("rating", apt.rating.to_string().as_str()),
                    ("amenities", join_or_na(&apt.amenities).as_str()),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("no_extra_text", NO_EXTRA_TEXT),
            ("max_price", params.max_price.to_string().as_str()),
            ("max_distance", params.max_distance.to_string().as_str()),
            ("safety", params.safety_preference.to_string().as_str()),
            ("cleanliness", params.cleanliness_preference.to_string().as_str()),
            ("room_type", params.room_type.as_str()),
            ("amenities", join_or_na(&params.amenities).as_str()),
            ("preferences", join_or_na(&params.preferences).as_str()),
            ("listings", listings.as_str()),
        ],
    )
}
