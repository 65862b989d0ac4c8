//! Axum route handler for the search API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::error;

use crate::errors::AppError;
use crate::models::lenient;
use crate::models::listing::ApartmentListing;
use crate::models::search::SearchParams;
use crate::ranking::search_apartments;
use crate::state::AppState;

/// Search form fields plus the ids the client wants pinned to the top.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(flatten)]
    pub params: SearchParams,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommended_ids: Vec<String>,
}

/// POST /api/search
///
/// Always 200 with an array unless the search task itself dies.
pub async fn handle_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<ApartmentListing>>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;

    let task = tokio::spawn(async move {
        search_apartments(
            &state.office_resolver,
            state.listing_source.as_ref(),
            &request.params,
            &request.recommended_ids,
        )
        .await
    });

    let listings = task.await.map_err(|e| {
        error!("Error searching apartments: {e}");
        AppError::SearchFailed
    })?;

    Ok(Json(listings))
}
