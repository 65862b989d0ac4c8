//! Axum route handler for the Recommendation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;
use crate::models::listing::ApartmentListing;
use crate::models::search::SearchParams;
use crate::recommendation::recommend_listings;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub apartments: Vec<ApartmentListing>,
    #[serde(default)]
    pub search_params: SearchParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommended_ids: Vec<String>,
}

/// POST /api/chatgpt/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;

    let task = tokio::spawn(async move {
        recommend_listings(&state.llm, &request.apartments, &request.search_params).await
    });

    let recommended_ids = task.await.map_err(|e| {
        error!("Error getting recommendations: {e}");
        AppError::RecommendationsFailed
    })?;

    Ok(Json(RecommendationResponse { recommended_ids }))
}
