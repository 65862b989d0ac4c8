pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::ranking::handlers::handle_search;
use crate::recommendation::handlers::handle_recommendations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/search", post(handle_search))
        .route("/api/chatgpt/recommendations", post(handle_recommendations));

    // Client bundle: unknown paths fall back to index.html for client-side routing.
    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    };

    router.with_state(state)
}
