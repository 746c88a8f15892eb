use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;
use crate::translate::{TranslateQuery, TranslateRequest, TranslateResponse};

/// Full application router with middleware and state attached
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_routes(state: AppState) -> Router<AppState> {
    let frontend_dir = PathBuf::from(&state.config.system_config.frontend_dir);

    Router::new()
        // WebSocket
        .route("/ws/chat", get(crate::websocket::websocket_handler))

        .route("/translate", post(translate_handler))
        .route("/api/health", get(health_check))

        // Frontend
        .route_service("/", ServeFile::new(frontend_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(frontend_dir.join("static")))
}

async fn translate_handler(
    State(state): State<AppState>,
    Query(query): Query<TranslateQuery>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, String)> {
    state
        .pipeline
        .translate_to(&request.text, &request.source_language, &query.target)
        .await
        .map(|translated| Json(TranslateResponse { translated }))
        .map_err(|e| {
            warn!("Translation {}->{} failed: {}", request.source_language, query.target, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cached_translators": state.pipeline_cache.len()
    }))
}
