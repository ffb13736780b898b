use std::time::Duration;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod openapi;
pub mod state;

use openapi::ApiDoc;
use state::AppState;

/// Builds the full router. `/health` and the OpenAPI document are public;
/// everything under `/api/competitions` needs a bearer token.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/competitions", features::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
