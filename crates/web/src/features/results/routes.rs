use axum::{Router, routing::get};

use super::handlers::export_results;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/:competition_id/results/export", get(export_results))
}
