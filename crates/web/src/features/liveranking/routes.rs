use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_by_category, list_liveranking, rebuild_liveranking, refresh_entry};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:competition_id/liveranking", get(list_liveranking))
        .route(
            "/:competition_id/liveranking/by-category",
            get(list_by_category),
        )
        .route(
            "/:competition_id/liveranking/rebuild",
            post(rebuild_liveranking),
        )
        .route(
            "/:competition_id/liveranking/:dossard/refresh",
            post(refresh_entry),
        )
}
