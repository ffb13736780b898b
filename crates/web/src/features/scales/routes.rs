use axum::{Router, routing::get};

use super::handlers::{
    create_scale, delete_scale, get_scale, list_scales, list_zones, update_scale,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:competition_id/zones", get(list_zones))
        .route("/:competition_id/scales", get(list_scales).post(create_scale))
        .route(
            "/:competition_id/scales/:category/:zone",
            get(get_scale).put(update_scale).delete(delete_scale),
        )
}
