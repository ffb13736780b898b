use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{add_referee, create_competition, get_competition, list_competitions};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_competitions).post(create_competition))
        .route("/:competition_id", get(get_competition))
        .route("/:competition_id/referees", post(add_referee))
}
