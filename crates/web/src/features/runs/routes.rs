use axum::{Router, routing::get};

use super::handlers::{create_run, delete_run, get_run, list_runs, update_run};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:competition_id/runs", get(list_runs).post(create_run))
        .route(
            "/:competition_id/runs/:dossard/:run_number",
            get(get_run).put(update_run).delete(delete_run),
        )
}
