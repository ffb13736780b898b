use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    create_participant, delete_participant, get_participant, import_participants,
    list_participant_runs, list_participants, update_participant,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:competition_id/participants",
            get(list_participants).post(create_participant),
        )
        .route(
            "/:competition_id/participants/import",
            post(import_participants),
        )
        .route(
            "/:competition_id/participants/:dossard",
            get(get_participant)
                .put(update_participant)
                .delete(delete_participant),
        )
        .route(
            "/:competition_id/participants/:dossard/runs",
            get(list_participant_runs),
        )
}
