use axum::{Router, middleware};

use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub mod competitions;
pub mod liveranking;
pub mod participants;
pub mod results;
pub mod runs;
pub mod scales;

/// Every competition endpoint, behind bearer authentication. Mounted at
/// `/api/competitions`.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(competitions::routes::routes())
        .merge(scales::routes::routes())
        .merge(participants::routes::routes())
        .merge(runs::routes::routes())
        .merge(liveranking::routes::routes())
        .merge(results::routes::routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
