use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::run::{CreateRunRequest, UpdateRunRequest},
    models::Run,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Caller;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/runs",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Runs ordered by dossard and run number", body = Vec<Run>),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "runs"
)]
pub async fn list_runs(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
) -> Result<Json<Vec<Run>>, WebError> {
    caller.require_admin(competition_id)?;

    let runs = services::list_runs(state.store.as_ref(), competition_id).await?;

    Ok(Json(runs))
}

/// Records a run judged by the caller and updates the liveranking.
#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/runs",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    request_body = CreateRunRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Run recorded", body = Run),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Participant or scale not found"),
        (status = 409, description = "Run number already used by this participant")
    ),
    tag = "runs"
)]
pub async fn create_run(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Json(req): Json<CreateRunRequest>,
) -> Result<Response, WebError> {
    caller.require_access(competition_id)?;
    req.validate()?;

    let run = services::create_run(
        state.store.as_ref(),
        &state.policy,
        req.into_new_run(competition_id, caller.user_id),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(run)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/runs/{dossard}/{run_number}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number"),
        ("run_number" = i32, Path, description = "Run number, per participant")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run found", body = Run),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Run not found")
    ),
    tag = "runs"
)]
pub async fn get_run(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard, run_number)): Path<(i32, i32, i32)>,
) -> Result<Json<Run>, WebError> {
    caller.require_access(competition_id)?;

    let run = services::get_run(state.store.as_ref(), competition_id, dossard, run_number).await?;

    Ok(Json(run))
}

#[utoipa::path(
    put,
    path = "/api/competitions/{competition_id}/runs/{dossard}/{run_number}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number"),
        ("run_number" = i32, Path, description = "Run number, per participant")
    ),
    request_body = UpdateRunRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Run updated and liveranking recomputed", body = Run),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Run not found")
    ),
    tag = "runs"
)]
pub async fn update_run(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard, run_number)): Path<(i32, i32, i32)>,
    Json(req): Json<UpdateRunRequest>,
) -> Result<Json<Run>, WebError> {
    caller.require_admin(competition_id)?;
    req.validate()?;

    let run = services::update_run(
        state.store.as_ref(),
        &state.policy,
        req.into_run(competition_id, dossard, run_number, caller.user_id),
    )
    .await?;

    Ok(Json(run))
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{competition_id}/runs/{dossard}/{run_number}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number"),
        ("run_number" = i32, Path, description = "Run number, per participant")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Run deleted and liveranking recomputed"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Run not found")
    ),
    tag = "runs"
)]
pub async fn delete_run(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard, run_number)): Path<(i32, i32, i32)>,
) -> Result<Response, WebError> {
    caller.require_admin(competition_id)?;

    services::delete_run(
        state.store.as_ref(),
        &state.policy,
        competition_id,
        dossard,
        run_number,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
