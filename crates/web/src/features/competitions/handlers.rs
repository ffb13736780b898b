use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::competition::{
    AddRefereeRequest, CompetitionResponse, CreateCompetitionRequest, RefereeResponse,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Caller;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List all competitions successfully", body = Vec<CompetitionResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_competitions(state.store.as_ref()).await?;

    let response: Vec<CompetitionResponse> = competitions
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(state): State<AppState>,
    Path(competition_id): Path<i32>,
) -> Result<Response, WebError> {
    let competition = services::get_competition(state.store.as_ref(), competition_id).await?;

    Ok(Json(CompetitionResponse::from(competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Competition created successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not create competitions")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    caller.require_creator()?;
    req.validate()?;

    let competition =
        services::create_competition(state.store.as_ref(), caller.user_id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(competition)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/referees",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    request_body = AddRefereeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Referee role granted", body = RefereeResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition or user not found")
    ),
    tag = "competitions"
)]
pub async fn add_referee(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Json(req): Json<AddRefereeRequest>,
) -> Result<Json<RefereeResponse>, WebError> {
    caller.require_admin(competition_id)?;
    req.validate()?;

    let referee = services::add_referee(state.store.as_ref(), competition_id, &req).await?;

    Ok(Json(referee))
}
