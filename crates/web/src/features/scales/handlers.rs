use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::scale::{CreateScaleRequest, UpdateScaleRequest},
    models::{Scale, ZoneInfo},
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Caller;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/zones",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Distinct (category, zone) pairs", body = Vec<ZoneInfo>),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "scales"
)]
pub async fn list_zones(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
) -> Result<Json<Vec<ZoneInfo>>, WebError> {
    caller.require_access(competition_id)?;

    let zones = services::list_zones(state.store.as_ref(), competition_id).await?;

    Ok(Json(zones))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/scales",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Scales ordered by category and zone", body = Vec<Scale>),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "scales"
)]
pub async fn list_scales(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
) -> Result<Json<Vec<Scale>>, WebError> {
    caller.require_access(competition_id)?;

    let scales = services::list_scales(state.store.as_ref(), competition_id).await?;

    Ok(Json(scales))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/scales",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    request_body = CreateScaleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Scale created", body = Scale),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Scale already exists for this category and zone")
    ),
    tag = "scales"
)]
pub async fn create_scale(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Json(req): Json<CreateScaleRequest>,
) -> Result<Response, WebError> {
    caller.require_admin(competition_id)?;
    req.validate()?;

    let scale =
        services::create_scale(state.store.as_ref(), req.into_scale(competition_id)).await?;

    Ok((StatusCode::CREATED, Json(scale)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/scales/{category}/{zone}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("category" = String, Path, description = "Participant category"),
        ("zone" = String, Path, description = "Zone label")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Scale found", body = Scale),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Scale not found")
    ),
    tag = "scales"
)]
pub async fn get_scale(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, category, zone)): Path<(i32, String, String)>,
) -> Result<Json<Scale>, WebError> {
    caller.require_access(competition_id)?;

    let scale = services::get_scale(state.store.as_ref(), competition_id, &category, &zone).await?;

    Ok(Json(scale))
}

#[utoipa::path(
    put,
    path = "/api/competitions/{competition_id}/scales/{category}/{zone}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("category" = String, Path, description = "Participant category"),
        ("zone" = String, Path, description = "Zone label")
    ),
    request_body = UpdateScaleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Scale updated", body = Scale),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Scale not found")
    ),
    tag = "scales"
)]
pub async fn update_scale(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, category, zone)): Path<(i32, String, String)>,
    Json(req): Json<UpdateScaleRequest>,
) -> Result<Json<Scale>, WebError> {
    caller.require_admin(competition_id)?;
    req.validate()?;

    let scale = services::update_scale(
        state.store.as_ref(),
        req.into_scale(competition_id, category, zone),
    )
    .await?;

    Ok(Json(scale))
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{competition_id}/scales/{category}/{zone}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("category" = String, Path, description = "Participant category"),
        ("zone" = String, Path, description = "Zone label")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Scale deleted"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Scale not found")
    ),
    tag = "scales"
)]
pub async fn delete_scale(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, category, zone)): Path<(i32, String, String)>,
) -> Result<Response, WebError> {
    caller.require_admin(competition_id)?;

    services::delete_scale(state.store.as_ref(), competition_id, &category, &zone).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
