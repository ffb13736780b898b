use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::participant::{CreateParticipantRequest, ParticipantFilter, UpdateParticipantRequest},
    models::{Participant, RunDetails},
    services::participant_import::ImportSummary,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Caller;
use crate::state::AppState;

use super::services;

const UPLOAD_FIELD: &str = "file";

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/participants",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ParticipantFilter
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Participants ordered by dossard", body = Vec<Participant>),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Query(filter): Query<ParticipantFilter>,
) -> Result<Json<Vec<Participant>>, WebError> {
    caller.require_access(competition_id)?;

    let participants = services::list_participants(
        state.store.as_ref(),
        competition_id,
        filter.category.as_deref(),
    )
    .await?;

    Ok(Json(participants))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/participants",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    request_body = CreateParticipantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Participant registered", body = Participant),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Dossard already registered")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<Response, WebError> {
    caller.require_admin(competition_id)?;
    req.validate()?;

    let participant = services::create_participant(
        state.store.as_ref(),
        req.into_participant(competition_id),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(participant)).into_response())
}

/// Multipart upload of a `.csv`, `.xlsx` or `.xls` start list in the `file`
/// field.
#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/participants/import",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    request_body(content_type = "multipart/form-data", description = "Start list in the `file` field"),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Participants imported", body = ImportSummary),
        (status = 400, description = "Unreadable file or invalid row"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "participants"
)]
pub async fn import_participants(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    caller.require_admin(competition_id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| WebError::BadRequest("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| WebError::BadRequest(e.to_string()))?;

        let summary =
            services::import_participants(state.store.as_ref(), competition_id, &filename, &bytes)
                .await?;

        return Ok((StatusCode::CREATED, Json(summary)).into_response());
    }

    Err(WebError::BadRequest(format!(
        "Missing '{UPLOAD_FIELD}' field"
    )))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/participants/{dossard}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Participant found", body = Participant),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard)): Path<(i32, i32)>,
) -> Result<Json<Participant>, WebError> {
    caller.require_access(competition_id)?;

    let participant =
        services::get_participant(state.store.as_ref(), competition_id, dossard).await?;

    Ok(Json(participant))
}

#[utoipa::path(
    put,
    path = "/api/competitions/{competition_id}/participants/{dossard}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number")
    ),
    request_body = UpdateParticipantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Participant updated", body = Participant),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn update_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard)): Path<(i32, i32)>,
    Json(req): Json<UpdateParticipantRequest>,
) -> Result<Json<Participant>, WebError> {
    caller.require_admin(competition_id)?;
    req.validate()?;

    let participant = services::update_participant(
        state.store.as_ref(),
        req.into_participant(competition_id, dossard),
    )
    .await?;

    Ok(Json(participant))
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{competition_id}/participants/{dossard}",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Participant, runs and liveranking entry deleted"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard)): Path<(i32, i32)>,
) -> Result<Response, WebError> {
    caller.require_admin(competition_id)?;

    services::delete_participant(state.store.as_ref(), competition_id, dossard).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/participants/{dossard}/runs",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Runs with referee names, by run number", body = Vec<RunDetails>),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn list_participant_runs(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard)): Path<(i32, i32)>,
) -> Result<Json<Vec<RunDetails>>, WebError> {
    caller.require_access(competition_id)?;

    let runs =
        services::list_runs_with_details(state.store.as_ref(), competition_id, dossard).await?;

    Ok(Json(runs))
}
