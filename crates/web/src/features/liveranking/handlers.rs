use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use storage::{
    dto::liveranking::{CategoryRankingParams, LiverankingListResponse, LiverankingParams},
    models::LiverankingEntry,
    services::liveranking::RebuildSummary,
};

use crate::error::{WebError, WebResult};
use crate::middleware::auth::Caller;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/liveranking",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        LiverankingParams
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of the standings", body = LiverankingListResponse),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "liveranking"
)]
pub async fn list_liveranking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Query(params): Query<LiverankingParams>,
) -> WebResult<Json<LiverankingListResponse>> {
    caller.require_access(competition_id)?;

    let page = services::list_liveranking(
        state.store.as_ref(),
        &state.policy,
        competition_id,
        params.page(),
    )
    .await?;

    Ok(Json(LiverankingListResponse::from_page(
        competition_id,
        None,
        page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/liveranking/by-category",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        CategoryRankingParams
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of a category and gender", body = LiverankingListResponse),
        (status = 400, description = "Missing category or gender"),
        (status = 403, description = "Caller has no access to the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "liveranking"
)]
pub async fn list_by_category(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
    Query(params): Query<CategoryRankingParams>,
) -> WebResult<Json<LiverankingListResponse>> {
    caller.require_access(competition_id)?;
    let (category, gender) = params.filter().map_err(WebError::BadRequest)?;

    let page = services::list_by_category_and_gender(
        state.store.as_ref(),
        &state.policy,
        competition_id,
        &category,
        gender,
        params.page(),
    )
    .await?;

    Ok(Json(LiverankingListResponse::from_page(
        competition_id,
        Some((category, gender)),
        page,
    )))
}

/// Recomputes every entry of the competition from its runs.
#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/liveranking/rebuild",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Liveranking rebuilt", body = RebuildSummary),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "liveranking"
)]
pub async fn rebuild_liveranking(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
) -> WebResult<Json<RebuildSummary>> {
    caller.require_admin(competition_id)?;

    let summary = services::rebuild(state.store.as_ref(), &state.policy, competition_id).await?;

    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/liveranking/{dossard}/refresh",
    params(
        ("competition_id" = i32, Path, description = "Competition id"),
        ("dossard" = i32, Path, description = "Bib number")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entry now carries the participant's current identity", body = LiverankingEntry),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Participant or entry not found")
    ),
    tag = "liveranking"
)]
pub async fn refresh_entry(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((competition_id, dossard)): Path<(i32, i32)>,
) -> WebResult<Json<LiverankingEntry>> {
    caller.require_admin(competition_id)?;

    let entry = services::refresh_entry(state.store.as_ref(), competition_id, dossard).await?;

    Ok(Json(entry))
}
