use axum::{
    Extension,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use storage::services::workbook::XLSX_CONTENT_TYPE;

use crate::error::WebResult;
use crate::middleware::auth::Caller;
use crate::state::AppState;

use super::services;

/// Downloads the results workbook: one sheet per category and gender.
#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}/results/export",
    params(
        ("competition_id" = i32, Path, description = "Competition id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Results workbook", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Caller is not an admin of the competition"),
        (status = 404, description = "Competition not found")
    ),
    tag = "results"
)]
pub async fn export_results(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(competition_id): Path<i32>,
) -> WebResult<Response> {
    caller.require_admin(competition_id)?;

    let file =
        services::export_results(state.store.as_ref(), &state.policy, competition_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename.replace('"', ""));

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
