use utoipa::OpenApi;

use crate::features::{competitions, liveranking, participants, results, runs, scales};

#[derive(OpenApi)]
#[openapi(
    paths(
        competitions::handlers::list_competitions,
        competitions::handlers::get_competition,
        competitions::handlers::create_competition,
        competitions::handlers::add_referee,
        scales::handlers::list_zones,
        scales::handlers::list_scales,
        scales::handlers::create_scale,
        scales::handlers::get_scale,
        scales::handlers::update_scale,
        scales::handlers::delete_scale,
        participants::handlers::list_participants,
        participants::handlers::create_participant,
        participants::handlers::import_participants,
        participants::handlers::get_participant,
        participants::handlers::update_participant,
        participants::handlers::delete_participant,
        participants::handlers::list_participant_runs,
        runs::handlers::list_runs,
        runs::handlers::create_run,
        runs::handlers::get_run,
        runs::handlers::update_run,
        runs::handlers::delete_run,
        liveranking::handlers::list_liveranking,
        liveranking::handlers::list_by_category,
        liveranking::handlers::rebuild_liveranking,
        liveranking::handlers::refresh_entry,
        results::handlers::export_results,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::competition::AddRefereeRequest,
            storage::dto::competition::RefereeResponse,
            storage::dto::scale::CreateScaleRequest,
            storage::dto::scale::UpdateScaleRequest,
            storage::dto::participant::CreateParticipantRequest,
            storage::dto::participant::UpdateParticipantRequest,
            storage::dto::run::CreateRunRequest,
            storage::dto::run::UpdateRunRequest,
            storage::dto::liveranking::LiverankingResponse,
            storage::dto::liveranking::LiverankingListResponse,
            storage::dto::common::PaginationMeta,
            storage::services::liveranking::RebuildSummary,
            storage::services::participant_import::ImportSummary,
            storage::models::Competition,
            storage::models::Scale,
            storage::models::DoorPoints,
            storage::models::ZoneInfo,
            storage::models::Participant,
            storage::models::Gender,
            storage::models::Run,
            storage::models::Doors,
            storage::models::RunDetails,
            storage::models::LiverankingEntry,
            storage::models::RunTotals,
        )
    ),
    tags(
        (name = "competitions", description = "Competitions and their referees"),
        (name = "scales", description = "Door points per category and zone"),
        (name = "participants", description = "Participant registry and start list import"),
        (name = "runs", description = "Run ledger"),
        (name = "liveranking", description = "Live standings"),
        (name = "results", description = "Results workbook export"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
