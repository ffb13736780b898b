use storage::{
    Store,
    dto::common::Page,
    error::Result,
    models::{Gender, LiverankingEntry},
    services::{
        liveranking::{self, LiverankingPage, RebuildSummary},
        policy::ScoringPolicy,
    },
};

pub async fn list_liveranking(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    page: Page,
) -> Result<LiverankingPage> {
    liveranking::list_liveranking(store, policy, competition_id, page).await
}

pub async fn list_by_category_and_gender(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    category: &str,
    gender: Gender,
    page: Page,
) -> Result<LiverankingPage> {
    liveranking::list_liveranking_by_category_and_gender(
        store,
        policy,
        competition_id,
        category,
        gender,
        page,
    )
    .await
}

pub async fn rebuild(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
) -> Result<RebuildSummary> {
    liveranking::rebuild_competition(store, policy, competition_id).await
}

pub async fn refresh_entry(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
) -> Result<LiverankingEntry> {
    liveranking::refresh_denormalized_fields(store, competition_id, dossard).await
}
