use storage::{
    Store,
    error::Result,
    models::{Participant, RunDetails},
    services::{
        participant_import::{self, ImportSummary},
        run_ledger,
    },
};

pub async fn list_participants(
    store: &dyn Store,
    competition_id: i32,
    category: Option<&str>,
) -> Result<Vec<Participant>> {
    store.get_competition(competition_id).await?;
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => {
            store
                .list_participants_by_category(competition_id, category)
                .await
        }
        None => store.list_participants(competition_id).await,
    }
}

pub async fn get_participant(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
) -> Result<Participant> {
    store.get_participant(competition_id, dossard).await
}

pub async fn create_participant(store: &dyn Store, participant: Participant) -> Result<Participant> {
    let created = store.create_participant(&participant).await?;
    tracing::info!(
        competition_id = created.competition_id,
        dossard = created.dossard_number,
        category = %created.category,
        "Participant registered"
    );
    Ok(created)
}

/// The liveranking entry keeps the old identity fields until refreshed.
pub async fn update_participant(store: &dyn Store, participant: Participant) -> Result<Participant> {
    let updated = store.update_participant(&participant).await?;
    tracing::info!(
        competition_id = updated.competition_id,
        dossard = updated.dossard_number,
        "Participant updated"
    );
    Ok(updated)
}

pub async fn delete_participant(store: &dyn Store, competition_id: i32, dossard: i32) -> Result<()> {
    store.delete_participant(competition_id, dossard).await?;
    tracing::info!(competition_id, dossard, "Participant deleted");
    Ok(())
}

pub async fn import_participants(
    store: &dyn Store,
    competition_id: i32,
    filename: &str,
    bytes: &[u8],
) -> Result<ImportSummary> {
    participant_import::import_participants(store, competition_id, filename, bytes).await
}

pub async fn list_runs_with_details(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
) -> Result<Vec<RunDetails>> {
    run_ledger::list_runs_by_dossard_with_details(store, competition_id, dossard).await
}
