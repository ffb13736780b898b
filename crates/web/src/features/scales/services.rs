use storage::{
    Store,
    error::{Resource, Result, StorageError},
    models::{Scale, ZoneInfo},
};

pub async fn list_zones(store: &dyn Store, competition_id: i32) -> Result<Vec<ZoneInfo>> {
    store.get_competition(competition_id).await?;
    store.list_zones(competition_id).await
}

pub async fn list_scales(store: &dyn Store, competition_id: i32) -> Result<Vec<Scale>> {
    store.get_competition(competition_id).await?;
    store.list_scales(competition_id).await
}

pub async fn get_scale(
    store: &dyn Store,
    competition_id: i32,
    category: &str,
    zone: &str,
) -> Result<Scale> {
    store
        .find_scale(competition_id, category, zone)
        .await?
        .ok_or(StorageError::NotFound(Resource::Scale))
}

pub async fn create_scale(store: &dyn Store, scale: Scale) -> Result<Scale> {
    let created = store.create_scale(&scale).await?;
    tracing::info!(
        competition_id = created.competition_id,
        category = %created.category,
        zone = %created.zone,
        "Scale created"
    );
    Ok(created)
}

/// Existing runs keep their liveranking totals until the next rebuild.
pub async fn update_scale(store: &dyn Store, scale: Scale) -> Result<Scale> {
    let updated = store.update_scale(&scale).await?;
    tracing::info!(
        competition_id = updated.competition_id,
        category = %updated.category,
        zone = %updated.zone,
        "Scale updated"
    );
    Ok(updated)
}

pub async fn delete_scale(
    store: &dyn Store,
    competition_id: i32,
    category: &str,
    zone: &str,
) -> Result<()> {
    store.delete_scale(competition_id, category, zone).await?;
    tracing::info!(competition_id, category, zone, "Scale deleted");
    Ok(())
}
