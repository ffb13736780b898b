//! Offline maintenance commands run against a competition database:
//! start list import, liveranking rebuild and results export.

pub mod error;

use std::path::{Path, PathBuf};

use storage::{
    Store,
    services::{
        liveranking::{self, RebuildSummary},
        participant_import::{self, ImportSummary},
        policy::ScoringPolicy,
        results_export, workbook,
    },
};

pub use error::{ImporterError, Result};

pub async fn import_start_list(
    store: &dyn Store,
    competition_id: i32,
    file: &Path,
) -> Result<ImportSummary> {
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ImporterError::InvalidPath(file.to_path_buf()))?;
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|source| ImporterError::ReadError {
            path: file.to_path_buf(),
            source,
        })?;

    tracing::info!("Importing start list from: {}", file.display());
    Ok(participant_import::import_participants(store, competition_id, filename, &bytes).await?)
}

pub async fn rebuild_liveranking(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
) -> Result<RebuildSummary> {
    Ok(liveranking::rebuild_competition(store, policy, competition_id).await?)
}

/// Writes the results workbook into `output` and returns its path.
pub async fn export_results(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    output: &Path,
) -> Result<PathBuf> {
    let export = results_export::build_export(store, policy, competition_id).await?;
    let bytes = workbook::render_xlsx(&export)?;

    let write_error = |source| ImporterError::WriteError {
        path: output.to_path_buf(),
        source,
    };
    tokio::fs::create_dir_all(output).await.map_err(write_error)?;
    let path = output.join(&export.filename);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| ImporterError::WriteError {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}
