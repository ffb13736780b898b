use storage::{
    Store,
    error::Result,
    services::{policy::ScoringPolicy, results_export, workbook},
};

/// A rendered workbook ready to be sent as an attachment.
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub async fn export_results(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
) -> Result<ExportFile> {
    let export = results_export::build_export(store, policy, competition_id).await?;
    let bytes = workbook::render_xlsx(&export)?;

    Ok(ExportFile {
        filename: export.filename,
        bytes,
    })
}
