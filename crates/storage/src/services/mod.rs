pub mod liveranking;
pub mod participant_import;
pub mod points_table;
pub mod policy;
pub mod results_export;
pub mod run_ledger;
pub mod scoring;
pub mod workbook;
