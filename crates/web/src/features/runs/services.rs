use storage::{
    Store,
    error::Result,
    models::{NewRun, Run},
    services::{policy::ScoringPolicy, run_ledger},
};

pub async fn list_runs(store: &dyn Store, competition_id: i32) -> Result<Vec<Run>> {
    run_ledger::list_runs(store, competition_id).await
}

pub async fn get_run(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
    run_number: i32,
) -> Result<Run> {
    run_ledger::get_run(store, competition_id, run_number, dossard).await
}

pub async fn create_run(store: &dyn Store, policy: &ScoringPolicy, run: NewRun) -> Result<Run> {
    run_ledger::create_run(store, policy, run).await
}

pub async fn update_run(store: &dyn Store, policy: &ScoringPolicy, run: Run) -> Result<Run> {
    run_ledger::update_run(store, policy, run).await
}

pub async fn delete_run(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    dossard: i32,
    run_number: i32,
) -> Result<()> {
    run_ledger::delete_run(store, policy, competition_id, run_number, dossard).await
}
