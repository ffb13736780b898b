use crate::error::{Resource, Result, StorageError};
use crate::models::{NewRun, Participant, Run, RunDetails, RunTotals};
use crate::store::Store;

use super::liveranking;
use super::policy::ScoringPolicy;
use super::scoring::{ScaleIndex, totals_for_runs};

/// Records a run and folds it into the participant's liveranking entry.
pub async fn create_run(store: &dyn Store, policy: &ScoringPolicy, run: NewRun) -> Result<Run> {
    let participant = store
        .get_participant(run.competition_id, run.dossard)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(Resource::Participant) => {
                StorageError::ParticipantNotFoundForRun {
                    competition_id: run.competition_id,
                    dossard: run.dossard,
                }
            }
            other => other,
        })?;

    let scale = store
        .find_scale(run.competition_id, &participant.category, &run.zone)
        .await?;
    let scales = ScaleIndex::new(scale);
    // Scored before insertion so a rejected run never reaches the ledger.
    let points = scales.score(
        &run.clone().into_run(0),
        &participant.category,
        policy.live_missing_scale,
    )?;

    if let Some(points) = points {
        let delta = RunTotals::single(points, run.penalty, run.chrono_sec);
        ensure_totals_fit(store, policy, &participant, &delta).await?;
    }

    let created = store.insert_run(&run).await?;
    tracing::info!(
        competition_id = created.competition_id,
        dossard = created.dossard,
        run_number = created.run_number,
        zone = %created.zone,
        "Run recorded"
    );

    liveranking::record_new_run(store, policy, &participant, &created, points).await?;
    Ok(created)
}

pub async fn get_run(
    store: &dyn Store,
    competition_id: i32,
    run_number: i32,
    dossard: i32,
) -> Result<Run> {
    store.get_run(competition_id, run_number, dossard).await
}

pub async fn list_runs(store: &dyn Store, competition_id: i32) -> Result<Vec<Run>> {
    store.get_competition(competition_id).await?;
    store.list_runs(competition_id).await
}

pub async fn list_runs_by_dossard(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
) -> Result<Vec<Run>> {
    store.get_participant(competition_id, dossard).await?;
    store.list_runs_by_dossard(competition_id, dossard).await
}

pub async fn list_runs_by_dossard_with_details(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
) -> Result<Vec<RunDetails>> {
    store.get_participant(competition_id, dossard).await?;
    store
        .list_runs_by_dossard_with_details(competition_id, dossard)
        .await
}

/// Rejects a delta that would push the participant's entry out of range,
/// checked against whichever totals the liveranking path is about to add to.
async fn ensure_totals_fit(
    store: &dyn Store,
    policy: &ScoringPolicy,
    participant: &Participant,
    delta: &RunTotals,
) -> Result<()> {
    let competition_id = participant.competition_id;
    let dossard = participant.dossard_number;

    let current = if policy.incremental_liveranking {
        store
            .get_liveranking(competition_id, dossard)
            .await?
            .map(|entry| entry.totals)
            .unwrap_or_default()
    } else {
        let runs = store.list_runs_by_dossard(competition_id, dossard).await?;
        let scales = ScaleIndex::new(store.list_scales(competition_id).await?);
        totals_for_runs(
            &runs,
            &participant.category,
            &scales,
            policy.recompute_missing_scale,
        )?
    };

    current.checked_add(delta).map(|_| ())
}

/// Replaces the run's mutable fields, then recomputes the owner's entry.
pub async fn update_run(store: &dyn Store, policy: &ScoringPolicy, run: Run) -> Result<Run> {
    let runs = store
        .list_runs_by_dossard(run.competition_id, run.dossard)
        .await?;
    if runs.iter().any(|r| r.run_number == run.run_number) {
        let participant = store.get_participant(run.competition_id, run.dossard).await?;
        let scales = ScaleIndex::new(store.list_scales(run.competition_id).await?);
        let replaced = runs.iter().map(|r| {
            if r.run_number == run.run_number {
                &run
            } else {
                r
            }
        });
        totals_for_runs(
            replaced,
            &participant.category,
            &scales,
            policy.recompute_missing_scale,
        )?;
    }

    let updated = store.update_run(&run).await?;
    tracing::info!(
        competition_id = updated.competition_id,
        dossard = updated.dossard,
        run_number = updated.run_number,
        "Run updated"
    );

    liveranking::recompute_entry(store, policy, updated.competition_id, updated.dossard).await?;
    Ok(updated)
}

/// Removes the run, then recomputes the owner's entry. The entry disappears
/// with the participant's last run.
pub async fn delete_run(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    run_number: i32,
    dossard: i32,
) -> Result<()> {
    store.delete_run(competition_id, run_number, dossard).await?;
    tracing::info!(competition_id, dossard, run_number, "Run deleted");

    liveranking::recompute_entry(store, policy, competition_id, dossard).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, RunTotals};
    use crate::services::policy::MissingScalePolicy;
    use crate::store::{LiverankingStore, RunStore};
    use crate::test_support::{Fixture, run_input};
    use rstest::rstest;

    const DOOR1: [bool; 6] = [true, false, false, false, false, false];
    const NONE: [bool; 6] = [false; 6];

    async fn totals(fixture: &Fixture, dossard: i32) -> Option<RunTotals> {
        fixture
            .store
            .get_liveranking(fixture.competition_id, dossard)
            .await
            .unwrap()
            .map(|e| e.totals)
    }

    #[tokio::test]
    async fn run_numbers_follow_the_highest_existing_one() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();

        let mut numbers = Vec::new();
        for _ in 0..3 {
            let run = create_run(
                &fixture.store,
                &policy,
                run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30),
            )
            .await
            .unwrap();
            numbers.push(run.run_number);
        }
        assert_eq!(numbers, vec![1, 2, 3]);

        let mut explicit = run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30);
        explicit.run_number = 5;
        let run = create_run(&fixture.store, &policy, explicit).await.unwrap();
        assert_eq!(run.run_number, 5);

        let next = create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30),
        )
        .await
        .unwrap();
        assert_eq!(next.run_number, 6);
    }

    #[tokio::test]
    async fn explicit_run_number_collision_is_a_duplicate() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        let mut run = run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30);
        run.run_number = 2;
        create_run(&fixture.store, &policy, run.clone()).await.unwrap();

        let err = create_run(&fixture.store, &policy, run).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::DuplicateRun {
                dossard: 7,
                run_number: 2
            }
        ));
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn junior_zone_scenario(#[case] incremental: bool) {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy {
            incremental_liveranking: incremental,
            ..ScoringPolicy::default()
        };

        let first = create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 0),
        )
        .await
        .unwrap();
        assert_eq!(
            totals(&fixture, 7).await,
            Some(RunTotals::single(10, 0, 0))
        );

        create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", NONE, 5, 0),
        )
        .await
        .unwrap();
        let after_second = totals(&fixture, 7).await.unwrap();
        assert_eq!(after_second.number_of_runs, 2);
        assert_eq!(after_second.total_points, 10);
        assert_eq!(after_second.total_penalty, 5);

        delete_run(
            &fixture.store,
            &policy,
            fixture.competition_id,
            first.run_number,
            7,
        )
        .await
        .unwrap();
        assert_eq!(totals(&fixture, 7).await, Some(RunTotals::single(0, 5, 0)));
    }

    #[tokio::test]
    async fn repeated_runs_add_up() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy {
            incremental_liveranking: true,
            ..ScoringPolicy::default()
        };
        for _ in 0..4 {
            create_run(
                &fixture.store,
                &policy,
                run_input(fixture.competition_id, 7, "A", DOOR1, 1, 20),
            )
            .await
            .unwrap();
        }
        let entry = totals(&fixture, 7).await.unwrap();
        assert_eq!(entry.number_of_runs, 4);
        assert_eq!(entry.total_points, 40);
        assert_eq!(entry.total_penalty, 4);
        assert_eq!(entry.total_chrono_sec, 80);
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn run_overflowing_totals_is_rejected_before_insert(#[case] incremental: bool) {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy {
            incremental_liveranking: incremental,
            ..ScoringPolicy::default()
        };
        create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, i32::MAX),
        )
        .await
        .unwrap();

        let err = create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));

        let stored = fixture
            .store
            .list_runs_by_dossard(fixture.competition_id, 7)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            totals(&fixture, 7).await,
            Some(RunTotals::single(10, 0, i32::MAX))
        );
    }

    #[tokio::test]
    async fn update_overflowing_totals_leaves_the_run_unchanged() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, i32::MAX - 10),
        )
        .await
        .unwrap();
        let second = create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 5),
        )
        .await
        .unwrap();

        let mut slower = second.clone();
        slower.chrono_sec = 20;
        let err = update_run(&fixture.store, &policy, slower).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));

        let stored = get_run(&fixture.store, fixture.competition_id, second.run_number, 7)
            .await
            .unwrap();
        assert_eq!(stored.chrono_sec, 5);
        assert_eq!(
            totals(&fixture, 7).await.map(|t| t.total_chrono_sec),
            Some(i32::MAX - 5)
        );
    }

    #[tokio::test]
    async fn update_recomputes_from_current_runs() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy {
            incremental_liveranking: true,
            ..ScoringPolicy::default()
        };
        let run = create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", NONE, 3, 25),
        )
        .await
        .unwrap();
        create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30),
        )
        .await
        .unwrap();

        let mut corrected = run.clone();
        corrected.doors.door1 = true;
        corrected.penalty = 0;
        update_run(&fixture.store, &policy, corrected).await.unwrap();

        let entry = totals(&fixture, 7).await.unwrap();
        assert_eq!(entry.number_of_runs, 2);
        assert_eq!(entry.total_points, 20);
        assert_eq!(entry.total_penalty, 0);
        assert_eq!(entry.total_chrono_sec, 55);
    }

    #[tokio::test]
    async fn deleting_last_run_drops_the_entry() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        let run = create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30),
        )
        .await
        .unwrap();
        assert!(totals(&fixture, 7).await.is_some());

        delete_run(&fixture.store, &policy, fixture.competition_id, run.run_number, 7)
            .await
            .unwrap();
        assert!(totals(&fixture, 7).await.is_none());
    }

    #[tokio::test]
    async fn run_for_unknown_participant_is_rejected() {
        let fixture = Fixture::junior_zone_a().await;
        let err = create_run(
            &fixture.store,
            &ScoringPolicy::default(),
            run_input(fixture.competition_id, 404, "A", DOOR1, 0, 30),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            StorageError::ParticipantNotFoundForRun { dossard: 404, .. }
        ));
    }

    #[tokio::test]
    async fn missing_scale_follows_live_policy() {
        let fixture = Fixture::junior_zone_a().await;
        let strict = ScoringPolicy::default();
        let err = create_run(
            &fixture.store,
            &strict,
            run_input(fixture.competition_id, 7, "Z", DOOR1, 0, 30),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::ScaleNotFound { .. }));
        assert!(
            fixture
                .store
                .list_runs_by_dossard(fixture.competition_id, 7)
                .await
                .unwrap()
                .is_empty()
        );

        let lenient = ScoringPolicy {
            live_missing_scale: MissingScalePolicy::Skip,
            ..ScoringPolicy::default()
        };
        create_run(
            &fixture.store,
            &lenient,
            run_input(fixture.competition_id, 7, "Z", DOOR1, 0, 30),
        )
        .await
        .unwrap();
        assert!(totals(&fixture, 7).await.is_none());
    }

    #[tokio::test]
    async fn run_is_scored_with_the_participant_category() {
        let fixture = Fixture::junior_zone_a().await;
        fixture.add_participant(8, "senior", Gender::F).await;
        let err = create_run(
            &fixture.store,
            &ScoringPolicy::default(),
            run_input(fixture.competition_id, 8, "A", DOOR1, 0, 30),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            StorageError::ScaleNotFound { ref category, .. } if category == "senior"
        ));
    }

    #[tokio::test]
    async fn missing_runs_are_not_found() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();

        let get = get_run(&fixture.store, fixture.competition_id, 1, 7).await;
        assert!(matches!(get, Err(StorageError::NotFound(Resource::Run))));

        let delete = delete_run(&fixture.store, &policy, fixture.competition_id, 1, 7).await;
        assert!(matches!(delete, Err(StorageError::NotFound(Resource::Run))));

        let update = update_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 0).into_run(3),
        )
        .await;
        assert!(matches!(update, Err(StorageError::NotFound(Resource::Run))));
    }

    #[tokio::test]
    async fn details_fall_back_to_empty_referee_names() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", DOOR1, 0, 30),
        )
        .await
        .unwrap();
        let mut orphan = run_input(fixture.competition_id, 7, "A", NONE, 0, 30);
        orphan.referee_id = 9999;
        create_run(&fixture.store, &policy, orphan).await.unwrap();

        let details =
            list_runs_by_dossard_with_details(&fixture.store, fixture.competition_id, 7)
                .await
                .unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].referee_last_name, "Referee");
        assert_eq!(details[1].referee_first_name, "");
        assert_eq!(details[1].referee_last_name, "");
    }
}
