//! Live standings: one entry per participant with at least one scored run.
//!
//! A new run can be folded in incrementally (see
//! [`ScoringPolicy::incremental_liveranking`]); every other mutation rebuilds
//! the participant's entry from the run ledger so stored totals always equal
//! the sum over the current runs.

use crate::dto::common::Page;
use crate::error::{Resource, Result, StorageError};
use crate::models::{Gender, LiverankingEntry, Participant, Run, RunTotals};
use crate::store::{LiverankingQuery, Store};

use super::policy::ScoringPolicy;
use super::scoring::{ScaleIndex, totals_for_runs};

#[derive(Debug)]
pub struct LiverankingPage {
    pub entries: Vec<LiverankingEntry>,
    pub total: i64,
    pub page: Page,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct RebuildSummary {
    pub updated: usize,
    pub removed: usize,
}

/// Folds one freshly created run into the standings.
pub async fn record_new_run(
    store: &dyn Store,
    policy: &ScoringPolicy,
    participant: &Participant,
    run: &Run,
    points: Option<i32>,
) -> Result<Option<LiverankingEntry>> {
    if !policy.incremental_liveranking {
        return recompute_entry(store, policy, run.competition_id, run.dossard).await;
    }

    let Some(points) = points else {
        return store
            .get_liveranking(run.competition_id, run.dossard)
            .await;
    };

    let delta = LiverankingEntry::new(
        participant,
        RunTotals::single(points, run.penalty, run.chrono_sec),
    );
    let entry = store.add_to_liveranking(&delta).await?;
    tracing::debug!(
        competition_id = run.competition_id,
        dossard = run.dossard,
        runs = entry.totals.number_of_runs,
        points = entry.totals.total_points,
        "Liveranking entry incremented"
    );
    Ok(Some(entry))
}

/// Rebuilds a participant's entry from all of their current runs, removing
/// the entry when no scored run is left.
pub async fn recompute_entry(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    dossard: i32,
) -> Result<Option<LiverankingEntry>> {
    let participant = store.get_participant(competition_id, dossard).await?;
    let runs = store.list_runs_by_dossard(competition_id, dossard).await?;
    let scales = ScaleIndex::new(store.list_scales(competition_id).await?);

    let totals = totals_for_runs(
        &runs,
        &participant.category,
        &scales,
        policy.recompute_missing_scale,
    )?;

    if totals.is_empty() {
        let removed = store.delete_liveranking(competition_id, dossard).await?;
        if removed {
            tracing::info!(competition_id, dossard, "Liveranking entry removed");
        }
        return Ok(None);
    }

    let entry = LiverankingEntry::new(&participant, totals);
    store.put_liveranking(&entry).await?;
    tracing::debug!(
        competition_id,
        dossard,
        runs = totals.number_of_runs,
        points = totals.total_points,
        "Liveranking entry recomputed"
    );
    Ok(Some(entry))
}

/// Recomputes every participant of the competition from the run ledger.
pub async fn rebuild_competition(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
) -> Result<RebuildSummary> {
    store.get_competition(competition_id).await?;

    let mut summary = RebuildSummary::default();
    for participant in store.list_participants(competition_id).await? {
        match recompute_entry(store, policy, competition_id, participant.dossard_number).await? {
            Some(_) => summary.updated += 1,
            None => summary.removed += 1,
        }
    }

    tracing::info!(
        competition_id,
        updated = summary.updated,
        without_runs = summary.removed,
        "Liveranking rebuilt"
    );
    Ok(summary)
}

/// Copies the participant's current identity fields into their entry,
/// keeping the totals.
pub async fn refresh_denormalized_fields(
    store: &dyn Store,
    competition_id: i32,
    dossard: i32,
) -> Result<LiverankingEntry> {
    let entry = store
        .get_liveranking(competition_id, dossard)
        .await?
        .ok_or(StorageError::NotFound(Resource::Liveranking))?;
    let participant = store.get_participant(competition_id, dossard).await?;

    let refreshed = LiverankingEntry::new(&participant, entry.totals);
    store.put_liveranking(&refreshed).await?;
    Ok(refreshed)
}

pub async fn list_liveranking(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    page: Page,
) -> Result<LiverankingPage> {
    list(store, policy, competition_id, None, page).await
}

pub async fn list_liveranking_by_category_and_gender(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    category: &str,
    gender: Gender,
    page: Page,
) -> Result<LiverankingPage> {
    if category.trim().is_empty() {
        return Err(StorageError::InvalidInput(
            "category and gender are both required".to_string(),
        ));
    }
    let filter = Some((category.trim().to_string(), gender));
    list(store, policy, competition_id, filter, page).await
}

async fn list(
    store: &dyn Store,
    policy: &ScoringPolicy,
    competition_id: i32,
    filter: Option<(String, Gender)>,
    page: Page,
) -> Result<LiverankingPage> {
    store.get_competition(competition_id).await?;

    let query = LiverankingQuery {
        competition_id,
        filter,
        ordering: policy.live_ordering,
        offset: page.offset(),
        limit: page.limit(),
    };
    let (entries, total) = store.list_liveranking(&query).await?;

    Ok(LiverankingPage {
        entries,
        total,
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::services::run_ledger;
    use crate::store::{LiverankingStore, ParticipantStore};
    use crate::test_support::{Fixture, run_input};

    async fn standings(store: &InMemoryStore, competition_id: i32) -> Vec<(i32, i32)> {
        let page = list_liveranking(
            store,
            &ScoringPolicy::default(),
            competition_id,
            Page::from_params(Some(1), Some(100)),
        )
        .await
        .unwrap();
        page.entries
            .iter()
            .map(|e| (e.dossard_number, e.totals.total_points))
            .collect()
    }

    #[tokio::test]
    async fn incremental_and_recompute_paths_agree() {
        let runs = [
            ([true, false, false, false, false, false], 0, 40),
            ([true, true, false, false, false, false], 5, 35),
            ([false, false, false, false, false, true], 0, 50),
        ];

        let mut results = Vec::new();
        for incremental in [true, false] {
            let fixture = Fixture::junior_zone_a().await;
            let policy = ScoringPolicy {
                incremental_liveranking: incremental,
                ..ScoringPolicy::default()
            };
            for (doors, penalty, chrono) in runs {
                run_ledger::create_run(
                    &fixture.store,
                    &policy,
                    run_input(fixture.competition_id, 7, "A", doors, penalty, chrono),
                )
                .await
                .unwrap();
            }
            let entry = fixture
                .store
                .get_liveranking(fixture.competition_id, 7)
                .await
                .unwrap()
                .unwrap();
            let recomputed = recompute_entry(&fixture.store, &policy, fixture.competition_id, 7)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(entry, recomputed);
            results.push(entry);
        }
        assert_eq!(results[0], results[1]);
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        run_ledger::create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", [true; 6], 2, 30),
        )
        .await
        .unwrap();

        let first = recompute_entry(&fixture.store, &policy, fixture.competition_id, 7)
            .await
            .unwrap();
        let second = recompute_entry(&fixture.store, &policy, fixture.competition_id, 7)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn pages_cover_every_entry_once_in_order() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        for dossard in 1..=7 {
            if dossard != 7 {
                fixture.add_participant(dossard, "junior", Gender::H).await;
            }
            let doors = [dossard % 2 == 0, false, false, false, false, false];
            run_ledger::create_run(
                &fixture.store,
                &policy,
                run_input(fixture.competition_id, dossard, "A", doors, dossard, 60),
            )
            .await
            .unwrap();
        }

        let full = standings(&fixture.store, fixture.competition_id).await;
        assert_eq!(full.len(), 7);

        let mut paged = Vec::new();
        let mut ranks = Vec::new();
        for page_number in 1..=3 {
            let page = Page::from_params(Some(page_number), Some(3));
            let result = list_liveranking(&fixture.store, &policy, fixture.competition_id, page)
                .await
                .unwrap();
            assert_eq!(result.total, 7);
            for (i, entry) in result.entries.iter().enumerate() {
                ranks.push(page.rank_of(i));
                paged.push((entry.dossard_number, entry.totals.total_points));
            }
        }
        assert_eq!(paged, full);
        assert_eq!(ranks, (1..=7).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn live_listing_breaks_ties_on_longer_time_first() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        fixture.add_participant(8, "junior", Gender::H).await;
        for (dossard, chrono) in [(7, 40), (8, 90)] {
            run_ledger::create_run(
                &fixture.store,
                &policy,
                run_input(fixture.competition_id, dossard, "A", [true; 6], 0, chrono),
            )
            .await
            .unwrap();
        }

        let order: Vec<i32> = standings(&fixture.store, fixture.competition_id)
            .await
            .into_iter()
            .map(|(d, _)| d)
            .collect();
        assert_eq!(order, vec![8, 7]);
    }

    #[tokio::test]
    async fn category_filter_matches_participant_record() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        fixture.add_participant(8, "junior", Gender::F).await;
        for dossard in [7, 8] {
            run_ledger::create_run(
                &fixture.store,
                &policy,
                run_input(fixture.competition_id, dossard, "A", [true; 6], 0, 10),
            )
            .await
            .unwrap();
        }

        let women = list_liveranking_by_category_and_gender(
            &fixture.store,
            &policy,
            fixture.competition_id,
            "junior",
            Gender::F,
            Page::default(),
        )
        .await
        .unwrap();
        assert_eq!(women.total, 1);
        assert_eq!(women.entries[0].dossard_number, 8);

        let blank = list_liveranking_by_category_and_gender(
            &fixture.store,
            &policy,
            fixture.competition_id,
            " ",
            Gender::F,
            Page::default(),
        )
        .await;
        assert!(matches!(blank, Err(StorageError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn participant_edits_need_an_explicit_refresh() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        run_ledger::create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", [true; 6], 0, 10),
        )
        .await
        .unwrap();

        let mut renamed = fixture
            .store
            .get_participant(fixture.competition_id, 7)
            .await
            .unwrap();
        renamed.last_name = "Durand-Martin".to_string();
        fixture.store.update_participant(&renamed).await.unwrap();

        let stale = fixture
            .store
            .get_liveranking(fixture.competition_id, 7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stale.last_name, "Durand");

        let refreshed = refresh_denormalized_fields(&fixture.store, fixture.competition_id, 7)
            .await
            .unwrap();
        assert_eq!(refreshed.last_name, "Durand-Martin");
        assert_eq!(refreshed.totals, stale.totals);
    }

    #[tokio::test]
    async fn rebuild_repairs_a_desynchronised_entry() {
        let fixture = Fixture::junior_zone_a().await;
        let policy = ScoringPolicy::default();
        run_ledger::create_run(
            &fixture.store,
            &policy,
            run_input(fixture.competition_id, 7, "A", [true; 6], 0, 10),
        )
        .await
        .unwrap();

        let mut corrupted = fixture
            .store
            .get_liveranking(fixture.competition_id, 7)
            .await
            .unwrap()
            .unwrap();
        corrupted.totals.total_points = 999;
        fixture.store.put_liveranking(&corrupted).await.unwrap();
        fixture.add_participant(8, "junior", Gender::H).await;

        let summary = rebuild_competition(&fixture.store, &policy, fixture.competition_id)
            .await
            .unwrap();
        assert_eq!(
            summary,
            RebuildSummary {
                updated: 1,
                removed: 1
            }
        );
        assert_eq!(
            standings(&fixture.store, fixture.competition_id).await,
            vec![(7, 10)]
        );
    }

    #[tokio::test]
    async fn listing_unknown_competition_is_not_found() {
        let fixture = Fixture::junior_zone_a().await;
        let result =
            list_liveranking(&fixture.store, &ScoringPolicy::default(), 99, Page::default()).await;
        assert!(matches!(
            result,
            Err(StorageError::NotFound(Resource::Competition))
        ));
    }
}
