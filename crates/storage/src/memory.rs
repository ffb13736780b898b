//! Process-local [`Store`](crate::store::Store) with the same contract as the
//! Postgres repositories. Backs the test suites and database-less local runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Resource, Result, StorageError};
use crate::models::{
    Competition, LiverankingEntry, NewCompetition, NewRun, NewUser, Participant, Role, RoleSet,
    Run, RunDetails, Scale, User, ZoneInfo,
};
use crate::store::{
    CompetitionStore, LiverankingQuery, LiverankingStore, ParticipantStore, RunStore, ScaleStore,
    UserStore,
};

type ScaleKey = (i32, String, String);
type ParticipantKey = (i32, i32);
/// (competition, dossard, run number): iteration order is dossard, then run.
type RunKey = (i32, i32, i32);

#[derive(Default)]
struct Tables {
    next_competition_id: i32,
    next_user_id: i32,
    competitions: BTreeMap<i32, Competition>,
    users: BTreeMap<i32, User>,
    scales: BTreeMap<ScaleKey, Scale>,
    participants: BTreeMap<ParticipantKey, Participant>,
    runs: BTreeMap<RunKey, Run>,
    liverankings: BTreeMap<ParticipantKey, LiverankingEntry>,
}

impl Tables {
    fn require_competition(&self, competition_id: i32) -> Result<()> {
        if self.competitions.contains_key(&competition_id) {
            Ok(())
        } else {
            Err(StorageError::NotFound(Resource::Competition))
        }
    }

    fn runs_of(&self, competition_id: i32, dossard: i32) -> impl Iterator<Item = &Run> {
        self.runs
            .range((competition_id, dossard, i32::MIN)..=(competition_id, dossard, i32::MAX))
            .map(|(_, run)| run)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn scale_key(competition_id: i32, category: &str, zone: &str) -> ScaleKey {
    (competition_id, category.to_string(), zone.to_string())
}

#[async_trait]
impl CompetitionStore for InMemoryStore {
    async fn create_competition(&self, competition: &NewCompetition) -> Result<Competition> {
        let mut tables = self.tables.write().await;
        tables.next_competition_id += 1;
        let created = Competition {
            competition_id: tables.next_competition_id,
            name: competition.name.clone(),
            description: competition.description.clone(),
            date: competition.date,
            location: competition.location.clone(),
            organizer: competition.organizer.clone(),
            contact: competition.contact.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        tables
            .competitions
            .insert(created.competition_id, created.clone());
        Ok(created)
    }

    async fn get_competition(&self, competition_id: i32) -> Result<Competition> {
        self.tables
            .read()
            .await
            .competitions
            .get(&competition_id)
            .cloned()
            .ok_or(StorageError::NotFound(Resource::Competition))
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>> {
        let tables = self.tables.read().await;
        let mut competitions: Vec<Competition> = tables.competitions.values().cloned().collect();
        competitions.sort_by(|a, b| b.date.cmp(&a.date).then(a.name.cmp(&b.name)));
        Ok(competitions)
    }
}

#[async_trait]
impl ScaleStore for InMemoryStore {
    async fn find_scale(
        &self,
        competition_id: i32,
        category: &str,
        zone: &str,
    ) -> Result<Option<Scale>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scales
            .get(&scale_key(competition_id, category, zone))
            .cloned())
    }

    async fn list_scales(&self, competition_id: i32) -> Result<Vec<Scale>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scales
            .values()
            .filter(|s| s.competition_id == competition_id)
            .cloned()
            .collect())
    }

    async fn list_zones(&self, competition_id: i32) -> Result<Vec<ZoneInfo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scales
            .values()
            .filter(|s| s.competition_id == competition_id)
            .map(|s| ZoneInfo {
                category: s.category.clone(),
                zone: s.zone.clone(),
            })
            .collect())
    }

    async fn create_scale(&self, scale: &Scale) -> Result<Scale> {
        let mut tables = self.tables.write().await;
        tables.require_competition(scale.competition_id)?;
        let key = scale_key(scale.competition_id, &scale.category, &scale.zone);
        if tables.scales.contains_key(&key) {
            return Err(StorageError::ConstraintViolation(format!(
                "scale for category '{}' and zone '{}' already exists",
                scale.category, scale.zone
            )));
        }
        tables.scales.insert(key, scale.clone());
        Ok(scale.clone())
    }

    async fn update_scale(&self, scale: &Scale) -> Result<Scale> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .scales
            .get_mut(&scale_key(scale.competition_id, &scale.category, &scale.zone))
            .ok_or(StorageError::NotFound(Resource::Scale))?;
        stored.points = scale.points;
        Ok(stored.clone())
    }

    async fn delete_scale(&self, competition_id: i32, category: &str, zone: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .scales
            .remove(&scale_key(competition_id, category, zone))
            .map(|_| ())
            .ok_or(StorageError::NotFound(Resource::Scale))
    }
}

#[async_trait]
impl ParticipantStore for InMemoryStore {
    async fn get_participant(&self, competition_id: i32, dossard: i32) -> Result<Participant> {
        self.tables
            .read()
            .await
            .participants
            .get(&(competition_id, dossard))
            .cloned()
            .ok_or(StorageError::NotFound(Resource::Participant))
    }

    async fn create_participant(&self, participant: &Participant) -> Result<Participant> {
        let mut tables = self.tables.write().await;
        tables.require_competition(participant.competition_id)?;
        let key = (participant.competition_id, participant.dossard_number);
        if tables.participants.contains_key(&key) {
            return Err(StorageError::ConstraintViolation(format!(
                "dossard {} already exists in competition {}",
                participant.dossard_number, participant.competition_id
            )));
        }
        tables.participants.insert(key, participant.clone());
        Ok(participant.clone())
    }

    async fn update_participant(&self, participant: &Participant) -> Result<Participant> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .participants
            .get_mut(&(participant.competition_id, participant.dossard_number))
            .ok_or(StorageError::NotFound(Resource::Participant))?;
        *stored = participant.clone();
        Ok(stored.clone())
    }

    async fn delete_participant(&self, competition_id: i32, dossard: i32) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .participants
            .remove(&(competition_id, dossard))
            .ok_or(StorageError::NotFound(Resource::Participant))?;
        tables
            .runs
            .retain(|&(c, d, _), _| !(c == competition_id && d == dossard));
        tables.liverankings.remove(&(competition_id, dossard));
        Ok(())
    }

    async fn list_participants(&self, competition_id: i32) -> Result<Vec<Participant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .participants
            .values()
            .filter(|p| p.competition_id == competition_id)
            .cloned()
            .collect())
    }

    async fn list_participants_by_category(
        &self,
        competition_id: i32,
        category: &str,
    ) -> Result<Vec<Participant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .participants
            .values()
            .filter(|p| p.competition_id == competition_id && p.category == category)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RunStore for InMemoryStore {
    async fn insert_run(&self, run: &NewRun) -> Result<Run> {
        let mut tables = self.tables.write().await;
        if !tables
            .participants
            .contains_key(&(run.competition_id, run.dossard))
        {
            return Err(StorageError::ParticipantNotFoundForRun {
                competition_id: run.competition_id,
                dossard: run.dossard,
            });
        }

        let run_number = if run.has_explicit_number() {
            run.run_number
        } else {
            tables
                .runs_of(run.competition_id, run.dossard)
                .map(|r| r.run_number)
                .max()
                .unwrap_or(0)
                + 1
        };

        let key = (run.competition_id, run.dossard, run_number);
        if tables.runs.contains_key(&key) {
            return Err(StorageError::DuplicateRun {
                dossard: run.dossard,
                run_number,
            });
        }
        let created = run.clone().into_run(run_number);
        tables.runs.insert(key, created.clone());
        Ok(created)
    }

    async fn get_run(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<Run> {
        self.tables
            .read()
            .await
            .runs
            .get(&(competition_id, dossard, run_number))
            .cloned()
            .ok_or(StorageError::NotFound(Resource::Run))
    }

    async fn list_runs(&self, competition_id: i32) -> Result<Vec<Run>> {
        let tables = self.tables.read().await;
        Ok(tables
            .runs
            .values()
            .filter(|r| r.competition_id == competition_id)
            .cloned()
            .collect())
    }

    async fn list_runs_by_dossard(&self, competition_id: i32, dossard: i32) -> Result<Vec<Run>> {
        let tables = self.tables.read().await;
        Ok(tables.runs_of(competition_id, dossard).cloned().collect())
    }

    async fn list_runs_by_dossard_with_details(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Vec<RunDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .runs_of(competition_id, dossard)
            .map(|run| {
                let referee = tables.users.get(&run.referee_id);
                RunDetails {
                    run: run.clone(),
                    referee_first_name: referee.map(|u| u.first_name.clone()).unwrap_or_default(),
                    referee_last_name: referee.map(|u| u.last_name.clone()).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn update_run(&self, run: &Run) -> Result<Run> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .runs
            .get_mut(&(run.competition_id, run.dossard, run.run_number))
            .ok_or(StorageError::NotFound(Resource::Run))?;
        *stored = run.clone();
        Ok(stored.clone())
    }

    async fn delete_run(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .runs
            .remove(&(competition_id, dossard, run_number))
            .map(|_| ())
            .ok_or(StorageError::NotFound(Resource::Run))
    }
}

#[async_trait]
impl LiverankingStore for InMemoryStore {
    async fn get_liveranking(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Option<LiverankingEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.liverankings.get(&(competition_id, dossard)).cloned())
    }

    async fn add_to_liveranking(&self, delta: &LiverankingEntry) -> Result<LiverankingEntry> {
        let mut tables = self.tables.write().await;
        let key = (delta.competition_id, delta.dossard_number);
        let entry = match tables.liverankings.get(&key) {
            Some(stored) => LiverankingEntry {
                totals: stored.totals.checked_add(&delta.totals)?,
                ..stored.clone()
            },
            None => delta.clone(),
        };
        tables.liverankings.insert(key, entry.clone());
        Ok(entry)
    }

    async fn put_liveranking(&self, entry: &LiverankingEntry) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .liverankings
            .insert((entry.competition_id, entry.dossard_number), entry.clone());
        Ok(())
    }

    async fn delete_liveranking(&self, competition_id: i32, dossard: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.liverankings.remove(&(competition_id, dossard)).is_some())
    }

    async fn list_liveranking(
        &self,
        query: &LiverankingQuery,
    ) -> Result<(Vec<LiverankingEntry>, i64)> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&LiverankingEntry> = tables
            .liverankings
            .values()
            .filter(|e| e.competition_id == query.competition_id)
            .filter(|e| match &query.filter {
                None => true,
                Some((category, gender)) => tables
                    .participants
                    .get(&(e.competition_id, e.dossard_number))
                    .is_some_and(|p| &p.category == category && p.gender == *gender),
            })
            .collect();

        matching.sort_by(|a, b| {
            query
                .ordering
                .compare((&a.totals, a.dossard_number), (&b.totals, b.dossard_number))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .cloned()
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::ConstraintViolation(format!(
                "email '{}' already registered",
                user.email
            )));
        }
        tables.next_user_id += 1;
        let created = User {
            user_id: tables.next_user_id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.roles.clone(),
        };
        tables.users.insert(created.user_id, created.clone());
        Ok(created)
    }

    async fn get_user(&self, user_id: i32) -> Result<User> {
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::NotFound(Resource::User))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StorageError::NotFound(Resource::User))
    }

    async fn grant_role(&self, user_id: i32, role: &Role) -> Result<RoleSet> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(StorageError::NotFound(Resource::User))?;
        user.roles.insert(role.clone());
        Ok(user.roles.clone())
    }
}
