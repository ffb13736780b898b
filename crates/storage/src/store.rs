//! Persistence seam used by the scoring, ranking and export services.
//!
//! Every trait is implemented by the Postgres-backed [`crate::Database`] and by
//! [`crate::memory::InMemoryStore`]. Both implementations must agree on the
//! error contract: missing rows are [`StorageError::NotFound`], uniqueness
//! failures are [`StorageError::ConstraintViolation`] or
//! [`StorageError::DuplicateRun`].
//!
//! [`StorageError::NotFound`]: crate::error::StorageError::NotFound
//! [`StorageError::ConstraintViolation`]: crate::error::StorageError::ConstraintViolation
//! [`StorageError::DuplicateRun`]: crate::error::StorageError::DuplicateRun

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Competition, Gender, LiverankingEntry, NewCompetition, NewRun, NewUser, Participant, Role,
    RoleSet, Run, RunDetails, Scale, User, ZoneInfo,
};
use crate::services::policy::LiverankingOrdering;

#[async_trait]
pub trait CompetitionStore: Send + Sync {
    async fn create_competition(&self, competition: &NewCompetition) -> Result<Competition>;
    async fn get_competition(&self, competition_id: i32) -> Result<Competition>;
    async fn list_competitions(&self) -> Result<Vec<Competition>>;
}

#[async_trait]
pub trait ScaleStore: Send + Sync {
    async fn find_scale(
        &self,
        competition_id: i32,
        category: &str,
        zone: &str,
    ) -> Result<Option<Scale>>;
    /// Ordered by category, then zone.
    async fn list_scales(&self, competition_id: i32) -> Result<Vec<Scale>>;
    async fn list_zones(&self, competition_id: i32) -> Result<Vec<ZoneInfo>>;
    async fn create_scale(&self, scale: &Scale) -> Result<Scale>;
    async fn update_scale(&self, scale: &Scale) -> Result<Scale>;
    async fn delete_scale(&self, competition_id: i32, category: &str, zone: &str) -> Result<()>;
}

#[async_trait]
pub trait ParticipantStore: Send + Sync {
    async fn get_participant(&self, competition_id: i32, dossard: i32) -> Result<Participant>;
    async fn create_participant(&self, participant: &Participant) -> Result<Participant>;
    async fn update_participant(&self, participant: &Participant) -> Result<Participant>;
    /// Also removes the participant's runs and liveranking entry.
    async fn delete_participant(&self, competition_id: i32, dossard: i32) -> Result<()>;
    /// Ordered by dossard.
    async fn list_participants(&self, competition_id: i32) -> Result<Vec<Participant>>;
    /// Ordered by dossard.
    async fn list_participants_by_category(
        &self,
        competition_id: i32,
        category: &str,
    ) -> Result<Vec<Participant>>;
}

#[async_trait]
pub trait RunStore: Send + Sync {
    /// Inserts the run, assigning `max(run_number) + 1` when the caller did
    /// not supply a positive number.
    async fn insert_run(&self, run: &NewRun) -> Result<Run>;
    async fn get_run(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<Run>;
    /// Ordered by dossard, then run number.
    async fn list_runs(&self, competition_id: i32) -> Result<Vec<Run>>;
    /// Ordered by run number.
    async fn list_runs_by_dossard(&self, competition_id: i32, dossard: i32) -> Result<Vec<Run>>;
    async fn list_runs_by_dossard_with_details(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Vec<RunDetails>>;
    /// Replaces zone, doors, penalty, chrono and referee.
    async fn update_run(&self, run: &Run) -> Result<Run>;
    async fn delete_run(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<()>;
}

/// Which slice of the standings to read.
#[derive(Debug, Clone)]
pub struct LiverankingQuery {
    pub competition_id: i32,
    pub filter: Option<(String, Gender)>,
    pub ordering: LiverankingOrdering,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait LiverankingStore: Send + Sync {
    async fn get_liveranking(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Option<LiverankingEntry>>;
    /// Adds the entry's totals onto the stored ones, creating the row when
    /// absent. Must be atomic with respect to concurrent adds.
    async fn add_to_liveranking(&self, delta: &LiverankingEntry) -> Result<LiverankingEntry>;
    /// Overwrites the stored row with `entry`.
    async fn put_liveranking(&self, entry: &LiverankingEntry) -> Result<()>;
    /// Returns whether a row was removed.
    async fn delete_liveranking(&self, competition_id: i32, dossard: i32) -> Result<bool>;
    /// Page of entries plus the total number of matching entries.
    async fn list_liveranking(
        &self,
        query: &LiverankingQuery,
    ) -> Result<(Vec<LiverankingEntry>, i64)>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User>;
    async fn get_user(&self, user_id: i32) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<User>;
    /// Adds `role` to the user's set and returns the resulting set.
    async fn grant_role(&self, user_id: i32, role: &Role) -> Result<RoleSet>;
}

/// Everything the services need from persistence.
pub trait Store:
    CompetitionStore + ScaleStore + ParticipantStore + RunStore + LiverankingStore + UserStore
{
}

impl<T> Store for T where
    T: CompetitionStore + ScaleStore + ParticipantStore + RunStore + LiverankingStore + UserStore
{
}
