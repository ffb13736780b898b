use async_trait::async_trait;
use sqlx::PgPool;

use crate::Database;
use crate::error::{Resource, Result, StorageError};
use crate::models::{Competition, NewCompetition};
use crate::store::CompetitionStore;

const COLUMNS: &str =
    "competition_id, name, description, date, location, organizer, contact, created_at";

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions, most recent first
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(&format!(
            "SELECT {COLUMNS} FROM competitions ORDER BY date DESC NULLS LAST, name ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            "SELECT {COLUMNS} FROM competitions WHERE competition_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::Competition))?;

        Ok(competition)
    }

    pub async fn create(&self, competition: &NewCompetition) -> Result<Competition> {
        let created = sqlx::query_as::<_, Competition>(&format!(
            r#"
            INSERT INTO competitions (name, description, date, location, organizer, contact)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&competition.name)
        .bind(&competition.description)
        .bind(competition.date)
        .bind(&competition.location)
        .bind(&competition.organizer)
        .bind(&competition.contact)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }
}

#[async_trait]
impl CompetitionStore for Database {
    async fn create_competition(&self, competition: &NewCompetition) -> Result<Competition> {
        CompetitionRepository::new(self.pool()).create(competition).await
    }

    async fn get_competition(&self, competition_id: i32) -> Result<Competition> {
        CompetitionRepository::new(self.pool())
            .find_by_id(competition_id)
            .await
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>> {
        CompetitionRepository::new(self.pool()).list().await
    }
}
