use async_trait::async_trait;
use sqlx::PgPool;

use crate::Database;
use crate::error::{Resource, Result, StorageError};
use crate::models::Participant;
use crate::store::ParticipantStore;

const COLUMNS: &str =
    "competition_id, dossard_number, first_name, last_name, category, gender, club";

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, competition_id: i32, dossard: i32) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {COLUMNS} FROM participants WHERE competition_id = $1 AND dossard_number = $2"
        ))
        .bind(competition_id)
        .bind(dossard)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::Participant))?;

        Ok(participant)
    }

    pub async fn list(&self, competition_id: i32) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {COLUMNS} FROM participants WHERE competition_id = $1 ORDER BY dossard_number"
        ))
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    pub async fn list_by_category(
        &self,
        competition_id: i32,
        category: &str,
    ) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM participants
            WHERE competition_id = $1 AND category = $2
            ORDER BY dossard_number
            "#
        ))
        .bind(competition_id)
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    pub async fn create(&self, participant: &Participant) -> Result<Participant> {
        let created = sqlx::query_as::<_, Participant>(&format!(
            r#"
            INSERT INTO participants ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(participant.competition_id)
        .bind(participant.dossard_number)
        .bind(&participant.first_name)
        .bind(&participant.last_name)
        .bind(&participant.category)
        .bind(participant.gender.as_str())
        .bind(&participant.club)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match StorageError::from(e) {
            err if err.is_unique_violation() => StorageError::ConstraintViolation(format!(
                "dossard {} already exists in competition {}",
                participant.dossard_number, participant.competition_id
            )),
            err if err.is_foreign_key_violation() => {
                StorageError::NotFound(Resource::Competition)
            }
            err => err,
        })?;

        Ok(created)
    }

    pub async fn update(&self, participant: &Participant) -> Result<Participant> {
        let updated = sqlx::query_as::<_, Participant>(&format!(
            r#"
            UPDATE participants
            SET first_name = $3, last_name = $4, category = $5, gender = $6, club = $7
            WHERE competition_id = $1 AND dossard_number = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(participant.competition_id)
        .bind(participant.dossard_number)
        .bind(&participant.first_name)
        .bind(&participant.last_name)
        .bind(&participant.category)
        .bind(participant.gender.as_str())
        .bind(&participant.club)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::Participant))?;

        Ok(updated)
    }

    /// Runs and the liveranking entry go with it through `ON DELETE CASCADE`.
    pub async fn delete(&self, competition_id: i32, dossard: i32) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM participants WHERE competition_id = $1 AND dossard_number = $2")
                .bind(competition_id)
                .bind(dossard)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(Resource::Participant));
        }

        Ok(())
    }
}

#[async_trait]
impl ParticipantStore for Database {
    async fn get_participant(&self, competition_id: i32, dossard: i32) -> Result<Participant> {
        ParticipantRepository::new(self.pool())
            .find(competition_id, dossard)
            .await
    }

    async fn create_participant(&self, participant: &Participant) -> Result<Participant> {
        ParticipantRepository::new(self.pool())
            .create(participant)
            .await
    }

    async fn update_participant(&self, participant: &Participant) -> Result<Participant> {
        ParticipantRepository::new(self.pool())
            .update(participant)
            .await
    }

    async fn delete_participant(&self, competition_id: i32, dossard: i32) -> Result<()> {
        ParticipantRepository::new(self.pool())
            .delete(competition_id, dossard)
            .await
    }

    async fn list_participants(&self, competition_id: i32) -> Result<Vec<Participant>> {
        ParticipantRepository::new(self.pool())
            .list(competition_id)
            .await
    }

    async fn list_participants_by_category(
        &self,
        competition_id: i32,
        category: &str,
    ) -> Result<Vec<Participant>> {
        ParticipantRepository::new(self.pool())
            .list_by_category(competition_id, category)
            .await
    }
}
