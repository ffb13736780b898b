use async_trait::async_trait;
use sqlx::PgPool;

use crate::Database;
use crate::error::{Resource, Result, StorageError};
use crate::models::{NewRun, Run, RunDetails};
use crate::store::RunStore;

const COLUMNS: &str = "competition_id, dossard, run_number, zone, door1, door2, door3, door4, \
                       door5, door6, penalty, chrono_sec, referee_id";

pub struct RunRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RunRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the run in one statement. A non-positive `run_number` becomes
    /// the participant's highest run number plus one.
    pub async fn insert(&self, run: &NewRun) -> Result<Run> {
        let doors = run.doors;
        let created = sqlx::query_as::<_, Run>(&format!(
            r#"
            INSERT INTO runs ({COLUMNS})
            SELECT $1, $2,
                   CASE WHEN $3 > 0 THEN $3 ELSE COALESCE(MAX(run_number), 0) + 1 END,
                   $4, $5, $6, $7, $8, $9, $10, $11, $12, $13
            FROM runs
            WHERE competition_id = $1 AND dossard = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(run.competition_id)
        .bind(run.dossard)
        .bind(run.run_number)
        .bind(&run.zone)
        .bind(doors.door1)
        .bind(doors.door2)
        .bind(doors.door3)
        .bind(doors.door4)
        .bind(doors.door5)
        .bind(doors.door6)
        .bind(run.penalty)
        .bind(run.chrono_sec)
        .bind(run.referee_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match StorageError::from(e) {
            err if err.is_unique_violation() && run.has_explicit_number() => {
                StorageError::DuplicateRun {
                    dossard: run.dossard,
                    run_number: run.run_number,
                }
            }
            err if err.is_unique_violation() => StorageError::ConstraintViolation(format!(
                "concurrent run number assignment for dossard {}",
                run.dossard
            )),
            err if err.is_foreign_key_violation() => StorageError::ParticipantNotFoundForRun {
                competition_id: run.competition_id,
                dossard: run.dossard,
            },
            err => err,
        })?;

        Ok(created)
    }

    pub async fn find(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<Run> {
        let run = sqlx::query_as::<_, Run>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM runs
            WHERE competition_id = $1 AND run_number = $2 AND dossard = $3
            "#
        ))
        .bind(competition_id)
        .bind(run_number)
        .bind(dossard)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::Run))?;

        Ok(run)
    }

    pub async fn list(&self, competition_id: i32) -> Result<Vec<Run>> {
        let runs = sqlx::query_as::<_, Run>(&format!(
            "SELECT {COLUMNS} FROM runs WHERE competition_id = $1 ORDER BY dossard, run_number"
        ))
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(runs)
    }

    pub async fn list_by_dossard(&self, competition_id: i32, dossard: i32) -> Result<Vec<Run>> {
        let runs = sqlx::query_as::<_, Run>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM runs
            WHERE competition_id = $1 AND dossard = $2
            ORDER BY run_number
            "#
        ))
        .bind(competition_id)
        .bind(dossard)
        .fetch_all(self.pool)
        .await?;

        Ok(runs)
    }

    pub async fn list_by_dossard_with_details(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Vec<RunDetails>> {
        let runs = sqlx::query_as::<_, RunDetails>(
            r#"
            SELECT r.competition_id, r.dossard, r.run_number, r.zone,
                   r.door1, r.door2, r.door3, r.door4, r.door5, r.door6,
                   r.penalty, r.chrono_sec, r.referee_id,
                   COALESCE(u.first_name, '') AS referee_first_name,
                   COALESCE(u.last_name, '') AS referee_last_name
            FROM runs r
            LEFT JOIN users u ON u.user_id = r.referee_id
            WHERE r.competition_id = $1 AND r.dossard = $2
            ORDER BY r.run_number
            "#,
        )
        .bind(competition_id)
        .bind(dossard)
        .fetch_all(self.pool)
        .await?;

        Ok(runs)
    }

    pub async fn update(&self, run: &Run) -> Result<Run> {
        let doors = run.doors;
        let updated = sqlx::query_as::<_, Run>(&format!(
            r#"
            UPDATE runs
            SET zone = $4, door1 = $5, door2 = $6, door3 = $7, door4 = $8, door5 = $9,
                door6 = $10, penalty = $11, chrono_sec = $12, referee_id = $13
            WHERE competition_id = $1 AND dossard = $2 AND run_number = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(run.competition_id)
        .bind(run.dossard)
        .bind(run.run_number)
        .bind(&run.zone)
        .bind(doors.door1)
        .bind(doors.door2)
        .bind(doors.door3)
        .bind(doors.door4)
        .bind(doors.door5)
        .bind(doors.door6)
        .bind(run.penalty)
        .bind(run.chrono_sec)
        .bind(run.referee_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::Run))?;

        Ok(updated)
    }

    pub async fn delete(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM runs WHERE competition_id = $1 AND run_number = $2 AND dossard = $3",
        )
        .bind(competition_id)
        .bind(run_number)
        .bind(dossard)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(Resource::Run));
        }

        Ok(())
    }
}

#[async_trait]
impl RunStore for Database {
    async fn insert_run(&self, run: &NewRun) -> Result<Run> {
        RunRepository::new(self.pool()).insert(run).await
    }

    async fn get_run(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<Run> {
        RunRepository::new(self.pool())
            .find(competition_id, run_number, dossard)
            .await
    }

    async fn list_runs(&self, competition_id: i32) -> Result<Vec<Run>> {
        RunRepository::new(self.pool()).list(competition_id).await
    }

    async fn list_runs_by_dossard(&self, competition_id: i32, dossard: i32) -> Result<Vec<Run>> {
        RunRepository::new(self.pool())
            .list_by_dossard(competition_id, dossard)
            .await
    }

    async fn list_runs_by_dossard_with_details(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Vec<RunDetails>> {
        RunRepository::new(self.pool())
            .list_by_dossard_with_details(competition_id, dossard)
            .await
    }

    async fn update_run(&self, run: &Run) -> Result<Run> {
        RunRepository::new(self.pool()).update(run).await
    }

    async fn delete_run(&self, competition_id: i32, run_number: i32, dossard: i32) -> Result<()> {
        RunRepository::new(self.pool())
            .delete(competition_id, run_number, dossard)
            .await
    }
}
