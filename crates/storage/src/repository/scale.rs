use async_trait::async_trait;
use sqlx::PgPool;

use crate::Database;
use crate::error::{Resource, Result, StorageError};
use crate::models::{Scale, ZoneInfo};
use crate::store::ScaleStore;

const COLUMNS: &str = "competition_id, category, zone, points_door1, points_door2, \
                       points_door3, points_door4, points_door5, points_door6";

pub struct ScaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScaleRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        competition_id: i32,
        category: &str,
        zone: &str,
    ) -> Result<Option<Scale>> {
        let scale = sqlx::query_as::<_, Scale>(&format!(
            "SELECT {COLUMNS} FROM scales WHERE competition_id = $1 AND category = $2 AND zone = $3"
        ))
        .bind(competition_id)
        .bind(category)
        .bind(zone)
        .fetch_optional(self.pool)
        .await?;

        Ok(scale)
    }

    pub async fn list(&self, competition_id: i32) -> Result<Vec<Scale>> {
        let scales = sqlx::query_as::<_, Scale>(&format!(
            "SELECT {COLUMNS} FROM scales WHERE competition_id = $1 ORDER BY category, zone"
        ))
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(scales)
    }

    pub async fn list_zones(&self, competition_id: i32) -> Result<Vec<ZoneInfo>> {
        let zones = sqlx::query_as::<_, ZoneInfo>(
            r#"
            SELECT DISTINCT category, zone
            FROM scales
            WHERE competition_id = $1
            ORDER BY category, zone
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(zones)
    }

    pub async fn create(&self, scale: &Scale) -> Result<Scale> {
        let points = scale.points;
        let created = sqlx::query_as::<_, Scale>(&format!(
            r#"
            INSERT INTO scales ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(scale.competition_id)
        .bind(&scale.category)
        .bind(&scale.zone)
        .bind(points.points_door1)
        .bind(points.points_door2)
        .bind(points.points_door3)
        .bind(points.points_door4)
        .bind(points.points_door5)
        .bind(points.points_door6)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match StorageError::from(e) {
            err if err.is_unique_violation() => StorageError::ConstraintViolation(format!(
                "scale for category '{}' and zone '{}' already exists",
                scale.category, scale.zone
            )),
            err if err.is_foreign_key_violation() => {
                StorageError::NotFound(Resource::Competition)
            }
            err => err,
        })?;

        Ok(created)
    }

    pub async fn update(&self, scale: &Scale) -> Result<Scale> {
        let points = scale.points;
        let updated = sqlx::query_as::<_, Scale>(&format!(
            r#"
            UPDATE scales
            SET points_door1 = $4, points_door2 = $5, points_door3 = $6,
                points_door4 = $7, points_door5 = $8, points_door6 = $9
            WHERE competition_id = $1 AND category = $2 AND zone = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(scale.competition_id)
        .bind(&scale.category)
        .bind(&scale.zone)
        .bind(points.points_door1)
        .bind(points.points_door2)
        .bind(points.points_door3)
        .bind(points.points_door4)
        .bind(points.points_door5)
        .bind(points.points_door6)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::Scale))?;

        Ok(updated)
    }

    pub async fn delete(&self, competition_id: i32, category: &str, zone: &str) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM scales WHERE competition_id = $1 AND category = $2 AND zone = $3",
        )
        .bind(competition_id)
        .bind(category)
        .bind(zone)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(Resource::Scale));
        }

        Ok(())
    }
}

#[async_trait]
impl ScaleStore for Database {
    async fn find_scale(
        &self,
        competition_id: i32,
        category: &str,
        zone: &str,
    ) -> Result<Option<Scale>> {
        ScaleRepository::new(self.pool())
            .find(competition_id, category, zone)
            .await
    }

    async fn list_scales(&self, competition_id: i32) -> Result<Vec<Scale>> {
        ScaleRepository::new(self.pool()).list(competition_id).await
    }

    async fn list_zones(&self, competition_id: i32) -> Result<Vec<ZoneInfo>> {
        ScaleRepository::new(self.pool())
            .list_zones(competition_id)
            .await
    }

    async fn create_scale(&self, scale: &Scale) -> Result<Scale> {
        ScaleRepository::new(self.pool()).create(scale).await
    }

    async fn update_scale(&self, scale: &Scale) -> Result<Scale> {
        ScaleRepository::new(self.pool()).update(scale).await
    }

    async fn delete_scale(&self, competition_id: i32, category: &str, zone: &str) -> Result<()> {
        ScaleRepository::new(self.pool())
            .delete(competition_id, category, zone)
            .await
    }
}
