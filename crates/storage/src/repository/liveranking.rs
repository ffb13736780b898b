use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::Database;
use crate::error::{Result, StorageError};
use crate::models::LiverankingEntry;
use crate::store::{LiverankingQuery, LiverankingStore};

const COLUMNS: &str = "competition_id, dossard_number, first_name, last_name, category, gender, \
                       number_of_runs, total_points, total_penalty, total_chrono_sec";

pub struct LiverankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LiverankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Option<LiverankingEntry>> {
        let entry = sqlx::query_as::<_, LiverankingEntry>(&format!(
            "SELECT {COLUMNS} FROM liverankings WHERE competition_id = $1 AND dossard_number = $2"
        ))
        .bind(competition_id)
        .bind(dossard)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    /// Single-statement upsert: concurrent adds for the same participant
    /// serialise on the row lock instead of racing an existence check.
    pub async fn add(&self, delta: &LiverankingEntry) -> Result<LiverankingEntry> {
        let entry = self
            .upsert(
                delta,
                r#"
                number_of_runs = liverankings.number_of_runs + EXCLUDED.number_of_runs,
                total_points = liverankings.total_points + EXCLUDED.total_points,
                total_penalty = liverankings.total_penalty + EXCLUDED.total_penalty,
                total_chrono_sec = liverankings.total_chrono_sec + EXCLUDED.total_chrono_sec
                "#,
            )
            .await
            .map_err(|e| {
                if e.is_out_of_range() {
                    StorageError::InvalidInput(
                        "liveranking totals exceed the supported range".into(),
                    )
                } else {
                    e
                }
            })?;

        Ok(entry)
    }

    pub async fn put(&self, entry: &LiverankingEntry) -> Result<()> {
        self.upsert(
            entry,
            r#"
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            category = EXCLUDED.category,
            gender = EXCLUDED.gender,
            number_of_runs = EXCLUDED.number_of_runs,
            total_points = EXCLUDED.total_points,
            total_penalty = EXCLUDED.total_penalty,
            total_chrono_sec = EXCLUDED.total_chrono_sec
            "#,
        )
        .await?;

        Ok(())
    }

    async fn upsert(
        &self,
        entry: &LiverankingEntry,
        on_conflict: &str,
    ) -> Result<LiverankingEntry> {
        let totals = entry.totals;
        let stored = sqlx::query_as::<_, LiverankingEntry>(&format!(
            r#"
            INSERT INTO liverankings ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (competition_id, dossard_number) DO UPDATE SET {on_conflict}
            RETURNING {COLUMNS}
            "#
        ))
        .bind(entry.competition_id)
        .bind(entry.dossard_number)
        .bind(&entry.first_name)
        .bind(&entry.last_name)
        .bind(&entry.category)
        .bind(entry.gender.as_str())
        .bind(totals.number_of_runs)
        .bind(totals.total_points)
        .bind(totals.total_penalty)
        .bind(totals.total_chrono_sec)
        .fetch_one(self.pool)
        .await?;

        Ok(stored)
    }

    pub async fn delete(&self, competition_id: i32, dossard: i32) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM liverankings WHERE competition_id = $1 AND dossard_number = $2")
                .bind(competition_id)
                .bind(dossard)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self, query: &LiverankingQuery) -> Result<(Vec<LiverankingEntry>, i64)> {
        let total_items = self.count(query).await?;
        let entries = self.fetch_page(query).await?;

        Ok((entries, total_items))
    }

    async fn count(&self, query: &LiverankingQuery) -> Result<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM liverankings l");
        push_filter(&mut builder, query);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    async fn fetch_page(&self, query: &LiverankingQuery) -> Result<Vec<LiverankingEntry>> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT l.competition_id, l.dossard_number, l.first_name, l.last_name,
                   l.category, l.gender, l.number_of_runs, l.total_points,
                   l.total_penalty, l.total_chrono_sec
            FROM liverankings l
            "#,
        );
        push_filter(&mut builder, query);

        builder.push(" ORDER BY ");
        builder.push(query.ordering.order_by_clause());
        builder.push(" LIMIT ");
        builder.push_bind(query.limit);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset);

        let entries = builder
            .build_query_as::<LiverankingEntry>()
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }
}

/// Category and gender are matched against the participant record, not the
/// copy held in the liveranking row.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &LiverankingQuery) {
    if let Some((category, gender)) = &query.filter {
        builder.push(
            " INNER JOIN participants p \
             ON p.competition_id = l.competition_id AND p.dossard_number = l.dossard_number",
        );
        builder.push(" WHERE l.competition_id = ");
        builder.push_bind(query.competition_id);
        builder.push(" AND p.category = ");
        builder.push_bind(category.clone());
        builder.push(" AND p.gender = ");
        builder.push_bind(gender.as_str());
    } else {
        builder.push(" WHERE l.competition_id = ");
        builder.push_bind(query.competition_id);
    }
}

#[async_trait]
impl LiverankingStore for Database {
    async fn get_liveranking(
        &self,
        competition_id: i32,
        dossard: i32,
    ) -> Result<Option<LiverankingEntry>> {
        LiverankingRepository::new(self.pool())
            .find(competition_id, dossard)
            .await
    }

    async fn add_to_liveranking(&self, delta: &LiverankingEntry) -> Result<LiverankingEntry> {
        LiverankingRepository::new(self.pool()).add(delta).await
    }

    async fn put_liveranking(&self, entry: &LiverankingEntry) -> Result<()> {
        LiverankingRepository::new(self.pool()).put(entry).await
    }

    async fn delete_liveranking(&self, competition_id: i32, dossard: i32) -> Result<bool> {
        LiverankingRepository::new(self.pool())
            .delete(competition_id, dossard)
            .await
    }

    async fn list_liveranking(
        &self,
        query: &LiverankingQuery,
    ) -> Result<(Vec<LiverankingEntry>, i64)> {
        LiverankingRepository::new(self.pool()).list(query).await
    }
}
