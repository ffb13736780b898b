pub mod dto;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

#[cfg(test)]
mod test_support;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use error::{Result, StorageError};
pub use memory::InMemoryStore;
pub use store::Store;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Postgres-backed store. Cloning shares the pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
