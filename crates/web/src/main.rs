use std::sync::Arc;

use anyhow::Context;
use storage::{Database, InMemoryStore, Store};
use tokio::net::TcpListener;
use web::config::Config;
use web::middleware::auth::TokenKeys;
use web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting liveranking API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(policy = ?config.policy, "Configuration loaded successfully");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            tracing::info!(
                "Connecting to database at: {}",
                database_url.split('@').next_back().unwrap_or("unknown")
            );
            let db = Database::with_max_connections(database_url, config.database_max_connections)
                .await
                .context("Failed to initialize database")?;
            tracing::info!("Database connection established");

            tracing::info!("Running database migrations");
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, data is kept in memory only");
            Arc::new(InMemoryStore::new())
        }
    };

    let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_issuer.clone());
    let app = web::app(AppState::new(store, config.policy, tokens));

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
