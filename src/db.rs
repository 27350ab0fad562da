use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Connect to PostgreSQL, retrying `connect_retries` times before giving up.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "connected to database");
                return Ok(pool);
            }
            Err(e) if attempt <= cfg.connect_retries => {
                warn!(
                    error = %e,
                    attempt,
                    retries = cfg.connect_retries,
                    "database connection failed; retrying"
                );
                tokio::time::sleep(cfg.retry_delay).await;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("connect to database after {attempt} attempts"));
            }
        }
    }
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    Ok(())
}
