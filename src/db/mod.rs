use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::Path;
use std::sync::Arc;

use crate::adapters::{InMemoryTransactionRepository, PostgresTransactionRepository};
use crate::config::{Config, StorageBackend};
use crate::ports::TransactionRepository;

pub const MIGRATIONS_DIR: &str = "./migrations";

pub async fn create_pool(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(config.require_database_url()?)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool, dir: &Path) -> anyhow::Result<()> {
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;
    tracing::info!(dir = %dir.display(), "Database migrations completed");
    Ok(())
}

/// Builds the configured transaction store. For Postgres, migrations are applied
/// first when `migrate` is set.
pub async fn build_repository(
    config: &Config,
    migrate: bool,
) -> anyhow::Result<Arc<dyn TransactionRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory transaction store; data is lost on restart");
            Ok(Arc::new(InMemoryTransactionRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = create_pool(config).await?;
            if migrate {
                run_migrations(&pool, Path::new(MIGRATIONS_DIR)).await?;
            }
            Ok(Arc::new(PostgresTransactionRepository::new(pool)))
        }
    }
}
