//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresMessageLog` - Conversations and their message log
//! - `PostgresAssignmentRepository` - Story assignments
//!
//! [`connect`] builds the shared pool from [`DatabaseConfig`] and, when asked
//! to, applies the embedded migrations from `migrations/`.

mod assignment_repository;
mod message_log;

pub use assignment_repository::PostgresAssignmentRepository;
pub use message_log::PostgresMessageLog;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

/// Opens a connection pool and optionally runs migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(pool)
}
