//! Embedded schema migrations for the `notifications` table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use hirepulse_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration not yet recorded in `_sqlx_migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!(known = MIGRATOR.iter().count(), "Notification schema is current");
    Ok(())
}
