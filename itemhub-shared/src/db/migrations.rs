/// Embedded schema migrations
///
/// SQL files live in the workspace-level `migrations/` directory and are
/// compiled into the binary, so a deployed server never needs the files on
/// disk. Each migration is an `{version}_{name}.up.sql` /
/// `{version}_{name}.down.sql` pair.
///
/// The same [`MIGRATOR`] drives `#[sqlx::test]` in the integration tests,
/// which gives every test its own freshly migrated database.
///
/// # Example
///
/// ```no_run
/// use itemhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use itemhub_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{info, warn};

/// Schema migrations for users and items
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applies every pending migration
///
/// Already applied migrations are skipped, so running this on each start is
/// safe.
///
/// # Errors
///
/// Returns an error if a migration fails to apply or a previously applied
/// migration was edited afterwards.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Running database migrations"
    );

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrator_embeds_schema() {
        let migrations: Vec<_> = MIGRATOR.iter().collect();
        assert!(!migrations.is_empty());
        assert!(migrations
            .iter()
            .any(|m| m.description.contains("create users and items")));
    }
}
