//! Migrate command handler.
//!
//! Migrations run over a synchronous `PgConnection` on a blocking task,
//! since the diesel migration harness is not async.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use crate::config::Settings;
use crate::db::MIGRATIONS;
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Lists pending migrations when `dry_run` is set, reverts `rollback`
    /// migrations when given, and otherwise applies everything pending.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;

        match (dry_run, rollback) {
            (true, _) => self.show_pending().await,
            (false, Some(steps)) => self.rollback(steps).await,
            (false, None) => self.apply_pending().await,
        }
    }

    async fn show_pending(&self) -> AppResult<()> {
        let pending = self
            .with_connection("check pending migrations", |conn| {
                let pending = conn.pending_migrations(MIGRATIONS).map_err(migration_error)?;
                Ok(pending.iter().map(|m| m.name().to_string()).collect::<Vec<_>>())
            })
            .await?;

        if pending.is_empty() {
            println!("✓ No pending migrations, database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("Run without --dry-run to apply them");
        }
        Ok(())
    }

    async fn apply_pending(&self) -> AppResult<()> {
        let applied = self
            .with_connection("run pending migrations", |conn| {
                let applied = conn.run_pending_migrations(MIGRATIONS).map_err(migration_error)?;
                Ok(applied.iter().map(|v| v.to_string()).collect::<Vec<_>>())
            })
            .await?;

        tracing::info!(count = applied.len(), "Migrations applied");
        if applied.is_empty() {
            println!("✓ No migrations to apply, database is up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }
        Ok(())
    }

    async fn rollback(&self, steps: u32) -> AppResult<()> {
        if steps == 0 {
            return Err(AppError::validation(
                "rollback_steps",
                "Number of rollback steps must be greater than 0",
            ));
        }

        let reverted = self
            .with_connection("revert migrations", move |conn| {
                let applied = conn.applied_migrations().map_err(migration_error)?;
                if applied.len() < steps as usize {
                    return Err(AppError::validation(
                        "rollback_steps",
                        format!(
                            "Cannot roll back {} migration(s), only {} applied",
                            steps,
                            applied.len()
                        ),
                    ));
                }

                let mut reverted = Vec::with_capacity(steps as usize);
                for _ in 0..steps {
                    let version = conn.revert_last_migration(MIGRATIONS).map_err(migration_error)?;
                    reverted.push(version.to_string());
                }
                Ok(reverted)
            })
            .await?;

        tracing::warn!(count = reverted.len(), "Migrations reverted");
        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }
        Ok(())
    }

    /// Opens a blocking connection and runs `work` on it off the runtime.
    async fn with_connection<T, F>(&self, operation: &'static str, work: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let url = self.config.database.url.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = PgConnection::establish(&url).map_err(|e| AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("Connection error: {}", e),
            })?;
            work(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

fn migration_error(e: Box<dyn std::error::Error + Send + Sync>) -> AppError {
    AppError::Database {
        operation: "migration".to_string(),
        source: anyhow::anyhow!("Migration error: {}", e),
    }
}
