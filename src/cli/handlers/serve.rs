//! Serve command handler.

use crate::config::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server until shutdown, or only reports the configuration
    /// when `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }
        Server::new(self.config).run().await
    }

    /// Validates and prints what the server would do, without binding or
    /// connecting.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        let pagination = &self.config.pagination;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Database: {}", self.config.database.redacted_url());
        println!(
            "✓ Page size: default {}, max {}",
            pagination.default_per_page,
            match pagination.max_per_page {
                0 => "uncapped".to_string(),
                max => max.to_string(),
            }
        );
        println!("✓ Log level: {}", self.config.logger.level);
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
