use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection};

use super::registry::{BackendKind, DbProvider};
use crate::config::DatabaseConfig;

const BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteProvider;

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl DbProvider for SqliteProvider {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn accepts(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    fn options(&self, cfg: &DatabaseConfig) -> ConnectOptions {
        let mut options = ConnectOptions::new(cfg.url.clone());
        // Every pooled connection to an in-memory database opens its own
        // empty database, so the pool is pinned to one long-lived connection.
        let (max, min) = if is_in_memory(&cfg.url) {
            (1, 1)
        } else {
            (cfg.max_connections, cfg.min_idle)
        };
        options
            .max_connections(max)
            .min_connections(min)
            .connect_timeout(std::time::Duration::from_secs(5))
            .sqlx_logging(false);
        options
    }

    async fn prepare(&self, db: &DatabaseConnection) -> Result<()> {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::is_in_memory;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://club?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://club_hub.db?mode=rwc"));
    }
}
