use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::builtin_providers;
use crate::config::DatabaseConfig;

pub const ENTITY_REGISTRY: &str = "club_hub::db::entities::*";

/// Opens the pool through the backend matching `cfg.url`, applies backend
/// session settings and, when enabled, syncs tables from the entities.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let provider = builtin_providers()?.resolve(&cfg.url)?;
    let db = provider.connect(cfg).await?;
    provider.prepare(&db).await?;
    info!(backend = provider.kind().name(), "database connected");

    if cfg.sync_schema {
        sync_schema(&db).await?;
    }
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("syncing database schema from entities");
    db.get_schema_registry(ENTITY_REGISTRY).sync(db).await?;
    Ok(())
}
