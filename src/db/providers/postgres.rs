use async_trait::async_trait;

use super::registry::{BackendKind, DbProvider};

pub struct PostgresProvider;

#[async_trait]
impl DbProvider for PostgresProvider {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    fn accepts(&self, url: &str) -> bool {
        let url = url.trim().to_ascii_lowercase();
        url.starts_with("postgres://") || url.starts_with("postgresql://")
    }
}
