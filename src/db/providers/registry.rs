use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::{Result, bail};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::DatabaseConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Postgres,
    Sqlite,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Postgres => "postgres",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn accepts(&self, url: &str) -> bool;

    /// Pool options for `cfg`. Backends override this to clamp pool sizes.
    fn options(&self, cfg: &DatabaseConfig) -> ConnectOptions {
        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_idle)
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(false);
        options
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        Ok(Database::connect(self.options(cfg)).await?)
    }

    async fn prepare(&self, _db: &DatabaseConnection) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct DbProviders {
    by_kind: HashMap<BackendKind, Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn register(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        let kind = provider.kind();
        if self.by_kind.contains_key(&kind) {
            bail!("database provider already registered: {}", kind.name());
        }
        self.by_kind.insert(kind, provider);
        Ok(self)
    }

    pub fn resolve(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        self.by_kind
            .values()
            .find(|provider| provider.accepts(url))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported database url '{}'; expected postgres://, postgresql:// or sqlite:",
                    redact(url)
                )
            })
    }
}

/// Keeps the scheme and drops credentials and hosts from log output.
fn redact(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.split_once("://").or_else(|| trimmed.split_once(':')) {
        Some((scheme, _)) => format!("{scheme}:<redacted>"),
        None => "<invalid-url>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{BackendKind, DbProvider, DbProviders, redact};

    struct PrefixProvider {
        kind: BackendKind,
        prefix: &'static str,
    }

    #[async_trait]
    impl DbProvider for PrefixProvider {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        fn accepts(&self, url: &str) -> bool {
            url.starts_with(self.prefix)
        }
    }

    fn sqlite() -> Arc<PrefixProvider> {
        Arc::new(PrefixProvider {
            kind: BackendKind::Sqlite,
            prefix: "sqlite:",
        })
    }

    #[test]
    fn duplicate_registration_fails() {
        let err = DbProviders::default()
            .register(sqlite())
            .expect("first registration should succeed")
            .register(sqlite())
            .err()
            .expect("second registration should fail");

        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn resolves_by_url_prefix() {
        let providers = DbProviders::default()
            .register(sqlite())
            .expect("sqlite should register")
            .register(Arc::new(PrefixProvider {
                kind: BackendKind::Postgres,
                prefix: "postgres://",
            }))
            .expect("postgres should register");

        let resolved = providers
            .resolve("sqlite::memory:")
            .expect("sqlite url should resolve");
        assert_eq!(resolved.kind(), BackendKind::Sqlite);

        let err = providers
            .resolve("mysql://root:pw@localhost/club")
            .err()
            .expect("mysql is unsupported");
        assert!(err.to_string().contains("unsupported database url"));
        assert!(!err.to_string().contains("pw@localhost"));
    }

    #[test]
    fn redaction_keeps_only_scheme() {
        assert_eq!(redact("postgres://u:p@h/db"), "postgres:<redacted>");
        assert_eq!(redact("sqlite::memory:"), "sqlite:<redacted>");
        assert_eq!(redact("nonsense"), "<invalid-url>");
    }
}
