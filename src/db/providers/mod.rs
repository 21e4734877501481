mod postgres;
mod registry;
mod sqlite;

use std::sync::Arc;

pub use registry::{BackendKind, DbProvider, DbProviders};

use self::{postgres::PostgresProvider, sqlite::SqliteProvider};

/// Registry with every backend the service can run against.
pub fn builtin_providers() -> anyhow::Result<DbProviders> {
    DbProviders::default()
        .register(Arc::new(PostgresProvider))?
        .register(Arc::new(SqliteProvider))
}
