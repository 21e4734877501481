use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

use crate::{
    auth::jwt::{encode_token, make_access_claims},
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::router,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    cfg
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(test_config(), db)
}

/// Router over a mock database with no queued results.
pub fn mock_router() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    router(test_state(db))
}

/// Fresh in-memory SQLite database with the schema synced.
pub async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
        sync_schema: true,
    };
    connection::connect(&cfg).await
}

/// `Authorization` header value for `member_id`, valid for an hour.
pub fn bearer_for(state: &AppState, member_id: &Uuid) -> String {
    let claims = make_access_claims(member_id, 3600);
    match encode_token(&state.jwt, &claims) {
        Ok(token) => format!("Bearer {token}"),
        Err(err) => panic!("test token should encode: {err}"),
    }
}
