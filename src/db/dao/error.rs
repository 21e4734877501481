use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[source] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
    #[error("{0}")]
    Conflict(String),
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// Maps a unique-index rejection to `Conflict`; every other error stays a
    /// database error.
    pub fn from_write(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(%detail, "unique constraint rejected write");
                DaoLayerError::Conflict(conflict_message.to_string())
            }
            _ => DaoLayerError::Db(err),
        }
    }
}
