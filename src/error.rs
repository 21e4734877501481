use axum::http::StatusCode;

use crate::db::dao::DaoLayerError;

/// Every failure the API reports. The transport renders it as
/// `{ "status": <code>, "message": <text> }`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::fmt::Display,
    ) -> Self {
        let message = message.into();
        tracing::error!(error = %source, "{message}");
        Self::Internal(message)
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Conflict(message) => AppError::conflict(message),
            DaoLayerError::Db(db_err) => AppError::internal_with_source(
                "Database operation failed. Please check the logs for more details",
                db_err,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn dao_not_found_maps_to_404() {
        let err = AppError::from(DaoLayerError::NotFound {
            entity: "schedule",
            id: Uuid::nil(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.message().contains("schedule"));
    }

    #[test]
    fn dao_conflict_keeps_its_message() {
        let err = AppError::from(DaoLayerError::Conflict("already assigned".to_string()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "already assigned");
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = AppError::from(DaoLayerError::Db(DbErr::Custom("secret sql".to_string())));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("secret sql"));
    }
}
