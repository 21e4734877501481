use std::sync::Arc;

use axum::{Router, middleware};

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

use super::api;

pub const API_PREFIX: &str = "/api/v1";

/// Full application router: versioned API, JSON error bodies and panic
/// recovery.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(API_PREFIX, api::router(state))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}
