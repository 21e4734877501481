use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{assignments, checklists, clubs, members, schedules};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(members::router(state.clone()))
        .merge(clubs::router(state.clone()))
        .merge(schedules::router(state.clone()))
        .merge(checklists::router(state.clone()))
        .merge(assignments::router(state))
}
