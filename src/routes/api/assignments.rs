use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::ActingMember,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        checklist_service::{AssignmentView, ChecklistService},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub club_member_id: Option<Uuid>,
    #[serde(default)]
    pub is_checked: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub is_checked: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub club_member_id: Uuid,
    pub club_member_name: String,
    pub is_checked: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/checklist-items/{item_id}/assignments",
            post(assign).get(list_assignments),
        )
        .route("/assignments/{id}", patch(toggle).delete(unassign))
        .with_state(state)
}

async fn assign(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(item_id): Path<Uuid>,
    Json(body): Json<AssignRequest>,
) -> ApiResult<AssignmentResponse> {
    let club_member_id = body
        .club_member_id
        .ok_or_else(|| AppError::bad_request("club_member_id is required"))?;
    let view = service(&state)
        .assign(acting.id(), &item_id, &club_member_id, body.is_checked)
        .await?;
    JsonApiResponse::created(view.into())
}

async fn list_assignments(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Vec<AssignmentResponse>> {
    let views = service(&state)
        .list_assignments(acting.id(), &item_id)
        .await?;
    JsonApiResponse::ok(views.into_iter().map(AssignmentResponse::from).collect())
}

async fn toggle(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
    Json(body): Json<ToggleRequest>,
) -> ApiResult<AssignmentResponse> {
    let is_checked = body
        .is_checked
        .ok_or_else(|| AppError::bad_request("is_checked is required"))?;
    let view = service(&state).toggle(acting.id(), &id, is_checked).await?;
    JsonApiResponse::ok(view.into())
}

async fn unassign(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    service(&state).unassign(acting.id(), &id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "deleted", serde_json::Value::Null)
}

fn service(state: &AppState) -> ChecklistService {
    ServiceContext::from_state(state).checklist()
}

impl From<AssignmentView> for AssignmentResponse {
    fn from(view: AssignmentView) -> Self {
        Self {
            id: view.assignment.id,
            club_member_id: view.assignment.club_member_id,
            club_member_name: view.club_member_name,
            is_checked: view.assignment.is_checked,
        }
    }
}
