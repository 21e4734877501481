use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::{checklist, checklist_item},
    middleware::ActingMember,
    response::{ApiResult, JsonApiResponse},
    routes::api::schedules::ScheduleResponse,
    services::{ServiceContext, checklist_service::ChecklistService},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ChecklistResponse {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct ActiveChecklistResponse {
    #[serde(flatten)]
    pub checklist: ChecklistResponse,
    pub schedule: ScheduleResponse,
}

#[derive(Debug, Serialize)]
pub struct ChecklistItemResponse {
    pub id: Uuid,
    pub checklist_id: Uuid,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/checklists/{id}", get(get_active_checklist))
        .route("/checklists/{id}/deactivate", post(deactivate_checklist))
        .route("/checklists/{id}/items", post(add_item).get(list_items))
        .route("/checklists/{id}/items/{item_id}", delete(remove_item))
        .with_state(state)
}

async fn get_active_checklist(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ActiveChecklistResponse> {
    let (checklist, schedule) = service(&state).get_active(acting.id(), &id).await?;
    JsonApiResponse::ok(ActiveChecklistResponse {
        checklist: checklist.into(),
        schedule: schedule.into(),
    })
}

async fn deactivate_checklist(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ChecklistResponse> {
    let checklist = service(&state).deactivate(acting.id(), &id).await?;
    JsonApiResponse::ok(checklist.into())
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateItemRequest>,
) -> ApiResult<ChecklistItemResponse> {
    let item = service(&state)
        .add_item(acting.id(), &id, &body.description)
        .await?;
    JsonApiResponse::created(item.into())
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<ChecklistItemResponse>> {
    let items = service(&state).list_items(acting.id(), &id).await?;
    JsonApiResponse::ok(items.into_iter().map(ChecklistItemResponse::from).collect())
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<serde_json::Value> {
    service(&state)
        .remove_item(acting.id(), &id, &item_id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "deleted", serde_json::Value::Null)
}

fn service(state: &AppState) -> ChecklistService {
    ServiceContext::from_state(state).checklist()
}

impl From<checklist::Model> for ChecklistResponse {
    fn from(model: checklist::Model) -> Self {
        Self {
            id: model.id,
            schedule_id: model.schedule_id,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<checklist_item::Model> for ChecklistItemResponse {
    fn from(model: checklist_item::Model) -> Self {
        Self {
            id: model.id,
            checklist_id: model.checklist_id,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
