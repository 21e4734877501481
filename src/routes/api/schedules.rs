use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::schedule,
    error::AppError,
    middleware::ActingMember,
    response::{ApiResult, JsonApiResponse},
    routes::api::checklists::ChecklistResponse,
    services::{
        ServiceContext,
        schedule_service::{ScheduleInput, ScheduleService, ScheduleView},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub club_id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: ScheduleInput,
}

#[derive(Debug, Serialize)]
pub struct ScheduleIdResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub content: String,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub spot: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct ScheduleDetailResponse {
    #[serde(flatten)]
    pub schedule: ScheduleResponse,
    pub checklist: Option<ChecklistResponse>,
    pub can_delete: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/schedules", post(create_schedule))
        .route(
            "/schedules/{id}",
            get(get_schedule).put(modify_schedule).delete(delete_schedule),
        )
        .route("/schedules/{id}/deactivate", post(deactivate_schedule))
        .route(
            "/schedules/{id}/checklist",
            post(attach_checklist).delete(clear_checklist),
        )
        .with_state(state)
}

async fn create_schedule(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Json(body): Json<CreateScheduleRequest>,
) -> ApiResult<ScheduleIdResponse> {
    let club_id = body
        .club_id
        .ok_or_else(|| AppError::bad_request("club_id is required"))?;
    let created = service(&state)
        .create(acting.id(), &club_id, body.fields)
        .await?;
    JsonApiResponse::created(ScheduleIdResponse { id: created.id })
}

async fn get_schedule(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ScheduleDetailResponse> {
    let view = service(&state).get(acting.id(), &id).await?;
    JsonApiResponse::ok(view.into())
}

async fn modify_schedule(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
    Json(body): Json<ScheduleInput>,
) -> ApiResult<ScheduleResponse> {
    let updated = service(&state).modify(acting.id(), &id, body).await?;
    JsonApiResponse::ok(updated.into())
}

async fn deactivate_schedule(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ScheduleDetailResponse> {
    let view = service(&state).deactivate(acting.id(), &id).await?;
    JsonApiResponse::ok(view.into())
}

async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ScheduleIdResponse> {
    service(&state).delete(acting.id(), &id).await?;
    JsonApiResponse::with_status(
        axum::http::StatusCode::OK,
        "deleted",
        ScheduleIdResponse { id },
    )
}

async fn attach_checklist(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ChecklistResponse> {
    let checklist = service(&state).attach_checklist(acting.id(), &id).await?;
    JsonApiResponse::created(checklist.into())
}

async fn clear_checklist(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    service(&state).clear_checklist(acting.id(), &id).await?;
    JsonApiResponse::with_status(
        axum::http::StatusCode::OK,
        "checklist cleared",
        serde_json::Value::Null,
    )
}

fn service(state: &AppState) -> ScheduleService {
    ServiceContext::from_state(state).schedule()
}

impl From<schedule::Model> for ScheduleResponse {
    fn from(model: schedule::Model) -> Self {
        Self {
            id: model.id,
            club_id: model.club_id,
            title: model.title,
            content: model.content,
            start_date: model.start_date,
            end_date: model.end_date,
            spot: model.spot,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ScheduleView> for ScheduleDetailResponse {
    fn from(view: ScheduleView) -> Self {
        Self {
            schedule: view.schedule.into(),
            checklist: view.checklist.map(ChecklistResponse::from),
            can_delete: view.can_delete,
        }
    }
}
