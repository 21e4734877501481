use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::dao::PaginatedResponse,
    db::entities::{club, club_member, club_member::ClubRole},
    error::AppError,
    middleware::ActingMember,
    response::{ApiResult, JsonApiResponse},
    routes::api::schedules::ScheduleResponse,
    services::{ServiceContext, club_service::ClubService},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateClubRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub member_id: Option<Uuid>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: ClubRole,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ClubResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: Uuid,
    pub club_id: Uuid,
    pub member_id: Uuid,
    pub display_name: String,
    pub role: ClubRole,
}

#[derive(Debug, Serialize)]
pub struct CreatedClubResponse {
    #[serde(flatten)]
    pub club: ClubResponse,
    pub leader: MembershipResponse,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/clubs", post(create_club))
        .route("/clubs/{id}", get(get_club))
        .route("/clubs/{id}/members", post(add_member).get(list_members))
        .route("/clubs/{id}/schedules", get(list_schedules))
        .with_state(state)
}

async fn create_club(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Json(body): Json<CreateClubRequest>,
) -> ApiResult<CreatedClubResponse> {
    let (club, leader) = service(&state)
        .create_club(
            acting.id(),
            &body.name,
            &body.description,
            body.display_name.as_deref(),
        )
        .await?;
    JsonApiResponse::created(CreatedClubResponse {
        club: club.into(),
        leader: leader.into(),
    })
}

async fn get_club(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<ClubResponse> {
    let club = service(&state).get_club(acting.id(), &id).await?;
    JsonApiResponse::ok(club.into())
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
    Json(body): Json<AddMemberRequest>,
) -> ApiResult<MembershipResponse> {
    let member_id = body
        .member_id
        .ok_or_else(|| AppError::bad_request("member_id is required"))?;
    let membership = service(&state)
        .add_member(
            acting.id(),
            &id,
            &member_id,
            body.display_name.as_deref(),
            body.role,
        )
        .await?;
    JsonApiResponse::created(membership.into())
}

async fn list_members(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<MembershipResponse>> {
    let members = service(&state).list_members(acting.id(), &id).await?;
    JsonApiResponse::ok(members.into_iter().map(MembershipResponse::from).collect())
}

async fn list_schedules(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<ScheduleResponse>> {
    let page = service(&state)
        .list_schedules(acting.id(), &id, query.page.unwrap_or(1))
        .await?;
    JsonApiResponse::ok(page.map(ScheduleResponse::from))
}

fn service(state: &AppState) -> ClubService {
    ServiceContext::from_state(state).club()
}

impl From<club::Model> for ClubResponse {
    fn from(model: club::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

impl From<club_member::Model> for MembershipResponse {
    fn from(model: club_member::Model) -> Self {
        Self {
            role: model.club_role(),
            id: model.id,
            club_id: model.club_id,
            member_id: model.member_id,
            display_name: model.display_name,
        }
    }
}
