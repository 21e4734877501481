use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::member,
    middleware::ActingMember,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/members/me", get(get_profile).put(save_profile))
        .with_state(state)
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
) -> ApiResult<MemberResponse> {
    let service = ServiceContext::from_state(state.as_ref()).member();
    let profile = service.get_profile(acting.id()).await?;
    JsonApiResponse::ok(profile.into())
}

async fn save_profile(
    State(state): State<Arc<AppState>>,
    acting: ActingMember,
    Json(body): Json<ProfileRequest>,
) -> ApiResult<MemberResponse> {
    let service = ServiceContext::from_state(state.as_ref()).member();
    let profile = service
        .upsert_profile(acting.id(), &body.name, &body.email)
        .await?;
    JsonApiResponse::ok(profile.into())
}

impl From<member::Model> for MemberResponse {
    fn from(model: member::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}
