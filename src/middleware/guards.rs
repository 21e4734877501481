use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use uuid::Uuid;

use crate::{
    auth::{Claims, jwt::decode_token},
    error::AppError,
    state::AppState,
};

/// The member making the request, taken from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingMember(pub Uuid);

impl ActingMember {
    pub fn id(&self) -> &Uuid {
        &self.0
    }
}

impl FromRequestParts<Arc<AppState>> for ActingMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(acting) = parts.extensions.get::<ActingMember>() {
            return Ok(*acting);
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;

        let claims: Claims = decode_token(&state.jwt, token, state.config.auth.leeway_secs)?;
        let acting = ActingMember(claims.member_id()?);

        parts.extensions.insert(acting);
        Ok(acting)
    }
}
