use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

/// Access-token claims issued by the identity collaborator. `sub` is the
/// member id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn member_id(&self) -> Result<Uuid, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Token subject is not a member id"))
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn make_access_claims(member_id: &Uuid, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    Claims {
        sub: member_id.to_string(),
        iat,
        exp: iat + ttl_secs,
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal_with_source("Token encoding failed", err))
}

pub fn decode_token(keys: &JwtKeys, token: &str, leeway_secs: u64) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = leeway_secs;

    decode::<Claims>(token, &keys.dec, &validation)
        .map(|data| data.claims)
        .map_err(AppError::from)
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::unauthorized(format!("Invalid or expired token: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use uuid::Uuid;

    use super::{Claims, JwtKeys, decode_token, encode_token, make_access_claims};

    #[test]
    fn makes_claims_with_member_subject_and_ttl() {
        let member_id = Uuid::new_v4();
        let claims = make_access_claims(&member_id, 60);

        assert_eq!(claims.member_id().expect("subject should parse"), member_id);
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn round_trips_through_the_same_secret() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims(&Uuid::new_v4(), 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let decoded = decode_token(&keys, &token, 0).expect("token should decode");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_token_signed_with_another_secret() {
        let claims = make_access_claims(&Uuid::new_v4(), 600);
        let token = encode_token(&JwtKeys::from_secret(b"issuer-secret"), &claims)
            .expect("token should encode");

        let err = decode_token(&JwtKeys::from_secret(b"other-secret"), &token, 0)
            .expect_err("signature should not verify");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(err.message().starts_with("Invalid or expired token:"));
    }

    #[test]
    fn non_uuid_subject_is_unauthorized() {
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            exp: 0,
            iat: 0,
        };
        let err = claims.member_id().expect_err("subject should not parse");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
