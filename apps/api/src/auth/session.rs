//! Redis session store and the auth extractors.
//!
//! A session is an opaque UUID token mapped to `{user_id, role}` with a
//! TTL. Roles gate which routes a client may reach and nothing else.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::state::AppState;

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Creates a session and returns its bearer token.
pub async fn create_session(
    state: &AppState,
    user_id: Uuid,
    role: UserRole,
) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    let data = serde_json::to_string(&SessionData { user_id, role })
        .map_err(|e| AppError::Internal(e.into()))?;
    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    let _: () = conn
        .set_ex(session_key(&token), data, state.config.session_ttl_secs)
        .await?;
    Ok(token)
}

pub async fn get_session(state: &AppState, token: &str) -> Result<Option<SessionData>, AppError> {
    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    let raw: Option<String> = conn.get(session_key(token)).await?;
    match raw {
        // A stored value that fails to parse is treated as no session.
        Some(raw) => Ok(serde_json::from_str(&raw).ok()),
        None => Ok(None),
    }
}

pub async fn delete_session(state: &AppState, token: &str) -> Result<(), AppError> {
    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    let _: () = conn.del(session_key(token)).await?;
    Ok(())
}

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

/// Any authenticated session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts)?;
        let session = get_session(state, &token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser {
            user_id: session.user_id,
            role: session.role,
            token,
        })
    }
}

/// An authenticated session whose role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/jobs");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer abc-123"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc-123");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let parts = parts_with_auth(None);
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwdw=="));
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_empty_bearer_rejected() {
        let parts = parts_with_auth(Some("Bearer "));
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_session_data_round_trip() {
        let data = SessionData {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, data.user_id);
        assert_eq!(back.role, UserRole::Admin);
    }
}
