//! Axum route handlers for account registration and sessions.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::session::{create_session, delete_session, AuthUser};
use crate::errors::AppError;
use crate::forms::rules;
use crate::models::user::{User, UserRole};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Jobseeker
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

// ────────────────────────────────────────────────────────────────────────────
// Password hashing
// ────────────────────────────────────────────────────────────────────────────

fn hash_password(password: &str, salt: &str) -> String {
    let digest = Sha256::digest(format!("{salt}{password}").as_bytes());
    format!("{digest:x}")
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    rules::email_mandatory(&request.email).map_err(AppError::Validation)?;
    if request.full_name.trim().is_empty() {
        return Err(AppError::Validation("full_name cannot be empty".to_string()));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation(
            "an account with this email already exists".to_string(),
        ));
    }

    let salt = Uuid::new_v4().simple().to_string();
    let digest = hash_password(&request.password, &salt);
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, full_name, role, password_digest, password_salt,
                           created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.email)
    .bind(&request.full_name)
    .bind(request.role.as_str())
    .bind(&digest)
    .bind(&salt)
    .fetch_one(&state.db)
    .await?;

    let token = create_session(&state, user.id, request.role).await?;
    tracing::info!("registered {} account {}", request.role.as_str(), user.id);
    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if hash_password(&request.password, &user.password_salt) != user.password_digest {
        return Err(AppError::Unauthorized);
    }
    let role = UserRole::parse(&user.role).ok_or(AppError::Unauthorized)?;

    let token = create_session(&state, user.id, role).await?;
    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    delete_session(&state, &user.token).await?;
    Ok(Json(json!({ "logged_out": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_per_salt() {
        let a = hash_password("hunter22", "salt-a");
        let b = hash_password("hunter22", "salt-a");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_different_salt_changes_digest() {
        assert_ne!(
            hash_password("hunter22", "salt-a"),
            hash_password("hunter22", "salt-b")
        );
    }

    #[test]
    fn test_wrong_password_never_matches() {
        let digest = hash_password("correct horse", "s");
        assert_ne!(hash_password("wrong horse", "s"), digest);
    }
}
