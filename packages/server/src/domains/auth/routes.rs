//! Login and current-user handlers.
//!
//! The identity provider sits in front of `/api/auth/login` as an external
//! collaborator; this endpoint trusts the email it is handed, upserts the
//! account, and issues the bearer token the rest of the API consumes.

use axum::extract::Extension;
use axum::Json;
use mealboard_types::Role;
use serde::{Deserialize, Serialize};

use crate::common::AuthUser;
use crate::domains::users::models::User;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login
pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }

    let mut user = User::upsert_on_login(&email, req.full_name.as_deref(), &state.db_pool).await?;

    // Configured admin emails are promoted on login.
    if !user.role.is_admin() && state.admin_emails.iter().any(|a| a.eq_ignore_ascii_case(&email)) {
        user = User::set_role(user.id, Role::Admin, &state.db_pool)
            .await?
            .ok_or(ApiError::NotFound("user"))?;
        tracing::info!(user_id = %user.id, "promoted configured admin on login");
    }

    let token = state
        .jwt_service
        .create_token(user.id, &user.email, user.role)?;

    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/currentUser
pub async fn current_user_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(auth.id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user))
}
