//! Authenticated-caller identity and role requirements.
//!
//! `jwt_auth_middleware` verifies the bearer token and stores an [`AuthUser`]
//! in the request extensions; handlers pull it back out with the extractors
//! below. Role checks happen at the handler boundary, against the explicit
//! `Role` value the caller carries.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use mealboard_types::Role;
use serde_json::json;
use thiserror::Error;

use super::UserId;

/// Authenticated user information from a verified JWT.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

/// Authorization errors surfaced at the handler boundary.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("{0} access required")]
    RoleRequired(&'static str),
}

impl AuthUser {
    pub fn require_moderator(&self) -> Result<(), AuthError> {
        if self.role.can_moderate() {
            Ok(())
        } else {
            Err(AuthError::RoleRequired("Moderator"))
        }
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AuthError::RoleRequired("Admin"))
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AuthError::RoleRequired(_) => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Extractor for endpoints that require an authenticated caller.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::AuthenticationRequired)
    }
}

/// Extractor for endpoints open to guests; the caller's role is
/// `Role::Guest` when no valid token was presented.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn role(&self) -> Role {
        self.0.as_ref().map(|u| u.role).unwrap_or(Role::Guest)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthUser>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: Role) -> AuthUser {
        AuthUser {
            id: UserId::from_raw(1),
            email: "gaucho@example.edu".to_string(),
            role,
        }
    }

    #[test]
    fn moderator_requirement() {
        assert!(user_with(Role::Moderator).require_moderator().is_ok());
        assert!(user_with(Role::Admin).require_moderator().is_ok());
        assert!(user_with(Role::User).require_moderator().is_err());
    }

    #[test]
    fn admin_requirement() {
        assert!(user_with(Role::Admin).require_admin().is_ok());
        assert!(user_with(Role::Moderator).require_admin().is_err());
    }

    #[test]
    fn guest_role_when_unauthenticated() {
        assert_eq!(MaybeUser(None).role(), Role::Guest);
        assert_eq!(MaybeUser(Some(user_with(Role::User))).role(), Role::User);
    }
}
