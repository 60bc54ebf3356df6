//! User, alias-proposal, and admin user-management handlers.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use mealboard_types::Role;
use serde::Deserialize;

use crate::common::{AuthUser, ProposalId, UserId};
use crate::server::app::AppState;
use crate::server::error::ApiError;

use super::models::{AliasProposal, QueuedAlias, User};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeAliasRequest {
    pub proposed_alias: String,
}

/// Moderation decision parameters, `?id=&approved=`.
///
/// Both are required; they are modeled as options so a missing one yields
/// the standard 400 JSON body instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct DecisionParams {
    pub id: Option<i64>,
    pub approved: Option<bool>,
}

impl DecisionParams {
    pub fn require(&self) -> Result<(i64, bool), ApiError> {
        match (self.id, self.approved) {
            (Some(id), Some(approved)) => Ok((id, approved)),
            _ => Err(ApiError::BadRequest(
                "id and approved query parameters are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: Option<i64>,
}

impl IdParam {
    fn require(&self) -> Result<i64, ApiError> {
        self.id
            .ok_or_else(|| ApiError::BadRequest("id query parameter is required".to_string()))
    }
}

/// POST /api/currentUser/proposeAlias
pub async fn propose_alias_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Json(req): Json<ProposeAliasRequest>,
) -> Result<(StatusCode, Json<AliasProposal>), ApiError> {
    let proposed = req.proposed_alias.trim();
    if proposed.is_empty() {
        return Err(ApiError::BadRequest("proposedAlias must not be blank".to_string()));
    }

    let proposal = AliasProposal::propose(auth.id, proposed, &state.db_pool).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// GET /api/currentUser/aliasHistory
pub async fn alias_history_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AliasProposal>>, ApiError> {
    let history = AliasProposal::history_for_user(auth.id, &state.db_pool).await?;
    Ok(Json(history))
}

/// GET /api/admin/usersWithProposedAlias - the alias moderation queue.
pub async fn alias_queue_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<QueuedAlias>>, ApiError> {
    auth.require_moderator()?;
    let queue = AliasProposal::queue(&state.db_pool).await?;
    Ok(Json(queue))
}

/// PUT /api/admin/updateAliasModeration?id=&approved=
pub async fn update_alias_moderation_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<DecisionParams>,
) -> Result<Json<AliasProposal>, ApiError> {
    auth.require_moderator()?;
    let (id, approved) = params.require()?;

    let updated =
        AliasProposal::moderate(ProposalId::from_raw(id), approved, auth.id, &state.db_pool)
            .await?;
    tracing::info!(proposal_id = id, approved, moderator = %auth.id, "alias proposal moderated");
    Ok(Json(updated))
}

/// GET /api/admin/users
pub async fn list_users_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    auth.require_admin()?;
    let users = User::list_all(&state.db_pool).await?;
    Ok(Json(users))
}

/// POST /api/admin/users/toggleModerator?id=
pub async fn toggle_moderator_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<IdParam>,
) -> Result<Json<User>, ApiError> {
    auth.require_admin()?;
    let id = UserId::from_raw(params.require()?);

    let user = User::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let next = match user.role {
        Role::User => Role::Moderator,
        Role::Moderator => Role::User,
        _ => {
            return Err(ApiError::BadRequest(
                "cannot toggle moderator on an admin".to_string(),
            ))
        }
    };

    let updated = User::set_role(id, next, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(updated))
}

/// POST /api/admin/users/toggleAdmin?id=
pub async fn toggle_admin_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<IdParam>,
) -> Result<Json<User>, ApiError> {
    auth.require_admin()?;
    let id = UserId::from_raw(params.require()?);
    if id == auth.id {
        return Err(ApiError::BadRequest(
            "admins cannot demote themselves".to_string(),
        ));
    }

    let user = User::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let next = if user.role.is_admin() {
        Role::User
    } else {
        Role::Admin
    };

    let updated = User::set_role(id, next, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(updated))
}
