//! Review handlers: submission, history, public listing, and the
//! moderation queue + decision endpoints.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::common::{AuthUser, MenuItemId, ReviewId};
use crate::domains::menu::models::MenuItem;
use crate::server::app::AppState;
use crate::server::error::ApiError;

use super::models::{QueuedReview, Review};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub item_id: Option<i64>,
    pub items_stars: i32,
    pub reviewer_comments: Option<String>,
    pub date_item_served: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: Option<i64>,
}

impl IdParam {
    fn require(&self) -> Result<ReviewId, ApiError> {
        self.id
            .map(ReviewId::from_raw)
            .ok_or_else(|| ApiError::BadRequest("id query parameter is required".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForItemParams {
    pub item_id: Option<i64>,
}

/// Moderation decision parameters, `?id=&approved=&moderatorComments=`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateParams {
    pub id: Option<i64>,
    pub approved: Option<bool>,
    pub moderator_comments: Option<String>,
}

fn validate_stars(stars: i32) -> Result<(), ApiError> {
    if (1..=5).contains(&stars) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "itemsStars must be between 1 and 5".to_string(),
        ))
    }
}

/// POST /api/reviews
pub async fn create_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    validate_stars(req.items_stars)?;
    let item_id = req
        .item_id
        .map(MenuItemId::from_raw)
        .ok_or_else(|| ApiError::BadRequest("itemId is required".to_string()))?;
    MenuItem::find_by_id(item_id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("menu item"))?;

    let review = Review::create(
        item_id,
        auth.id,
        req.items_stars,
        req.reviewer_comments.as_deref(),
        req.date_item_served,
        &state.db_pool,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/forItem?itemId= - approved reviews only.
pub async fn for_item_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ForItemParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let item_id = params
        .item_id
        .map(MenuItemId::from_raw)
        .ok_or_else(|| ApiError::BadRequest("itemId query parameter is required".to_string()))?;
    let reviews = Review::approved_for_item(item_id, &state.db_pool).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/mine - the caller's own history, all statuses.
pub async fn mine_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = Review::for_reviewer(auth.id, &state.db_pool).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/all
pub async fn all_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Review>>, ApiError> {
    auth.require_admin()?;
    let reviews = Review::list_all(&state.db_pool).await?;
    Ok(Json(reviews))
}

/// PUT /api/reviews?id=
///
/// Status only ever changes through moderation, so an owner may edit a
/// review only while it is still awaiting one.
pub async fn update_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<IdParam>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    validate_stars(req.items_stars)?;
    let id = params.require()?;

    let review = Review::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("review"))?;
    if review.reviewer_id != auth.id {
        return Err(ApiError::Forbidden(
            "only the reviewer may edit a review".to_string(),
        ));
    }
    if review.status.is_terminal() {
        return Err(ApiError::Conflict(format!(
            "review has already been moderated (status {})",
            review.status
        )));
    }

    let updated = Review::update(
        id,
        req.items_stars,
        req.reviewer_comments.as_deref(),
        req.date_item_served,
        &state.db_pool,
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /api/reviews?id= - owner or admin.
pub async fn delete_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<IdParam>,
) -> Result<StatusCode, ApiError> {
    let id = params.require()?;
    let review = Review::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("review"))?;
    if review.reviewer_id != auth.id && !auth.role.is_admin() {
        return Err(ApiError::Forbidden(
            "only the reviewer or an admin may delete a review".to_string(),
        ));
    }

    Review::delete(id, &state.db_pool).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/reviews/needsModeration - the review moderation queue.
pub async fn needs_moderation_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<QueuedReview>>, ApiError> {
    auth.require_moderator()?;
    let queue = Review::needs_moderation(&state.db_pool).await?;
    Ok(Json(queue))
}

/// PUT /api/reviews/moderate?id=&approved=&moderatorComments=
pub async fn moderate_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<ModerateParams>,
) -> Result<Json<Review>, ApiError> {
    auth.require_moderator()?;
    let (id, approved) = match (params.id, params.approved) {
        (Some(id), Some(approved)) => (ReviewId::from_raw(id), approved),
        _ => {
            return Err(ApiError::BadRequest(
                "id and approved query parameters are required".to_string(),
            ))
        }
    };

    let updated = Review::moderate(
        id,
        approved,
        params.moderator_comments.as_deref(),
        auth.id,
        &state.db_pool,
    )
    .await?;
    tracing::info!(review_id = %id, approved, moderator = %auth.id, "review moderated");
    Ok(Json(updated))
}
