//! Dining commons handlers: public browsing, admin CRUD.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::common::AuthUser;
use crate::server::app::AppState;
use crate::server::error::ApiError;

use super::models::DiningCommons;

#[derive(Debug, Deserialize)]
pub struct CodeParam {
    pub code: Option<String>,
}

impl CodeParam {
    fn require(&self) -> Result<&str, ApiError> {
        self.code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::BadRequest("code query parameter is required".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonsRequest {
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub has_sack_meal: bool,
    #[serde(default)]
    pub has_takeout_meal: bool,
    #[serde(default)]
    pub has_dining_cam: bool,
    pub latitude: f64,
    pub longitude: f64,
}

/// GET /api/diningcommons/all
pub async fn list_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<DiningCommons>>, ApiError> {
    let commons = DiningCommons::list_all(&state.db_pool).await?;
    Ok(Json(commons))
}

/// GET /api/diningcommons?code=
pub async fn get_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<CodeParam>,
) -> Result<Json<DiningCommons>, ApiError> {
    let commons = DiningCommons::find_by_code(params.require()?, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("dining commons"))?;
    Ok(Json(commons))
}

/// POST /api/diningcommons
pub async fn create_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Json(req): Json<CommonsRequest>,
) -> Result<(StatusCode, Json<DiningCommons>), ApiError> {
    auth.require_admin()?;
    let code = req
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("code is required".to_string()))?;

    if DiningCommons::find_by_code(code, &state.db_pool).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "dining commons {code:?} already exists"
        )));
    }

    let commons = DiningCommons::create(
        code,
        &req.name,
        req.has_sack_meal,
        req.has_takeout_meal,
        req.has_dining_cam,
        req.latitude,
        req.longitude,
        &state.db_pool,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(commons)))
}

/// PUT /api/diningcommons?code=
pub async fn update_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<CodeParam>,
    Json(req): Json<CommonsRequest>,
) -> Result<Json<DiningCommons>, ApiError> {
    auth.require_admin()?;
    let commons = DiningCommons::update(
        params.require()?,
        &req.name,
        req.has_sack_meal,
        req.has_takeout_meal,
        req.has_dining_cam,
        req.latitude,
        req.longitude,
        &state.db_pool,
    )
    .await?
    .ok_or(ApiError::NotFound("dining commons"))?;
    Ok(Json(commons))
}

/// DELETE /api/diningcommons?code=
pub async fn delete_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<CodeParam>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    if DiningCommons::delete(params.require()?, &state.db_pool).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("dining commons"))
    }
}
