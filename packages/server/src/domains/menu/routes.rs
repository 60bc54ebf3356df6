//! Menu item handlers: public browsing, admin CRUD.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::common::{AuthUser, MenuItemId};
use crate::domains::commons::models::DiningCommons;
use crate::server::app::AppState;
use crate::server::error::ApiError;

use super::models::MenuItem;

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: Option<i64>,
}

impl IdParam {
    fn require(&self) -> Result<MenuItemId, ApiError> {
        self.id
            .map(MenuItemId::from_raw)
            .ok_or_else(|| ApiError::BadRequest("id query parameter is required".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub dining_commons_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub dining_commons_code: String,
    pub name: String,
    pub station: String,
}

async fn require_commons(code: &str, state: &AppState) -> Result<(), ApiError> {
    DiningCommons::find_by_code(code, &state.db_pool)
        .await?
        .map(|_| ())
        .ok_or(ApiError::NotFound("dining commons"))
}

/// GET /api/menuitems/all?diningCommonsCode=
pub async fn list_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = MenuItem::list(params.dining_commons_code.as_deref(), &state.db_pool).await?;
    Ok(Json(items))
}

/// GET /api/menuitems?id=
pub async fn get_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<IdParam>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = MenuItem::find_by_id(params.require()?, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("menu item"))?;
    Ok(Json(item))
}

/// POST /api/menuitems
pub async fn create_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Json(req): Json<MenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    auth.require_admin()?;
    require_commons(&req.dining_commons_code, &state).await?;

    let item = MenuItem::create(&req.dining_commons_code, &req.name, &req.station, &state.db_pool)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menuitems?id=
pub async fn update_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<IdParam>,
    Json(req): Json<MenuItemRequest>,
) -> Result<Json<MenuItem>, ApiError> {
    auth.require_admin()?;
    require_commons(&req.dining_commons_code, &state).await?;

    let item = MenuItem::update(
        params.require()?,
        &req.dining_commons_code,
        &req.name,
        &req.station,
        &state.db_pool,
    )
    .await?
    .ok_or(ApiError::NotFound("menu item"))?;
    Ok(Json(item))
}

/// DELETE /api/menuitems?id=
pub async fn delete_handler(
    Extension(state): Extension<AppState>,
    auth: AuthUser,
    Query(params): Query<IdParam>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    if MenuItem::delete(params.require()?, &state.db_pool).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("menu item"))
    }
}
