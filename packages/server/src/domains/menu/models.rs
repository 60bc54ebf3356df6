use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::MenuItemId;

/// A menu item served at a station of one dining commons.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub dining_commons_code: String,
    pub name: String,
    pub station: String,
}

impl MenuItem {
    pub async fn create(
        dining_commons_code: &str,
        name: &str,
        station: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO menu_items (dining_commons_code, name, station)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(dining_commons_code)
        .bind(name)
        .bind(station)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: MenuItemId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM menu_items WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Lists items, optionally limited to one dining commons.
    pub async fn list(commons_code: Option<&str>, pool: &PgPool) -> Result<Vec<Self>> {
        match commons_code {
            Some(code) => sqlx::query_as::<_, Self>(
                "SELECT * FROM menu_items WHERE dining_commons_code = $1 ORDER BY station, name",
            )
            .bind(code)
            .fetch_all(pool)
            .await
            .map_err(Into::into),
            None => sqlx::query_as::<_, Self>(
                "SELECT * FROM menu_items ORDER BY dining_commons_code, station, name",
            )
            .fetch_all(pool)
            .await
            .map_err(Into::into),
        }
    }

    pub async fn update(
        id: MenuItemId,
        dining_commons_code: &str,
        name: &str,
        station: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE menu_items
            SET dining_commons_code = $2, name = $3, station = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dining_commons_code)
        .bind(name)
        .bind(station)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: MenuItemId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
