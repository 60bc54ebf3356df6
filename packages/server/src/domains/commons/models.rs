use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A dining commons, keyed by its short code (e.g. "ortega").
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiningCommons {
    pub code: String,
    pub name: String,
    pub has_sack_meal: bool,
    pub has_takeout_meal: bool,
    pub has_dining_cam: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl DiningCommons {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        code: &str,
        name: &str,
        has_sack_meal: bool,
        has_takeout_meal: bool,
        has_dining_cam: bool,
        latitude: f64,
        longitude: f64,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO dining_commons
                (code, name, has_sack_meal, has_takeout_meal, has_dining_cam, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(has_sack_meal)
        .bind(has_takeout_meal)
        .bind(has_dining_cam)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_code(code: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM dining_commons WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM dining_commons ORDER BY code")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        code: &str,
        name: &str,
        has_sack_meal: bool,
        has_takeout_meal: bool,
        has_dining_cam: bool,
        latitude: f64,
        longitude: f64,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE dining_commons
            SET name = $2, has_sack_meal = $3, has_takeout_meal = $4,
                has_dining_cam = $5, latitude = $6, longitude = $7
            WHERE code = $1
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(has_sack_meal)
        .bind(has_takeout_meal)
        .bind(has_dining_cam)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns false when no commons had the code.
    pub async fn delete(code: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dining_commons WHERE code = $1")
            .bind(code)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
