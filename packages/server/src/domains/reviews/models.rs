use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use mealboard_types::ModerationStatus;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{MenuItemId, ReviewId, UserId};
use crate::domains::moderation::ModerationError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub item_id: MenuItemId,
    pub reviewer_id: UserId,
    pub items_stars: i32,
    pub reviewer_comments: Option<String>,
    pub date_item_served: NaiveDate,
    pub status: ModerationStatus,
    pub moderator_comments: Option<String>,
    pub moderated_by: Option<UserId>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The menu item a queued review targets, denormalized for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    pub id: MenuItemId,
    pub name: String,
    pub station: String,
    pub dining_commons_code: String,
}

/// One row of the review moderation queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedReview {
    pub id: ReviewId,
    pub status: ModerationStatus,
    pub items_stars: i32,
    pub reviewer_comments: Option<String>,
    pub date_item_served: NaiveDate,
    pub item: MenuItemRef,
    pub reviewer_email: String,
    pub reviewer_alias: Option<String>,
}

/// Flat join row backing [`QueuedReview`].
#[derive(Debug, sqlx::FromRow)]
struct QueuedReviewRow {
    id: ReviewId,
    status: ModerationStatus,
    items_stars: i32,
    reviewer_comments: Option<String>,
    date_item_served: NaiveDate,
    item_id: MenuItemId,
    item_name: String,
    item_station: String,
    dining_commons_code: String,
    reviewer_email: String,
    reviewer_alias: Option<String>,
}

impl From<QueuedReviewRow> for QueuedReview {
    fn from(row: QueuedReviewRow) -> Self {
        Self {
            id: row.id,
            status: row.status,
            items_stars: row.items_stars,
            reviewer_comments: row.reviewer_comments,
            date_item_served: row.date_item_served,
            item: MenuItemRef {
                id: row.item_id,
                name: row.item_name,
                station: row.item_station,
                dining_commons_code: row.dining_commons_code,
            },
            reviewer_email: row.reviewer_email,
            reviewer_alias: row.reviewer_alias,
        }
    }
}

// =============================================================================
// Review queries
// =============================================================================

impl Review {
    /// New reviews always start in `AWAITING_REVIEW` (column default).
    pub async fn create(
        item_id: MenuItemId,
        reviewer_id: UserId,
        items_stars: i32,
        reviewer_comments: Option<&str>,
        date_item_served: NaiveDate,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO reviews (item_id, reviewer_id, items_stars, reviewer_comments, date_item_served)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(reviewer_id)
        .bind(items_stars)
        .bind(reviewer_comments)
        .bind(date_item_served)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ReviewId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Public listing for one menu item: approved reviews only.
    pub async fn approved_for_item(item_id: MenuItemId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM reviews WHERE item_id = $1 AND status = 'APPROVED' ORDER BY date_item_served DESC",
        )
        .bind(item_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// The owner's own history, all statuses.
    pub async fn for_reviewer(reviewer_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM reviews WHERE reviewer_id = $1 ORDER BY created_at DESC",
        )
        .bind(reviewer_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM reviews ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn update(
        id: ReviewId,
        items_stars: i32,
        reviewer_comments: Option<&str>,
        date_item_served: NaiveDate,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE reviews
            SET items_stars = $2, reviewer_comments = $3, date_item_served = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(items_stars)
        .bind(reviewer_comments)
        .bind(date_item_served)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: ReviewId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The moderation queue: awaiting reviews only, oldest first, joined
    /// with the target item and the reviewer for display.
    pub async fn needs_moderation(pool: &PgPool) -> Result<Vec<QueuedReview>> {
        let rows = sqlx::query_as::<_, QueuedReviewRow>(
            r#"
            SELECT r.id, r.status, r.items_stars, r.reviewer_comments, r.date_item_served,
                   m.id AS item_id, m.name AS item_name, m.station AS item_station,
                   m.dining_commons_code,
                   u.email AS reviewer_email, u.alias AS reviewer_alias
            FROM reviews r
            JOIN menu_items m ON m.id = r.item_id
            JOIN users u ON u.id = r.reviewer_id
            WHERE r.status = 'AWAITING_REVIEW'
            ORDER BY r.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applies a moderator's decision in one transaction. Optional
    /// moderator comments are attached at decision time.
    pub async fn moderate(
        id: ReviewId,
        approved: bool,
        moderator_comments: Option<&str>,
        moderator: UserId,
        pool: &PgPool,
    ) -> Result<Self, ModerationError> {
        let mut tx = pool.begin().await?;

        let review: Self = sqlx::query_as("SELECT * FROM reviews WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ModerationError::NotFound("review"))?;

        let next = review
            .status
            .decide(approved)
            .map_err(|e| ModerationError::AlreadyDecided(e.current))?;

        let updated: Self = sqlx::query_as(
            r#"
            UPDATE reviews
            SET status = $2, moderator_comments = $3, moderated_by = $4,
                moderated_at = now(), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(moderator_comments)
        .bind(moderator)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
