//! Wire types for the Mealboard REST API.

use chrono::{DateTime, NaiveDate, Utc};
use mealboard_types::{ModerationStatus, Role};
use serde::{Deserialize, Serialize};

/// The authenticated user's profile, as returned by `GET api/currentUser`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub alias: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub item_id: i64,
    pub reviewer_id: i64,
    pub items_stars: i32,
    pub reviewer_comments: Option<String>,
    pub date_item_served: NaiveDate,
    pub status: ModerationStatus,
    pub moderator_comments: Option<String>,
    pub moderated_by: Option<i64>,
    pub moderated_at: Option<DateTime<Utc>>,
}

/// The menu item a queued review targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    pub id: i64,
    pub name: String,
    pub station: String,
    pub dining_commons_code: String,
}

/// One row of the review moderation queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedReview {
    pub id: i64,
    pub status: ModerationStatus,
    pub items_stars: i32,
    pub reviewer_comments: Option<String>,
    pub date_item_served: NaiveDate,
    pub item: MenuItemRef,
    pub reviewer_email: String,
    pub reviewer_alias: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasProposal {
    pub id: i64,
    pub user_id: i64,
    pub proposed_alias: String,
    pub status: ModerationStatus,
    pub moderated_by: Option<i64>,
    pub moderated_at: Option<DateTime<Utc>>,
}

/// One row of the alias moderation queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAlias {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub alias: Option<String>,
    pub proposed_alias: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
}
