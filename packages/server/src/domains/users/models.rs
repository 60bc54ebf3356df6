use anyhow::Result;
use chrono::{DateTime, Utc};
use mealboard_types::{ModerationStatus, Role};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ProposalId, UserId};
use crate::domains::moderation::ModerationError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub alias: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AliasProposal {
    pub id: ProposalId,
    pub user_id: UserId,
    pub proposed_alias: String,
    pub status: ModerationStatus,
    pub moderated_by: Option<UserId>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One row of the alias moderation queue, denormalized with the owning
/// user's email and current alias for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAlias {
    pub id: ProposalId,
    pub user_id: UserId,
    pub email: String,
    pub alias: Option<String>,
    pub proposed_alias: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User queries
// =============================================================================

impl User {
    /// First login creates the account; later logins refresh the name and
    /// the login timestamp.
    pub async fn upsert_on_login(
        email: &str,
        full_name: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (email, full_name)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE
            SET full_name = COALESCE(EXCLUDED.full_name, users.full_name),
                last_login_at = now()
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(full_name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn set_role(id: UserId, role: Role, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("UPDATE users SET role = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}

// =============================================================================
// Alias proposal queries
// =============================================================================

impl AliasProposal {
    /// Submits a proposal; a still-pending proposal by the same user is
    /// replaced rather than duplicated (partial unique index on the
    /// awaiting row).
    pub async fn propose(
        user_id: UserId,
        proposed_alias: &str,
        pool: &PgPool,
    ) -> Result<Self, ModerationError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users WHERE alias = $1 AND id <> $2
                UNION
                SELECT 1 FROM alias_proposals
                WHERE proposed_alias = $1
                  AND user_id <> $2
                  AND status = 'AWAITING_REVIEW'
            )
            "#,
        )
        .bind(proposed_alias)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        if taken {
            return Err(ModerationError::AliasTaken(proposed_alias.to_string()));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO alias_proposals (user_id, proposed_alias)
            VALUES ($1, $2)
            ON CONFLICT (user_id) WHERE status = 'AWAITING_REVIEW' DO UPDATE
            SET proposed_alias = EXCLUDED.proposed_alias,
                created_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(proposed_alias)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ProposalId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM alias_proposals WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn history_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM alias_proposals WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// The moderation queue: awaiting proposals only, oldest first.
    pub async fn queue(pool: &PgPool) -> Result<Vec<QueuedAlias>> {
        sqlx::query_as::<_, QueuedAlias>(
            r#"
            SELECT p.id, p.user_id, u.email, u.alias, p.proposed_alias, p.status, p.created_at
            FROM alias_proposals p
            JOIN users u ON u.id = p.user_id
            WHERE p.status = 'AWAITING_REVIEW'
            ORDER BY p.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Applies a moderator's decision in one transaction.
    ///
    /// Approval also sets the owning user's alias, re-checking uniqueness
    /// inside the transaction; a collision leaves the proposal awaiting so
    /// a later decision is still possible.
    pub async fn moderate(
        id: ProposalId,
        approved: bool,
        moderator: UserId,
        pool: &PgPool,
    ) -> Result<Self, ModerationError> {
        let mut tx = pool.begin().await?;

        let proposal: Self =
            sqlx::query_as("SELECT * FROM alias_proposals WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ModerationError::NotFound("alias proposal"))?;

        let next = proposal
            .status
            .decide(approved)
            .map_err(|e| ModerationError::AlreadyDecided(e.current))?;

        if approved {
            let taken: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE alias = $1 AND id <> $2)",
            )
            .bind(&proposal.proposed_alias)
            .bind(proposal.user_id)
            .fetch_one(&mut *tx)
            .await?;
            if taken {
                // Rolls back on drop; the proposal stays AWAITING_REVIEW.
                return Err(ModerationError::AliasTaken(proposal.proposed_alias));
            }

            sqlx::query("UPDATE users SET alias = $1 WHERE id = $2")
                .bind(&proposal.proposed_alias)
                .bind(proposal.user_id)
                .execute(&mut *tx)
                .await?;
        }

        let updated: Self = sqlx::query_as(
            r#"
            UPDATE alias_proposals
            SET status = $2, moderated_by = $3, moderated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(moderator)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
