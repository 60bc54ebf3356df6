//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data and
//! mint tokens with the same JWT settings the app under test verifies.

use anyhow::Result;
use chrono::NaiveDate;
use mealboard_types::Role;
use server_core::common::{MenuItemId, ProposalId, ReviewId, UserId};
use server_core::domains::auth::JwtService;
use server_core::domains::commons::models::DiningCommons;
use server_core::domains::menu::models::MenuItem;
use server_core::domains::reviews::models::Review;
use server_core::domains::users::models::{AliasProposal, User};
use sqlx::PgPool;
use uuid::Uuid;

use super::harness::{TEST_JWT_ISSUER, TEST_JWT_SECRET};

/// A created user plus a valid bearer token for it.
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

/// Create a user with the given role and a token carrying it.
/// Emails are uniquified so tests never collide on the shared database.
pub async fn create_user(pool: &PgPool, role: Role, tag: &str) -> Result<TestUser> {
    let email = format!("{}-{}@example.edu", tag, Uuid::new_v4());
    let user = User::upsert_on_login(&email, Some("Test User"), pool).await?;
    let user = if role == Role::User {
        user
    } else {
        User::set_role(user.id, role, pool)
            .await?
            .expect("user exists")
    };

    let jwt = JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string());
    let token = jwt.create_token(user.id, &user.email, user.role)?;

    Ok(TestUser {
        id: user.id,
        email: user.email,
        token,
    })
}

/// Create a dining commons with a unique code.
pub async fn create_test_commons(pool: &PgPool) -> Result<String> {
    let code = format!("commons-{}", Uuid::new_v4());
    DiningCommons::create(&code, "Test Commons", true, false, false, 34.41, -119.85, pool).await?;
    Ok(code)
}

/// Create a menu item in a fresh commons.
pub async fn create_test_item(pool: &PgPool, name: &str) -> Result<MenuItemId> {
    let code = create_test_commons(pool).await?;
    let item = MenuItem::create(&code, name, "Entrees", pool).await?;
    Ok(item.id)
}

/// Create a review awaiting moderation.
pub async fn create_awaiting_review(
    pool: &PgPool,
    item_id: MenuItemId,
    reviewer_id: UserId,
) -> Result<ReviewId> {
    let served = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
    let review = Review::create(item_id, reviewer_id, 4, Some("Pretty good."), served, pool).await?;
    Ok(review.id)
}

/// Create an alias proposal awaiting moderation.
pub async fn create_awaiting_alias(
    pool: &PgPool,
    user_id: UserId,
    proposed_alias: &str,
) -> Result<ProposalId> {
    let proposal = AliasProposal::propose(user_id, proposed_alias, pool).await?;
    Ok(proposal.id)
}
