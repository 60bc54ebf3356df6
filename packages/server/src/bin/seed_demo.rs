// Seeds a development database with demo dining commons, menu items,
// users, and a few reviews/alias proposals waiting in the moderation queue.
//
// Usage: DATABASE_URL=... cargo run --bin seed_demo

use anyhow::{Context, Result};
use chrono::NaiveDate;
use mealboard_types::Role;
use server_core::domains::commons::models::DiningCommons;
use server_core::domains::menu::models::MenuItem;
use server_core::domains::reviews::models::Review;
use server_core::domains::users::models::{AliasProposal, User};
use server_core::Config;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Seeding demo data");

    let commons = [
        ("carrillo", "Carrillo", true, false, false, 34.4098, -119.8526),
        ("de-la-guerra", "De La Guerra", true, true, false, 34.4096, -119.8453),
        ("ortega", "Ortega", true, true, true, 34.4102, -119.8453),
        ("portola", "Portola", true, true, true, 34.4172, -119.8679),
    ];
    for (code, name, sack, takeout, cam, lat, lon) in commons {
        if DiningCommons::find_by_code(code, &pool).await?.is_none() {
            DiningCommons::create(code, name, sack, takeout, cam, lat, lon, &pool).await?;
            tracing::info!(code, "created dining commons");
        }
    }

    let items = [
        ("ortega", "Chicken Caesar Salad", "Entrees"),
        ("ortega", "Baked Pesto Pasta", "Entree Specials"),
        ("portola", "Cream of Broccoli Soup", "Greens & Grains"),
        ("de-la-guerra", "Taco Tuesday Special", "Blue Plate Special"),
    ];
    let mut item_ids = Vec::new();
    for (code, name, station) in items {
        let item = MenuItem::create(code, name, station, &pool).await?;
        item_ids.push(item.id);
        tracing::info!(name, "created menu item");
    }

    let diner = User::upsert_on_login("diner@example.edu", Some("Demo Diner"), &pool).await?;
    let moderator =
        User::upsert_on_login("moderator@example.edu", Some("Demo Moderator"), &pool).await?;
    User::set_role(moderator.id, Role::Moderator, &pool).await?;

    let served = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
    Review::create(item_ids[0], diner.id, 5, Some("Crisp and fresh."), served, &pool).await?;
    Review::create(item_ids[1], diner.id, 2, Some("Cold in the middle."), served, &pool).await?;
    AliasProposal::propose(diner.id, "HungryGaucho", &pool).await?;

    tracing::info!("Demo data seeded; two reviews and one alias proposal are awaiting moderation");
    Ok(())
}
