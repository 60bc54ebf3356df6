//! Moderation console for the Mealboard API.
//!
//! Interactive by default (review and alias queues side by side); the
//! `reviews` and `aliases` subcommands expose the same fetch and dispatch
//! paths for scripting.

mod app;
mod events;
mod notify;
mod table;
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mealboard_client::{MealboardClient, ModerationDecision, Notifier};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use crate::app::App;
use crate::notify::{ChannelNotifier, PrintNotifier};
use crate::table::QueueRow;

#[derive(Parser)]
#[command(name = "modboard", about = "Mealboard moderation console")]
struct Cli {
    /// Server root URL (falls back to MEALBOARD_SERVER_URL).
    #[arg(long)]
    server: Option<String>,

    /// Bearer token from a moderator login (falls back to MEALBOARD_TOKEN).
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Review moderation queue.
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Alias proposal moderation queue.
    Aliases {
        #[command(subcommand)]
        action: AliasAction,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Print the queue (or every review with --all).
    List {
        #[arg(long)]
        all: bool,
    },
    Approve {
        id: i64,
        /// Attached to the review at decision time.
        #[arg(long)]
        comments: Option<String>,
    },
    Reject {
        id: i64,
        #[arg(long)]
        comments: Option<String>,
    },
}

#[derive(Subcommand)]
enum AliasAction {
    List,
    Approve { id: i64 },
    Reject { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = cli
        .server
        .or_else(|| std::env::var("MEALBOARD_SERVER_URL").ok())
        .context("no server URL; pass --server or set MEALBOARD_SERVER_URL")?;
    let token = cli
        .token
        .or_else(|| std::env::var("MEALBOARD_TOKEN").ok())
        .context("no token; pass --token or set MEALBOARD_TOKEN")?;
    let base_url = Url::parse(&server).context("invalid server URL")?;

    let interactive = cli.command.is_none();
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let notifier: Arc<dyn Notifier> = if interactive {
        Arc::new(ChannelNotifier::new(notice_tx))
    } else {
        Arc::new(PrintNotifier)
    };

    let client = MealboardClient::builder()
        .base_url(base_url)
        .token(token)
        .notifier(notifier)
        .build();

    // The console is for moderators; check the authenticated profile up
    // front instead of failing on the first queue read.
    let profile = client
        .current_user()
        .await
        .context("fetching the authenticated profile")?;
    if !profile.role.can_moderate() {
        bail!(
            "{} has role {}; the moderation console requires MODERATOR or ADMIN",
            profile.email,
            profile.role.as_str()
        );
    }

    match cli.command {
        None => App::new(client).run(notice_rx).await,
        Some(Command::Reviews { action }) => run_review_action(&client, action).await,
        Some(Command::Aliases { action }) => run_alias_action(&client, action).await,
    }
}

async fn run_review_action(client: &MealboardClient, action: ReviewAction) -> Result<()> {
    match action {
        ReviewAction::List { all: false } => {
            let queue = client.fetch_review_queue().await?;
            print_rows(&queue);
        }
        ReviewAction::List { all: true } => {
            let reviews = client.fetch_all_reviews().await?;
            println!("{:<8} {:<16} {:<6} {:<12} comments", "id", "status", "stars", "served");
            for review in reviews {
                println!(
                    "{:<8} {:<16} {:<6} {:<12} {}",
                    review.id,
                    review.status.as_str(),
                    review.items_stars,
                    review.date_item_served,
                    review.reviewer_comments.as_deref().unwrap_or("")
                );
            }
        }
        ReviewAction::Approve { id, comments } => {
            let decision = with_comments(ModerationDecision::new(Some(id), Some(true))?, comments);
            client.moderate_review(decision).await?;
        }
        ReviewAction::Reject { id, comments } => {
            let decision = with_comments(ModerationDecision::new(Some(id), Some(false))?, comments);
            client.moderate_review(decision).await?;
        }
    }
    Ok(())
}

async fn run_alias_action(client: &MealboardClient, action: AliasAction) -> Result<()> {
    match action {
        AliasAction::List => {
            let queue = client.fetch_alias_queue().await?;
            print_rows(&queue);
        }
        AliasAction::Approve { id } => {
            client
                .moderate_alias(ModerationDecision::new(Some(id), Some(true))?)
                .await?;
        }
        AliasAction::Reject { id } => {
            client
                .moderate_alias(ModerationDecision::new(Some(id), Some(false))?)
                .await?;
        }
    }
    Ok(())
}

fn with_comments(decision: ModerationDecision, comments: Option<String>) -> ModerationDecision {
    match comments {
        Some(comments) => decision.with_moderator_comments(comments),
        None => decision,
    }
}

fn print_rows<R: QueueRow>(rows: &[R]) {
    println!("{}", R::title());
    println!("{}", R::columns().join(" | "));
    for row in rows {
        println!("{}", row.cells().join(" | "));
    }
    if rows.is_empty() {
        println!("(queue is empty)");
    }
}
