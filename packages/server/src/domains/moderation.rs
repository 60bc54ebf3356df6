//! Errors shared by the two moderation flows (reviews, alias proposals).

use mealboard_types::ModerationStatus;
use thiserror::Error;

/// Why a moderation decision could not be applied.
///
/// `AlreadyDecided` is the terminal-state guard: a decision only ever moves
/// an entity out of `AWAITING_REVIEW`, never out of a terminal status.
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("entity already moderated (status {0})")]
    AlreadyDecided(ModerationStatus),

    #[error("alias {0:?} is already in use")]
    AliasTaken(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
