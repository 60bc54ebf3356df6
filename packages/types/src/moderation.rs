//! The moderation status model shared by reviews and alias proposals.
//!
//! Every moderatable entity carries exactly one of three states. The only
//! legal transitions are `AwaitingReview -> Approved` and
//! `AwaitingReview -> Rejected`; both targets are terminal. [`ModerationStatus::decide`]
//! is the single place that encodes this, so callers cannot invent a
//! transition out of a terminal state.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Moderation state of a review or alias proposal.
///
/// Wire and database representation are the exact strings
/// `AWAITING_REVIEW`, `APPROVED`, `REJECTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModerationStatus {
    #[default]
    #[serde(rename = "AWAITING_REVIEW")]
    AwaitingReview,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED")]
    Rejected,
}

/// A moderation decision was applied to an entity that is not awaiting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity already moderated (status {current})")]
pub struct TransitionError {
    /// The terminal status the entity already holds.
    pub current: ModerationStatus,
}

/// A string did not name one of the three statuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown moderation status: {0:?}")]
pub struct ParseStatusError(pub String);

impl ModerationStatus {
    /// The canonical string form, as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingReview => "AWAITING_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingReview)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_awaiting()
    }

    /// Applies a moderator's decision.
    ///
    /// Succeeds only from `AwaitingReview`; a decision against an entity
    /// that already holds a terminal status is a [`TransitionError`].
    pub fn decide(self, approved: bool) -> Result<Self, TransitionError> {
        match self {
            Self::AwaitingReview => Ok(if approved {
                Self::Approved
            } else {
                Self::Rejected
            }),
            current => Err(TransitionError { current }),
        }
    }
}

impl Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWAITING_REVIEW" => Ok(Self::AwaitingReview),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

// ============================================================================
// sqlx support (TEXT columns)
// ============================================================================

#[cfg(feature = "postgres")]
mod postgres {
    use super::ModerationStatus;
    use sqlx::encode::IsNull;
    use sqlx::error::BoxDynError;
    use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
    use sqlx::{Decode, Encode, Type};

    impl Type<Postgres> for ModerationStatus {
        fn type_info() -> PgTypeInfo {
            <&str as Type<Postgres>>::type_info()
        }

        fn compatible(ty: &PgTypeInfo) -> bool {
            <&str as Type<Postgres>>::compatible(ty)
        }
    }

    impl Encode<'_, Postgres> for ModerationStatus {
        fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
            <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
        }
    }

    impl Decode<'_, Postgres> for ModerationStatus {
        fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
            let s = <&str as Decode<Postgres>>::decode(value)?;
            s.parse().map_err(Into::into)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
