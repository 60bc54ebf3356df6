//! User roles and the capabilities they grant.
//!
//! Components take a `Role` value explicitly (a function argument or a
//! struct field) rather than reading ambient global state, which keeps the
//! role checks visible at every call site.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Authorization level of a caller.
///
/// `Guest` is the unauthenticated caller; it is never stored or sent over
/// the wire. Stored/wire strings for the rest are `USER`, `MODERATOR`,
/// `ADMIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "GUEST")]
    Guest,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "MODERATOR")]
    Moderator,
    #[serde(rename = "ADMIN")]
    Admin,
}

/// A string did not name a storable role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0:?}")]
pub struct ParseRoleError(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::User => "USER",
            Self::Moderator => "MODERATOR",
            Self::Admin => "ADMIN",
        }
    }

    /// Moderators and admins may work the moderation queues.
    pub fn can_moderate(&self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Parses a stored role string. `GUEST` is deliberately not accepted:
    /// guests exist only as the absence of credentials.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "MODERATOR" => Ok(Self::Moderator),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

// ============================================================================
// sqlx support (TEXT columns)
// ============================================================================

#[cfg(feature = "postgres")]
mod postgres {
    use super::Role;
    use sqlx::encode::IsNull;
    use sqlx::error::BoxDynError;
    use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
    use sqlx::{Decode, Encode, Type};

    impl Type<Postgres> for Role {
        fn type_info() -> PgTypeInfo {
            <&str as Type<Postgres>>::type_info()
        }

        fn compatible(ty: &PgTypeInfo) -> bool {
            <&str as Type<Postgres>>::compatible(ty)
        }
    }

    impl Encode<'_, Postgres> for Role {
        fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
            <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
        }
    }

    impl Decode<'_, Postgres> for Role {
        fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
            let s = <&str as Decode<Postgres>>::decode(value)?;
            s.parse().map_err(Into::into)
        }
    }
}
