// Mealboard shared domain vocabulary
//
// This crate holds the types that cross the wire between the server, the
// client library, and the moderation console: the moderation status model
// and the user role model. Keeping them in one place means there is exactly
// one definition of each (no ad hoc status strings per entity kind).

pub mod moderation;
pub mod role;

pub use moderation::{ModerationStatus, ParseStatusError, TransitionError};
pub use role::{ParseRoleError, Role};
