pub mod models;
pub mod routes;

pub use models::{AliasProposal, QueuedAlias, User};
