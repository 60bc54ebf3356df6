// Mealboard - API Core
//
// Backend for the student dining-hall information and review platform.
// Architecture follows domain-driven design: each business domain owns its
// models (sqlx) and its HTTP routes (axum), with shared plumbing in common/
// and the HTTP composition in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
