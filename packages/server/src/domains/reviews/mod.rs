pub mod models;
pub mod routes;

pub use models::{MenuItemRef, QueuedReview, Review};
