// Business domains
pub mod auth;
pub mod commons;
pub mod menu;
pub mod moderation;
pub mod reviews;
pub mod users;
