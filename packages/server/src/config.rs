use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Emails promoted to ADMIN on login (comma-separated in the env).
    pub admin_emails: Vec<String>,
    /// CORS allow-list; empty means any origin (development).
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "mealboard".to_string()),
            admin_emails: split_csv(env::var("ADMIN_EMAILS").unwrap_or_default()),
            allowed_origins: split_csv(env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn split_csv(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv("a@x.edu, b@x.edu,,".to_string()),
            vec!["a@x.edu".to_string(), "b@x.edu".to_string()]
        );
        assert!(split_csv(String::new()).is_empty());
    }
}
