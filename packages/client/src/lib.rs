//! Typed REST client for the Mealboard API.
//!
//! Wraps the moderation endpoints behind a query cache: queue reads are
//! stored under their endpoint path, and a successful moderation write
//! invalidates that path so the next read goes back to the server.
//!
//! # Example
//!
//! ```rust,ignore
//! use mealboard_client::{MealboardClient, ModerationDecision};
//! use url::Url;
//!
//! let client = MealboardClient::builder()
//!     .base_url(Url::parse("http://localhost:8080")?)
//!     .token("bearer-token")
//!     .build();
//!
//! let queue = client.fetch_review_queue().await?;
//! let decision = ModerationDecision::new(Some(queue[0].id), Some(true))?;
//! client.moderate_review(decision).await?;
//! ```

pub mod cache;
pub mod error;
pub mod moderation;
pub mod notify;
pub mod types;

pub use cache::QueryCache;
pub use error::{ClientError, Result};
pub use moderation::{ModerationDecision, ALIAS_QUEUE_KEY, REVIEW_QUEUE_KEY};
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use types::{AliasProposal, CurrentUser, MenuItemRef, QueuedAlias, QueuedReview, Review};

use std::sync::Arc;
use typed_builder::TypedBuilder;
use url::Url;

#[derive(Clone, TypedBuilder)]
pub struct MealboardClient {
    /// Server root, e.g. `http://localhost:8080`.
    base_url: Url,

    /// Bearer token from `POST api/auth/login`.
    #[builder(default, setter(strip_option, into))]
    token: Option<String>,

    #[builder(default = reqwest::Client::new())]
    http: reqwest::Client,

    #[builder(default)]
    cache: QueryCache,

    #[builder(default = Arc::new(LogNotifier) as Arc<dyn Notifier>)]
    notifier: Arc<dyn Notifier>,
}

impl MealboardClient {
    /// Resolve an endpoint path (no leading slash) against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(base.join(path)?)
    }

    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// The authenticated profile. Moderation surfaces use its `role` to
    /// decide whether to start at all.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        let url = self.endpoint("api/currentUser")?;
        let resp = self.authorize(self.http.get(url)).send().await?;
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }
        Ok(resp.json().await?)
    }
}

/// Turn a non-2xx response into [`ClientError::Api`], unwrapping the
/// server's `{"error": ...}` body when present.
pub(crate) async fn api_error(resp: reqwest::Response) -> ClientError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(text);
    ClientError::Api { status, message }
}
