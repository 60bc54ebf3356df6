//! Moderation queue fetches and decision dispatch.
//!
//! Queue reads cache their JSON under the endpoint path. A successful
//! decision invalidates exactly that key; a failed one leaves the cache
//! alone so the table keeps showing what the moderator last saw.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::types::{AliasProposal, QueuedAlias, QueuedReview, Review};
use crate::{api_error, MealboardClient};

/// Cache key for the review moderation queue.
pub const REVIEW_QUEUE_KEY: &str = "api/reviews/needsModeration";
/// Cache key for the alias moderation queue.
pub const ALIAS_QUEUE_KEY: &str = "api/admin/usersWithProposedAlias";

const REVIEW_MODERATE_PATH: &str = "api/reviews/moderate";
const ALIAS_MODERATE_PATH: &str = "api/admin/updateAliasModeration";

/// A validated approve/reject decision for one queue entity.
///
/// Construction fails when either field is absent, so an incomplete
/// decision never reaches the wire.
#[derive(Debug, Clone)]
pub struct ModerationDecision {
    id: i64,
    approved: bool,
    subject: Option<String>,
    moderator_comments: Option<String>,
}

impl ModerationDecision {
    pub fn new(id: Option<i64>, approved: Option<bool>) -> Result<Self> {
        let missing = match (id, approved) {
            (Some(id), Some(approved)) => {
                return Ok(Self {
                    id,
                    approved,
                    subject: None,
                    moderator_comments: None,
                })
            }
            (None, None) => "id and approved",
            (None, _) => "id",
            (_, None) => "approved",
        };
        tracing::warn!(?id, ?approved, "moderation decision missing {missing}");
        Err(ClientError::IncompleteDecision(missing))
    }

    /// Display string for notifications, e.g. the proposed alias or the
    /// menu item name. Falls back to "<kind> <id>".
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Reviews only; the alias endpoint takes no comments.
    pub fn with_moderator_comments(mut self, comments: impl Into<String>) -> Self {
        self.moderator_comments = Some(comments.into());
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    fn subject_or(&self, kind: &str) -> String {
        self.subject
            .clone()
            .unwrap_or_else(|| format!("{kind} {}", self.id))
    }

    fn verb_past(&self) -> &'static str {
        if self.approved {
            "approved"
        } else {
            "rejected"
        }
    }

    fn verb_gerund(&self) -> &'static str {
        if self.approved {
            "approving"
        } else {
            "rejecting"
        }
    }
}

impl MealboardClient {
    /// GET api/reviews/needsModeration, cached under [`REVIEW_QUEUE_KEY`].
    pub async fn fetch_review_queue(&self) -> Result<Vec<QueuedReview>> {
        self.fetch_cached(REVIEW_QUEUE_KEY).await
    }

    /// GET api/admin/usersWithProposedAlias, cached under [`ALIAS_QUEUE_KEY`].
    pub async fn fetch_alias_queue(&self) -> Result<Vec<QueuedAlias>> {
        self.fetch_cached(ALIAS_QUEUE_KEY).await
    }

    /// GET api/reviews/all. Admin listing across all statuses; not cached,
    /// the moderation surfaces only ever mutate queue state.
    pub async fn fetch_all_reviews(&self) -> Result<Vec<Review>> {
        let url = self.endpoint("api/reviews/all")?;
        let resp = self.authorize(self.http.get(url)).send().await?;
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }
        Ok(resp.json().await?)
    }

    /// PUT api/reviews/moderate. One request per call; invalidates the
    /// review queue on success only.
    pub async fn moderate_review(&self, decision: ModerationDecision) -> Result<Review> {
        let value = self
            .dispatch(&decision, REVIEW_MODERATE_PATH, REVIEW_QUEUE_KEY, "review", true)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// PUT api/admin/updateAliasModeration. One request per call;
    /// invalidates the alias queue on success only.
    pub async fn moderate_alias(&self, decision: ModerationDecision) -> Result<AliasProposal> {
        let value = self
            .dispatch(&decision, ALIAS_MODERATE_PATH, ALIAS_QUEUE_KEY, "alias proposal", false)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// The queue path doubles as the cache key.
    async fn fetch_cached<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        if let Some(cached) = self.cache().get(path).await {
            tracing::debug!(path, "queue served from cache");
            return Ok(serde_json::from_value(cached)?);
        }

        let url = self.endpoint(path)?;
        let resp = match self.authorize(self.http.get(url.clone())).send().await {
            Ok(resp) => resp,
            Err(err) => {
                self.notifier().error(&format!("GET {url} failed: {err}"));
                return Err(err.into());
            }
        };
        if !resp.status().is_success() {
            let err = api_error(resp).await;
            self.notifier().error(&format!("GET {url} failed: {err}"));
            return Err(err);
        }

        let value: Value = resp.json().await?;
        self.cache().insert(path, value.clone()).await;
        Ok(serde_json::from_value(value)?)
    }

    async fn dispatch(
        &self,
        decision: &ModerationDecision,
        path: &str,
        queue_key: &str,
        kind: &str,
        with_comments: bool,
    ) -> Result<Value> {
        let subject = decision.subject_or(kind);
        let url = self.endpoint(path)?;

        let mut query = vec![
            ("id".to_string(), decision.id.to_string()),
            ("approved".to_string(), decision.approved.to_string()),
        ];
        if with_comments {
            if let Some(comments) = &decision.moderator_comments {
                query.push(("moderatorComments".to_string(), comments.clone()));
            }
        }

        let resp = match self
            .authorize(self.http.put(url).query(&query))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                self.notifier()
                    .error(&format!("Error {} {subject}: {err}", decision.verb_gerund()));
                return Err(err.into());
            }
        };
        if !resp.status().is_success() {
            let err = api_error(resp).await;
            self.notifier()
                .error(&format!("Error {} {subject}: {err}", decision.verb_gerund()));
            return Err(err);
        }

        self.cache().invalidate(queue_key).await;
        self.notifier()
            .success(&format!("{subject} {}", decision.verb_past()));
        resp.json().await.map_err(Into::into)
    }
}
