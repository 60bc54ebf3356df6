//! Query cache keyed by endpoint path.
//!
//! Fetches store their raw JSON response under the endpoint path; mutations
//! invalidate the same key so the next fetch goes back to the server.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: &str, value: Value) {
        self.inner.write().await.insert(key.to_string(), value);
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.write().await.remove(key);
    }

    pub async fn is_cached(&self, key: &str) -> bool {
        self.inner.read().await.contains_key(key)
    }
}
