//! Client-state persistence layer
//!
//! Responsible for the small UX memory kept across visits: the capped
//! recent-queries list and the onboarding/tip flags. In-memory for tests
//! and ephemeral runs; a JSON document on disk for durability.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::Result;

pub const ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const TIPS_DISMISSED: &str = "tips_dismissed";

/// Trait for client-state persistence
#[async_trait::async_trait]
pub trait ClientStateStore: Send + Sync {
    async fn load_recent_queries(&self) -> Result<Vec<String>>;
    async fn save_recent_queries(&self, queries: &[String]) -> Result<()>;
    async fn load_flag(&self, key: &str) -> Result<bool>;
    async fn save_flag(&self, key: &str, value: bool) -> Result<()>;
}

/// The on-disk / in-memory document shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ClientStateDoc {
    #[serde(default)]
    recent_queries: Vec<String>,
    #[serde(default)]
    flags: HashMap<String, bool>,
}

/// In-memory client state for development and tests
pub struct InMemoryStateStore {
    doc: Arc<RwLock<ClientStateDoc>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            doc: Arc::new(RwLock::new(ClientStateDoc::default())),
        }
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ClientStateStore for InMemoryStateStore {
    async fn load_recent_queries(&self) -> Result<Vec<String>> {
        Ok(self.doc.read().await.recent_queries.clone())
    }

    async fn save_recent_queries(&self, queries: &[String]) -> Result<()> {
        self.doc.write().await.recent_queries = queries.to_vec();
        Ok(())
    }

    async fn load_flag(&self, key: &str) -> Result<bool> {
        Ok(self
            .doc
            .read()
            .await
            .flags
            .get(key)
            .copied()
            .unwrap_or(false))
    }

    async fn save_flag(&self, key: &str, value: bool) -> Result<()> {
        self.doc.write().await.flags.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON-file-backed client state. The whole document is rewritten on every
/// save; a lock serializes writers.
pub struct JsonFileStateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    async fn load_doc(&self) -> Result<ClientStateDoc> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            // A missing file is a fresh client, not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientStateDoc::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_doc(&self, doc: &ClientStateDoc) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClientStateStore for JsonFileStateStore {
    async fn load_recent_queries(&self) -> Result<Vec<String>> {
        Ok(self.load_doc().await?.recent_queries)
    }

    async fn save_recent_queries(&self, queries: &[String]) -> Result<()> {
        let mut doc = self.load_doc().await?;
        doc.recent_queries = queries.to_vec();
        self.save_doc(&doc).await
    }

    async fn load_flag(&self, key: &str) -> Result<bool> {
        Ok(self
            .load_doc()
            .await?
            .flags
            .get(key)
            .copied()
            .unwrap_or(false))
    }

    async fn save_flag(&self, key: &str, value: bool) -> Result<()> {
        let mut doc = self.load_doc().await?;
        doc.flags.insert(key.to_string(), value);
        self.save_doc(&doc).await
    }
}
