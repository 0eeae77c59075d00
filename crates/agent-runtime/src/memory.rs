//! Retrieval-augmented memory collaborator. The crate only defines the
//! trait and a deterministic in-memory fake; a real embedding-backed
//! implementation is outside this crate's scope.

use crate::types::MemoryCandidate;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait Memory: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Vec<MemoryCandidate>;
    async fn store(&self, content: String, metadata: serde_json::Value);
}

/// Word-overlap "similarity": fine for tests and local development, not a
/// substitute for a real embedding index.
fn overlap_score(query: &str, content: &str) -> f64 {
    let query_words: std::collections::HashSet<&str> = query.split_whitespace().collect();
    if query_words.is_empty() {
        return 0.0;
    }
    let matches = content.split_whitespace().filter(|w| query_words.contains(w)).count();
    matches as f64 / query_words.len() as f64
}

#[derive(Default)]
pub struct InMemoryMemory {
    entries: RwLock<Vec<MemoryCandidate>>,
}

impl InMemoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, content: impl Into<String>) {
        self.store(content.into(), serde_json::Value::Null).await;
    }
}

#[async_trait]
impl Memory for InMemoryMemory {
    async fn search(&self, query: &str, limit: usize) -> Vec<MemoryCandidate> {
        let mut scored: Vec<MemoryCandidate> = self
            .entries
            .read()
            .await
            .iter()
            .map(|entry| MemoryCandidate { score: overlap_score(query, &entry.content), ..entry.clone() })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        scored.truncate(limit);
        scored
    }

    async fn store(&self, content: String, metadata: serde_json::Value) {
        self.entries.write().await.push(MemoryCandidate {
            id: uuid::Uuid::new_v4(),
            content,
            score: 0.0,
            metadata,
        });
    }
}
