//! Repository contracts (not layout): traits plus in-memory implementations
//! used by the controllers and by tests. Persisting runs/candidates to a
//! real database is outside this crate's scope.

use crate::types::{Candidate, CandidateId, OptimizationRun, RunId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait OptimizationRunStore: Send + Sync {
    async fn save(&self, run: OptimizationRun);
    async fn get(&self, id: RunId) -> Option<OptimizationRun>;
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn save(&self, candidate: Candidate);
    async fn list_for_run(&self, run_id: RunId) -> Vec<Candidate>;
    async fn get(&self, id: CandidateId) -> Option<Candidate>;
}

#[derive(Default)]
pub struct InMemoryRunStore {
    runs: RwLock<HashMap<RunId, OptimizationRun>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OptimizationRunStore for InMemoryRunStore {
    async fn save(&self, run: OptimizationRun) {
        self.runs.write().await.insert(run.id, run);
    }

    async fn get(&self, id: RunId) -> Option<OptimizationRun> {
        self.runs.read().await.get(&id).cloned()
    }
}

#[derive(Default)]
pub struct InMemoryCandidateStore {
    candidates: RwLock<HashMap<CandidateId, Candidate>>,
}

impl InMemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn save(&self, candidate: Candidate) {
        self.candidates.write().await.insert(candidate.id, candidate);
    }

    async fn list_for_run(&self, run_id: RunId) -> Vec<Candidate> {
        self.candidates
            .read()
            .await
            .values()
            .filter(|c| c.run_id == run_id)
            .cloned()
            .collect()
    }

    async fn get(&self, id: CandidateId) -> Option<Candidate> {
        self.candidates.read().await.get(&id).cloned()
    }
}
