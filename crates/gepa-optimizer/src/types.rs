//! Shared data model for both the prompt-optimization and path-search
//! controllers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RunId = Uuid;
pub type CandidateId = Uuid;

/// Per-objective scores for a prompt-optimization candidate. Every field is
/// in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct DimensionScores {
    pub success_rate: f64,
    pub quality: f64,
    pub efficiency: f64,
    pub robustness: f64,
    pub generalization: f64,
    pub diversity: f64,
    pub innovation: f64,
}

impl DimensionScores {
    pub fn as_vector(&self) -> [f64; 7] {
        [
            self.success_rate,
            self.quality,
            self.efficiency,
            self.robustness,
            self.generalization,
            self.diversity,
            self.innovation,
        ]
    }

    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.as_vector()
            .iter()
            .zip(other.as_vector().iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// True if `self` dominates `other`: at least as good on every
    /// objective, strictly better on at least one.
    pub fn dominates(&self, other: &Self) -> bool {
        let a = self.as_vector();
        let b = other.as_vector();
        a.iter().zip(b.iter()).all(|(x, y)| x >= y) && a.iter().zip(b.iter()).any(|(x, y)| x > y)
    }
}

/// Per-objective scores for a path-search candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct PathScores {
    pub answer_quality: f64,
    pub efficiency: f64,
    pub token_cost: f64,
    pub robustness: f64,
    pub latency: f64,
}

impl PathScores {
    pub fn as_vector(&self) -> [f64; 5] {
        [self.answer_quality, self.efficiency, self.token_cost, self.robustness, self.latency]
    }

    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.as_vector()
            .iter()
            .zip(other.as_vector().iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn dominates(&self, other: &Self) -> bool {
        let a = self.as_vector();
        let b = other.as_vector();
        a.iter().zip(b.iter()).all(|(x, y)| x >= y) && a.iter().zip(b.iter()).any(|(x, y)| x > y)
    }
}

/// Relative importance of each prompt-optimization dimension; normalized to
/// sum to 1 before use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub success_rate: f64,
    pub quality: f64,
    pub efficiency: f64,
    pub robustness: f64,
    pub generalization: f64,
    pub diversity: f64,
    pub innovation: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            success_rate: 0.35,
            quality: 0.25,
            efficiency: 0.10,
            robustness: 0.10,
            generalization: 0.10,
            diversity: 0.05,
            innovation: 0.05,
        }
    }
}

impl DimensionWeights {
    pub fn normalized(&self) -> Self {
        let total = self.success_rate
            + self.quality
            + self.efficiency
            + self.robustness
            + self.generalization
            + self.diversity
            + self.innovation;
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            success_rate: self.success_rate / total,
            quality: self.quality / total,
            efficiency: self.efficiency / total,
            robustness: self.robustness / total,
            generalization: self.generalization / total,
            diversity: self.diversity / total,
            innovation: self.innovation / total,
        }
    }

    pub fn fitness(&self, scores: &DimensionScores) -> f64 {
        let w = self.normalized();
        w.success_rate * scores.success_rate
            + w.quality * scores.quality
            + w.efficiency * scores.efficiency
            + w.robustness * scores.robustness
            + w.generalization * scores.generalization
            + w.diversity * scores.diversity
            + w.innovation * scores.innovation
    }
}

/// A candidate prompt produced during an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub run_id: RunId,
    pub iteration: u32,
    pub prompt_text: String,
    pub fitness: f64,
    pub dimension_scores: DimensionScores,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub args: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub query: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub reasoning_steps: Vec<String>,
    pub final_answer: String,
    pub total_tokens: u64,
    pub duration_ms: u64,
}

/// A candidate execution strategy produced while searching for the best way
/// to answer a single query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathCandidate {
    pub id: CandidateId,
    pub run_id: RunId,
    pub generation: u32,
    pub parent_ids: Vec<CandidateId>,
    pub strategy_prompt: String,
    pub accumulated_lessons: Vec<String>,
    pub trace: Option<ExecutionTrace>,
    pub scores: Option<PathScores>,
}

impl PathCandidate {
    pub fn seed(run_id: RunId, strategy_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            generation: 0,
            parent_ids: Vec::new(),
            strategy_prompt: strategy_prompt.into(),
            accumulated_lessons: Vec::new(),
            trace: None,
            scores: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.scores.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRun {
    pub id: RunId,
    pub name: String,
    pub prompt_type: String,
    pub max_iterations: u32,
    pub status: RunStatus,
    pub iterations: u32,
    pub best_score: f64,
    pub best_dimension_scores: Option<DimensionScores>,
    pub dimension_weights: DimensionWeights,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl OptimizationRun {
    pub fn new(name: impl Into<String>, prompt_type: impl Into<String>, max_iterations: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            prompt_type: prompt_type.into(),
            max_iterations,
            status: RunStatus::Running,
            iterations: 0,
            best_score: 0.0,
            best_dimension_scores: None,
            dimension_weights: DimensionWeights::default(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressEventType {
    Progress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub event_type: ProgressEventType,
    pub run_id: RunId,
    pub iteration: u32,
    pub max_iterations: u32,
    pub current_score: f64,
    pub best_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_scores: Option<DimensionScores>,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn progress(run: &OptimizationRun, current_score: f64, dimension_scores: Option<DimensionScores>) -> Self {
        Self {
            event_type: ProgressEventType::Progress,
            run_id: run.id,
            iteration: run.iterations,
            max_iterations: run.max_iterations,
            current_score,
            best_score: run.best_score,
            dimension_scores,
            status: run.status,
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn completed(run: &OptimizationRun) -> Self {
        Self {
            event_type: ProgressEventType::Completed,
            run_id: run.id,
            iteration: run.iterations,
            max_iterations: run.max_iterations,
            current_score: run.best_score,
            best_score: run.best_score,
            dimension_scores: run.best_dimension_scores,
            status: RunStatus::Completed,
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(run: &OptimizationRun, message: impl Into<String>) -> Self {
        Self {
            event_type: ProgressEventType::Failed,
            run_id: run.id,
            iteration: run.iterations,
            max_iterations: run.max_iterations,
            current_score: run.best_score,
            best_score: run.best_score,
            dimension_scores: run.best_dimension_scores,
            status: RunStatus::Failed,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}
