//! GEPA-style evolutionary prompt optimizer and per-query path-search
//! controller, sharing one generic Pareto archive.

pub mod archive;
pub mod errors;
pub mod llm_provider;
pub mod optimizer;
pub mod path_search;
pub mod publisher;
pub mod scoring;
pub mod store;
pub mod types;

pub use archive::{ArchiveMember, ParetoArchive, ScoreVector};
pub use errors::{OptimizerError, Result};
pub use llm_provider::{
    ChatMessage, ChatRole, CompletionRequest, LlmChunk, LlmProvider, LlmResponse, LlmStream,
    MockLlmProvider, ToolCallIntent, ToolSpec,
};
pub use optimizer::{OptimizationController, OptimizerConfig, Signature};
pub use path_search::{ExecutionMode, PathSearchConfig, PathSearchController, SearchResult, ToolRunner};
pub use publisher::{Broadcaster, ProgressPublisher, ProgressReceiver};
pub use scoring::{CandidateScorer, PathEvaluator, TrainingExample};
pub use store::{CandidateStore, InMemoryCandidateStore, InMemoryRunStore, OptimizationRunStore};
pub use types::*;
