use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("run '{0}' not found")]
    RunNotFound(String),

    #[error("candidate '{0}' not found")]
    CandidateNotFound(String),

    #[error("language model call failed: {0}")]
    LlmError(String),

    #[error("scoring failed: {0}")]
    ScoringError(String),

    #[error("budget exhausted: {0}")]
    BudgetExhausted(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
