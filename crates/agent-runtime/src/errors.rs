use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("language model call failed: {0}")]
    Llm(String),

    #[error("tool '{0}' not found in registry")]
    ToolNotFound(String),

    #[error("tool execution failed: {0}")]
    ToolFailed(String),

    #[error("run was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AgentError>;
