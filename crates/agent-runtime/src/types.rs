//! Shared data model for one agent turn: retrieved memories, tool
//! invocations, and the resulting message.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCandidate {
    pub id: Uuid,
    pub content: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl MemoryCandidate {
    pub fn new(content: impl Into<String>, score: f64) -> Self {
        Self { id: Uuid::new_v4(), content: content.into(), score, metadata: serde_json::Value::Null }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUse {
    pub id: Uuid,
    pub tool_name: String,
    pub arguments: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ToolUse {
    pub fn requested(tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self { id: Uuid::new_v4(), tool_name: tool_name.into(), arguments, result: None, error: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub content: String,
    pub tool_uses: Vec<ToolUse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunResult {
    pub message: AgentMessage,
    pub iterations: u32,
    pub relevant_memories: Vec<MemoryCandidate>,
}
