//! Per-turn agent orchestration: retrieve memories, filter them for
//! relevance, pick at most one tool, then run a bounded tool loop.
//!
//! Grounded on the teacher's self-ask-with-search shape
//! (`skill-runtime/src/generation/streaming.rs`'s `AgentStep`), generalized
//! from a fixed self-ask protocol into retrieval + single-tool-selection +
//! bounded loop, and on its detached-task idiom
//! (`skill-runtime/src/jobs/worker.rs`) for the background memory
//! extraction that follows a turn.

use crate::errors::{AgentError, Result};
use crate::memory::Memory;
use crate::types::{AgentMessage, AgentRunResult, MemoryCandidate, ToolUse};
use gepa_optimizer::{ChatMessage, CompletionRequest, LlmProvider, ToolCallIntent, ToolSpec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tool_adapter::ToolRegistry;
use tracing::{info, instrument, warn};

fn default_rag_candidate_limit() -> usize {
    15
}
fn default_max_tool_iterations() -> u32 {
    5
}
fn default_memory_extraction_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_rag_candidate_limit")]
    pub rag_candidate_limit: usize,
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,
    #[serde(default = "default_memory_extraction_timeout_ms")]
    pub memory_extraction_timeout_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            rag_candidate_limit: default_rag_candidate_limit(),
            max_tool_iterations: default_max_tool_iterations(),
            memory_extraction_timeout_ms: default_memory_extraction_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RelevanceFilterResponse {
    #[serde(default)]
    relevant_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ToolSelectionResponse {
    tool_name: Option<String>,
    #[serde(default)]
    arguments: serde_json::Value,
}

pub struct AgentController {
    llm: Arc<dyn LlmProvider>,
    memory: Arc<dyn Memory>,
    tools: Arc<dyn ToolRegistry>,
    config: AgentConfig,
}

impl AgentController {
    pub fn new(llm: Arc<dyn LlmProvider>, memory: Arc<dyn Memory>, tools: Arc<dyn ToolRegistry>, config: AgentConfig) -> Self {
        Self { llm, memory, tools, config }
    }

    #[instrument(skip(self, query, cancel), fields(query_len = query.len()))]
    pub async fn run(&self, query: &str, cancel: CancellationToken) -> Result<AgentRunResult> {
        let candidates = self.memory.search(query, self.config.rag_candidate_limit).await;
        let relevant = self.filter_relevant(query, candidates).await;

        let tool_use = if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        } else {
            self.select_tool(query, &relevant).await?
        };

        let message = self.run_tool_loop(query, &relevant, tool_use, cancel.clone()).await?;

        let extraction_memory = self.memory.clone();
        let extracted_content = message.content.clone();
        let timeout_ms = self.config.memory_extraction_timeout_ms;
        tokio::spawn(async move {
            let outcome = tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                extraction_memory.store(extracted_content, serde_json::json!({"source": "agent_turn"})),
            )
            .await;
            if outcome.is_err() {
                warn!("memory extraction task timed out");
            }
        });

        Ok(AgentRunResult { iterations: message.tool_uses.len() as u32, relevant_memories: relevant, message })
    }

    async fn filter_relevant(&self, query: &str, candidates: Vec<MemoryCandidate>) -> Vec<MemoryCandidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let listing = candidates
            .iter()
            .map(|c| format!("{}: {}", c.id, c.content))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Query: {query}\n\nCandidate memories:\n{listing}\n\n\
             Return JSON {{\"relevant_ids\": [...]}} listing only the ids of memories\
             truly relevant to answering the query."
        );
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)]);

        let parsed = match self.llm.complete(&request).await {
            Ok(response) => serde_json::from_str::<RelevanceFilterResponse>(&response.content).ok(),
            Err(_) => None,
        };

        match parsed {
            Some(filtered) if !filtered.relevant_ids.is_empty() => candidates
                .into_iter()
                .filter(|c| filtered.relevant_ids.contains(&c.id.to_string()))
                .collect(),
            _ => {
                // Fall back to the top 3 by retrieval similarity.
                let mut ranked = candidates;
                ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
                ranked.truncate(3);
                ranked
            }
        }
    }

    async fn select_tool(&self, query: &str, memories: &[MemoryCandidate]) -> Result<Option<ToolCallIntent>> {
        let available = self.tools.list().await;
        if available.is_empty() {
            return Ok(None);
        }

        let tool_listing = available
            .iter()
            .map(|t| format!("{}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");
        let memory_listing = memories.iter().map(|m| m.content.clone()).collect::<Vec<_>>().join("\n");
        let prompt = format!(
            "Query: {query}\n\nRelevant context:\n{memory_listing}\n\nAvailable tools:\n{tool_listing}\n\n\
             Return JSON {{\"tool_name\": <name or null>, \"arguments\": {{...}}}} selecting at most one tool."
        );
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)]);
        let response = self.llm.complete(&request).await.map_err(AgentError::Llm)?;

        match serde_json::from_str::<ToolSelectionResponse>(&response.content) {
            Ok(ToolSelectionResponse { tool_name: Some(name), arguments }) if !name.is_empty() => {
                Ok(Some(ToolCallIntent { name, arguments }))
            }
            _ => Ok(None),
        }
    }

    async fn run_tool_loop(
        &self,
        query: &str,
        memories: &[MemoryCandidate],
        initial_tool: Option<ToolCallIntent>,
        cancel: CancellationToken,
    ) -> Result<AgentMessage> {
        let memory_listing = memories.iter().map(|m| m.content.clone()).collect::<Vec<_>>().join("\n");
        let mut messages = vec![
            ChatMessage::system(format!("Relevant context:\n{memory_listing}")),
            ChatMessage::user(query),
        ];
        let mut tool_uses = Vec::new();
        let mut pending = initial_tool;
        let mut content = String::new();

        for _ in 0..self.config.max_tool_iterations {
            if cancel.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            if let Some(intent) = pending.take() {
                let mut tool_use = ToolUse::requested(intent.name.clone(), intent.arguments.clone());
                match self.execute_tool(&intent).await {
                    Ok(result) => {
                        messages.push(ChatMessage::tool(result.to_string()));
                        tool_use.result = Some(result);
                    }
                    Err(error) => {
                        messages.push(ChatMessage::tool(format!("error: {error}")));
                        tool_use.error = Some(error.to_string());
                    }
                }
                tool_uses.push(tool_use);
            }

            let tools = self.tools.list().await;
            let tool_specs = tools
                .into_iter()
                .map(|t| ToolSpec { name: t.name, description: t.description, input_schema: t.input_schema })
                .collect();
            let request = CompletionRequest::new(messages.clone()).with_tools(tool_specs);
            let response = self.llm.complete(&request).await.map_err(AgentError::Llm)?;

            if response.tool_calls.is_empty() {
                content = response.content;
                break;
            }

            messages.push(ChatMessage::assistant(response.content.clone()));
            pending = response.tool_calls.into_iter().next();
            content = response.content;
        }

        info!(tool_calls = tool_uses.len(), "agent turn completed");
        Ok(AgentMessage { content, tool_uses })
    }

    async fn execute_tool(&self, intent: &ToolCallIntent) -> std::result::Result<serde_json::Value, String> {
        let handle = self
            .tools
            .get(&intent.name)
            .await
            .ok_or_else(|| format!("tool '{}' not found", intent.name))?;
        handle.executor.execute(intent.arguments.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMemory;
    use async_trait::async_trait;
    use gepa_optimizer::MockLlmProvider;
    use tool_adapter::InMemoryToolRegistry;

    #[tokio::test]
    async fn run_completes_without_any_tools_registered() {
        let llm = Arc::new(MockLlmProvider::new("main", "mock-1"));
        let memory = Arc::new(InMemoryMemory::new());
        memory.seed("deploy pipeline notes").await;
        let tools = InMemoryToolRegistry::new();

        let controller = AgentController::new(llm, memory, tools, AgentConfig::default());
        let result = controller.run("how do I deploy", CancellationToken::new()).await.unwrap();

        assert!(result.message.tool_uses.is_empty());
        assert!(result.message.content.contains("mock-response"));
    }

    #[tokio::test]
    async fn run_is_cancellable_before_tool_selection() {
        let llm = Arc::new(MockLlmProvider::new("main", "mock-1"));
        let memory = Arc::new(InMemoryMemory::new());
        let tools = InMemoryToolRegistry::new();
        let controller = AgentController::new(llm, memory, tools, AgentConfig::default());

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = controller.run("anything", cancel).await;
        assert!(matches!(result, Err(AgentError::Cancelled)));
    }

    struct EchoExecutor;

    #[async_trait]
    impl tool_adapter::ToolExecutor for EchoExecutor {
        async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<serde_json::Value, String> {
            Ok(arguments)
        }
    }

    #[tokio::test]
    async fn select_tool_returns_none_when_llm_output_is_not_valid_json() {
        let llm = Arc::new(MockLlmProvider::new("main", "mock-1").with_canned("not json"));
        let memory = Arc::new(InMemoryMemory::new());
        let tools = InMemoryToolRegistry::new();
        tools
            .register(
                mcp_client::ToolDescriptor {
                    name: "echo".to_string(),
                    description: "echoes input".to_string(),
                    input_schema: serde_json::json!({"type": "object"}),
                },
                Arc::new(EchoExecutor),
            )
            .await;

        let controller = AgentController::new(llm, memory, tools, AgentConfig::default());
        let selected = controller.select_tool("q", &[]).await.unwrap();
        assert!(selected.is_none());
    }
}
