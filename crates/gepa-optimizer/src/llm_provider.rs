//! Language model capability used by both controllers: a "main" model for
//! ordinary calls and an optional stronger "reflection" model for mutation.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Tool calls the model asked for instead of (or alongside) `content`.
    /// Empty for providers or requests that don't use tool calling.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallIntent>,
}

/// Description of one callable tool offered to the model in a request,
/// independent of any particular tool transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// A tool invocation requested by the model. Recorded as an intent by the
/// caller; whether and how it is executed is up to the execution mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallIntent {
    pub name: String,
    pub arguments: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmChunk {
    pub delta: String,
    pub is_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Tool, content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stop: Vec<String>,
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages, temperature: 0.8, max_tokens: 500, stop: Vec::new(), tools: Vec::new() }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.insert(0, ChatMessage::system(content));
        self
    }

    pub fn temperature(mut self, value: f32) -> Self {
        self.temperature = value.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = value;
        self
    }

    pub fn stop(mut self, words: Vec<String>) -> Self {
        self.stop = words;
        self
    }
}

pub type LlmStream = Pin<Box<dyn Stream<Item = Result<LlmChunk, String>> + Send>>;

/// A language model capability. One implementation can be used as both the
/// main model and the reflection model, or two different ones can.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, String>;
    async fn complete_stream(&self, request: &CompletionRequest) -> Result<LlmStream, String>;
}

/// Deterministic test double: returns a canned response, or echoes the
/// last user message back with a prefix if no canned response is set.
pub struct MockLlmProvider {
    name: String,
    model: String,
    pub canned: std::sync::Mutex<Option<String>>,
}

impl MockLlmProvider {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self { name: name.into(), model: model.into(), canned: std::sync::Mutex::new(None) }
    }

    pub fn with_canned(self, response: impl Into<String>) -> Self {
        *self.canned.lock().unwrap() = Some(response.into());
        self
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, String> {
        let content = match self.canned.lock().unwrap().clone() {
            Some(c) => c,
            None => {
                let last_user = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == ChatRole::User)
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                format!("mock-response: {last_user}")
            }
        };
        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            usage: None,
            finish_reason: Some("stop".to_string()),
            tool_calls: Vec::new(),
        })
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<LlmStream, String> {
        let response = self.complete(request).await?;
        let chunk = LlmChunk { delta: response.content, is_final: true };
        Ok(Box::pin(futures::stream::once(async move { Ok(chunk) })))
    }
}

#[cfg(feature = "ollama")]
pub mod ollama {
    use super::*;
    use ollama_rs::generation::completion::request::GenerationRequest;
    use ollama_rs::Ollama;

    pub struct OllamaProvider {
        client: Ollama,
        model: String,
    }

    impl OllamaProvider {
        pub fn new(host: impl Into<String>, port: u16, model: impl Into<String>) -> Self {
            Self { client: Ollama::new(host.into(), port), model: model.into() }
        }
    }

    #[async_trait]
    impl LlmProvider for OllamaProvider {
        fn name(&self) -> &str {
            "ollama"
        }

        fn model(&self) -> &str {
            &self.model
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, String> {
            let prompt = request
                .messages
                .iter()
                .map(|m| format!("{:?}: {}", m.role, m.content))
                .collect::<Vec<_>>()
                .join("\n");
            let generation = GenerationRequest::new(self.model.clone(), prompt);
            let response = self
                .client
                .generate(generation)
                .await
                .map_err(|e| e.to_string())?;
            Ok(LlmResponse {
                content: response.response,
                model: self.model.clone(),
                usage: None,
                finish_reason: Some("stop".to_string()),
                tool_calls: Vec::new(),
            })
        }

        async fn complete_stream(&self, _request: &CompletionRequest) -> Result<LlmStream, String> {
            Err("streaming is not implemented for the ollama provider".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_echoes_last_user_message_by_default() {
        let provider = MockLlmProvider::new("mock", "mock-1");
        let request = CompletionRequest::new(vec![ChatMessage::user("hello")]);
        let response = provider.complete(&request).await.unwrap();
        assert_eq!(response.content, "mock-response: hello");
    }

    #[tokio::test]
    async fn mock_returns_canned_response_when_set() {
        let provider = MockLlmProvider::new("mock", "mock-1").with_canned("fixed");
        let request = CompletionRequest::new(vec![ChatMessage::user("anything")]);
        let response = provider.complete(&request).await.unwrap();
        assert_eq!(response.content, "fixed");
    }

    #[test]
    fn temperature_clamps_to_valid_range() {
        let request = CompletionRequest::new(vec![]).temperature(5.0);
        assert_eq!(request.temperature, 2.0);
        let request = CompletionRequest::new(vec![]).temperature(-1.0);
        assert_eq!(request.temperature, 0.0);
    }
}
