//! End-to-end demo wiring the whole fabric together against in-memory
//! fakes: no real MCP server, LM provider, or vector store is contacted.
//! Run with `cargo run -p workspace-examples`.

use agent_runtime::{AgentConfig, AgentController, InMemoryMemory};
use anyhow::Result;
use async_trait::async_trait;
use gepa_optimizer::{
    CandidateScorer, DimensionScores, InMemoryCandidateStore, InMemoryRunStore, MockLlmProvider,
    OptimizationController, OptimizerConfig, ProgressPublisher, Signature, TrainingExample,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tool_adapter::{InMemoryToolRegistry, ToolExecutor};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct DemoEchoTool;

#[async_trait]
impl ToolExecutor for DemoEchoTool {
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<serde_json::Value, String> {
        Ok(serde_json::json!({"echoed": arguments}))
    }
}

struct LengthScorer;

#[async_trait]
impl CandidateScorer for LengthScorer {
    async fn score(
        &self,
        prompt: &str,
        _example: &TrainingExample,
    ) -> std::result::Result<(DimensionScores, Option<String>), String> {
        let quality = (prompt.len() as f64 / 200.0).min(1.0);
        Ok((
            DimensionScores { success_rate: 0.8, quality, efficiency: 0.7, ..Default::default() },
            None,
        ))
    }
}

async fn run_optimizer_demo() -> Result<()> {
    let llm = Arc::new(MockLlmProvider::new("demo", "mock-1"));
    let publisher = Arc::new(ProgressPublisher::new());
    let controller = OptimizationController::new(
        llm,
        None,
        Arc::new(LengthScorer),
        publisher.clone(),
        Arc::new(InMemoryRunStore::new()),
        Arc::new(InMemoryCandidateStore::new()),
        OptimizerConfig::default(),
    );

    let signature = Signature {
        name: "summarize".to_string(),
        input_schema: serde_json::json!({"type": "object"}),
        output_schema: serde_json::json!({"type": "string"}),
        seed_prompt: "Summarize the following text in two sentences.".to_string(),
    };
    let training = vec![TrainingExample {
        input: serde_json::json!({"text": "..."}),
        expected_output: serde_json::json!("a summary"),
    }];

    let run_id = controller.clone().optimize_signature(signature, training, Vec::new(), 10, None).await;
    let mut progress = publisher.subscribe(run_id).await;

    while let Some(event) = progress.recv().await {
        let event_type = event.event_type;
        info!(?event_type, score = event.best_score, "optimizer progress");
        if matches!(event_type, gepa_optimizer::ProgressEventType::Completed | gepa_optimizer::ProgressEventType::Failed) {
            break;
        }
    }
    Ok(())
}

async fn run_agent_demo() -> Result<()> {
    let llm = Arc::new(MockLlmProvider::new("demo", "mock-1"));
    let memory = Arc::new(InMemoryMemory::new());
    memory.seed("the deploy pipeline runs on kubernetes with helm charts").await;

    let registry = InMemoryToolRegistry::new();
    registry
        .register(
            mcp_client::ToolDescriptor {
                name: "echo".to_string(),
                description: "echoes its arguments back".to_string(),
                input_schema: serde_json::json!({"type": "object"}),
            },
            Arc::new(DemoEchoTool),
        )
        .await;

    let agent = AgentController::new(llm, memory, registry, AgentConfig::default());
    let result = agent.run("how is the deploy pipeline set up?", CancellationToken::new()).await?;
    info!(answer = %result.message.content, tool_calls = result.iterations, "agent turn finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("running optimizer demo");
    run_optimizer_demo().await?;

    info!("running agent demo");
    run_agent_demo().await?;

    Ok(())
}
