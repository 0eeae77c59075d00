//! Per-query path-search controller: evolves "strategy prompts" for a single
//! query instead of a whole training set, executing each candidate in either
//! a single-turn or a bounded multi-turn tool loop and scoring the resulting
//! trace with a `PathEvaluator`.
//!
//! Grounded on the same evolutionary shape as [`crate::optimizer`], reusing
//! [`crate::archive::ParetoArchive`] over `PathCandidate`/`PathScores`
//! instead of `Candidate`/`DimensionScores`.

use crate::archive::ParetoArchive;
use crate::errors::{OptimizerError, Result};
use crate::llm_provider::{ChatMessage, CompletionRequest, LlmProvider, ToolCallIntent, ToolSpec};
use crate::scoring::{estimate_tokens, PathEvaluator};
use crate::types::{ExecutionTrace, PathCandidate, PathScores, RunId, ToolCallRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const MAX_TOOL_LOOP_ITERATIONS: u32 = 5;

fn default_max_generations() -> u32 {
    5
}
fn default_branches_per_gen() -> u32 {
    3
}
fn default_target_score() -> f64 {
    0.85
}
fn default_max_tool_calls() -> u32 {
    100
}
fn default_max_llm_calls() -> u32 {
    50
}
fn default_archive_size() -> usize {
    50
}
fn default_execution_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSearchConfig {
    #[serde(default = "default_max_generations")]
    pub max_generations: u32,
    #[serde(default = "default_branches_per_gen")]
    pub branches_per_gen: u32,
    #[serde(default = "default_target_score")]
    pub target_score: f64,
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,
    #[serde(default = "default_max_llm_calls")]
    pub max_llm_calls: u32,
    #[serde(default = "default_archive_size")]
    pub archive_capacity: usize,
    #[serde(default = "default_execution_timeout_ms")]
    pub execution_timeout_ms: u64,
}

impl Default for PathSearchConfig {
    fn default() -> Self {
        Self {
            max_generations: default_max_generations(),
            branches_per_gen: default_branches_per_gen(),
            target_score: default_target_score(),
            max_tool_calls: default_max_tool_calls(),
            max_llm_calls: default_max_llm_calls(),
            archive_capacity: default_archive_size(),
            execution_timeout_ms: default_execution_timeout_ms(),
        }
    }
}

/// Execution surface a strategy prompt can draw on. Intentionally separate
/// from `tool-adapter`'s `ToolExecutor`: this crate has no dependency on
/// MCP, and a host wires a concrete runner (backed by a tool registry or a
/// test double) in at call time.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    fn available_tools(&self) -> Vec<ToolSpec>;
    async fn call(&self, name: &str, arguments: serde_json::Value) -> std::result::Result<serde_json::Value, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    SingleTurn,
    MultiTurn,
}

struct Budgets {
    tool_calls_used: u32,
    llm_calls_used: u32,
    max_tool_calls: u32,
    max_llm_calls: u32,
}

impl Budgets {
    fn new(config: &PathSearchConfig) -> Self {
        Self {
            tool_calls_used: 0,
            llm_calls_used: 0,
            max_tool_calls: config.max_tool_calls,
            max_llm_calls: config.max_llm_calls,
        }
    }

    fn tool_calls_exhausted(&self) -> bool {
        self.tool_calls_used >= self.max_tool_calls
    }

    fn llm_calls_exhausted(&self) -> bool {
        self.llm_calls_used >= self.max_llm_calls
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub run_id: RunId,
    pub best_path: PathCandidate,
    pub answer: String,
    pub score: f64,
    pub generations_run: u32,
}

pub struct PathSearchController {
    main_llm: Arc<dyn LlmProvider>,
    reflection_llm: Option<Arc<dyn LlmProvider>>,
    evaluator: Arc<dyn PathEvaluator>,
    tool_runner: Option<Arc<dyn ToolRunner>>,
    config: PathSearchConfig,
}

impl PathSearchController {
    pub fn new(
        main_llm: Arc<dyn LlmProvider>,
        evaluator: Arc<dyn PathEvaluator>,
        config: PathSearchConfig,
    ) -> Self {
        Self { main_llm, reflection_llm: None, evaluator, tool_runner: None, config }
    }

    pub fn with_reflection_llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.reflection_llm = Some(llm);
        self
    }

    pub fn with_tool_runner(mut self, runner: Arc<dyn ToolRunner>) -> Self {
        self.tool_runner = Some(runner);
        self
    }

    fn reflection_llm(&self) -> &Arc<dyn LlmProvider> {
        self.reflection_llm.as_ref().unwrap_or(&self.main_llm)
    }

    fn execution_mode(&self) -> ExecutionMode {
        if self.tool_runner.is_some() {
            ExecutionMode::MultiTurn
        } else {
            ExecutionMode::SingleTurn
        }
    }

    /// Search for the best strategy to answer `query`, seeding the first
    /// generation with `seed_prompt`.
    #[instrument(skip(self, query, seed_prompt), fields(query_len = query.len()))]
    pub async fn search(&self, query: &str, seed_prompt: &str) -> Result<SearchResult> {
        let run_id = Uuid::new_v4();
        let mut archive: ParetoArchive<PathCandidate> = ParetoArchive::new(self.config.archive_capacity);
        let mut budgets = Budgets::new(&self.config);
        let mut lessons: Vec<String> = Vec::new();
        let mut frontier = vec![PathCandidate::seed(run_id, seed_prompt)];
        let mut generations_run = 0u32;

        'generations: for generation in 0..self.config.max_generations {
            generations_run = generation + 1;

            for candidate in frontier.drain(..) {
                if budgets.tool_calls_exhausted() || budgets.llm_calls_exhausted() {
                    warn!(run_id = %run_id, "budget exhausted before generation finished");
                    break 'generations;
                }
                let scored = self.evaluate_path(candidate, query, &mut budgets).await?;
                if let Some(feedback) = scored.accumulated_lessons.last() {
                    lessons.push(feedback.clone());
                }
                let score = scored.scores.as_ref().map(|s| s.answer_quality).unwrap_or(0.0);
                archive.add(scored);

                if score >= self.config.target_score {
                    info!(run_id = %run_id, score, "target score reached, stopping early");
                    break 'generations;
                }
            }

            if budgets.tool_calls_exhausted() || budgets.llm_calls_exhausted() {
                break;
            }

            frontier = self
                .next_branches(run_id, generation + 1, &archive, &lessons, &mut budgets)
                .await?;
            if frontier.is_empty() {
                break;
            }
        }

        let best = archive
            .get_best_by_quality()
            .ok_or_else(|| OptimizerError::InvalidConfig("no scored path candidates produced".to_string()))?;
        let answer = best
            .trace
            .as_ref()
            .map(|t| t.final_answer.clone())
            .unwrap_or_default();
        let score = best.scores.as_ref().map(|s| s.answer_quality).unwrap_or(0.0);

        Ok(SearchResult { run_id, best_path: best, answer, score, generations_run })
    }

    async fn evaluate_path(
        &self,
        mut candidate: PathCandidate,
        query: &str,
        budgets: &mut Budgets,
    ) -> Result<PathCandidate> {
        let timeout = std::time::Duration::from_millis(self.config.execution_timeout_ms);
        let trace = tokio::time::timeout(timeout, self.execute_strategy(query, &candidate.strategy_prompt, budgets))
            .await
            .map_err(|_| OptimizerError::BudgetExhausted("execution timed out".to_string()))??;
        let (scores, feedback) = self
            .evaluator
            .evaluate(&candidate.strategy_prompt, &trace)
            .await
            .map_err(OptimizerError::ScoringError)?;
        candidate.trace = Some(trace);
        candidate.scores = Some(scores);
        candidate.accumulated_lessons.push(feedback);
        Ok(candidate)
    }

    /// Runs one strategy prompt against the query, in single-turn or bounded
    /// multi-turn mode depending on whether a `ToolRunner` was configured.
    async fn execute_strategy(
        &self,
        query: &str,
        strategy_prompt: &str,
        budgets: &mut Budgets,
    ) -> Result<ExecutionTrace> {
        let start = Instant::now();
        let mut reasoning_steps = Vec::new();
        let mut tool_calls = Vec::new();
        let mut total_tokens = 0u64;

        let tools = self.tool_runner.as_ref().map(|r| r.available_tools()).unwrap_or_default();
        let mut messages = vec![ChatMessage::system(strategy_prompt), ChatMessage::user(query)];

        let final_answer = match self.execution_mode() {
            ExecutionMode::SingleTurn => {
                let request = CompletionRequest::new(messages);
                budgets.llm_calls_used += 1;
                let response = self
                    .main_llm
                    .complete(&request)
                    .await
                    .map_err(OptimizerError::LlmError)?;
                total_tokens += estimate_tokens(strategy_prompt, &response.content);
                for intent in &response.tool_calls {
                    tool_calls.push(unexecuted_intent(intent));
                }
                response.content
            }
            ExecutionMode::MultiTurn => {
                let runner = self.tool_runner.as_ref().expect("multi-turn requires a tool runner");
                let mut answer = String::new();
                for iteration in 0..MAX_TOOL_LOOP_ITERATIONS {
                    if budgets.llm_calls_exhausted() {
                        reasoning_steps.push("llm call budget exhausted".to_string());
                        break;
                    }
                    let request = CompletionRequest::new(messages.clone()).with_tools(tools.clone());
                    budgets.llm_calls_used += 1;
                    let response = self
                        .main_llm
                        .complete(&request)
                        .await
                        .map_err(OptimizerError::LlmError)?;
                    total_tokens += estimate_tokens(strategy_prompt, &response.content);

                    if response.tool_calls.is_empty() {
                        answer = response.content;
                        break;
                    }

                    messages.push(ChatMessage::assistant(response.content.clone()));
                    for intent in &response.tool_calls {
                        if budgets.tool_calls_exhausted() {
                            tool_calls.push(unexecuted_intent(intent));
                            continue;
                        }
                        budgets.tool_calls_used += 1;
                        let record = self.run_tool(runner.as_ref(), intent).await;
                        messages.push(ChatMessage::tool(summarize_tool_result(&record)));
                        tool_calls.push(record);
                    }

                    reasoning_steps.push(format!("iteration {iteration}: {} tool call(s)", response.tool_calls.len()));

                    if iteration + 1 == MAX_TOOL_LOOP_ITERATIONS {
                        answer = "tool loop exhausted without a final answer".to_string();
                    }
                }
                answer
            }
        };

        Ok(ExecutionTrace {
            query: query.to_string(),
            tool_calls,
            reasoning_steps,
            final_answer,
            total_tokens,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn run_tool(&self, runner: &dyn ToolRunner, intent: &ToolCallIntent) -> ToolCallRecord {
        debug!(tool = %intent.name, "executing tool call");
        match runner.call(&intent.name, intent.arguments.clone()).await {
            Ok(result) => ToolCallRecord {
                name: intent.name.clone(),
                args: intent.arguments.clone(),
                result: Some(result),
                success: true,
                error: None,
            },
            Err(error) => ToolCallRecord {
                name: intent.name.clone(),
                args: intent.arguments.clone(),
                result: None,
                success: false,
                error: Some(error),
            },
        }
    }

    async fn next_branches(
        &self,
        run_id: RunId,
        generation: u32,
        archive: &ParetoArchive<PathCandidate>,
        lessons: &[String],
        budgets: &mut Budgets,
    ) -> Result<Vec<PathCandidate>> {
        let parents = archive.select_for_mutation(self.config.branches_per_gen as usize);
        if parents.is_empty() {
            return Ok(Vec::new());
        }

        let recent_lessons = lessons.iter().rev().take(3).cloned().collect::<Vec<_>>().join("\n- ");
        let mut branches = Vec::new();
        for parent in parents {
            if budgets.llm_calls_exhausted() {
                break;
            }
            let prompt = format!(
                "Revise this execution strategy for a better outcome.\n\
                 Current strategy:\n{}\n\n\
                 Lessons from recent attempts:\n- {}\n\n\
                 Return only the revised strategy prompt.",
                parent.strategy_prompt, recent_lessons
            );
            let request = CompletionRequest::new(vec![ChatMessage::user(prompt)]);
            budgets.llm_calls_used += 1;
            let response = self
                .reflection_llm()
                .complete(&request)
                .await
                .map_err(OptimizerError::LlmError)?;

            let mut child = PathCandidate::seed(run_id, response.content.trim().to_string());
            child.generation = generation;
            child.parent_ids = vec![parent.id];
            child.accumulated_lessons = parent.accumulated_lessons.clone();
            branches.push(child);
        }
        Ok(branches)
    }
}

fn unexecuted_intent(intent: &ToolCallIntent) -> ToolCallRecord {
    ToolCallRecord {
        name: intent.name.clone(),
        args: intent.arguments.clone(),
        result: None,
        success: true,
        error: None,
    }
}

fn summarize_tool_result(record: &ToolCallRecord) -> String {
    if record.success {
        record
            .result
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(no result)".to_string())
    } else {
        format!("error: {}", record.error.clone().unwrap_or_default())
    }
}
