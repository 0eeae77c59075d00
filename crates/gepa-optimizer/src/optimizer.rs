//! GEPA-style evolutionary prompt optimizer: evolves a population of
//! candidate prompts for one signature, tracked in a Pareto archive, with
//! reflective mutation by a stronger model every few generations.

use crate::archive::ParetoArchive;
use crate::errors::{OptimizerError, Result};
use crate::llm_provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::publisher::ProgressPublisher;
use crate::scoring::{average_dimension_scores, CandidateScorer, TrainingExample};
use crate::store::{CandidateStore, OptimizationRunStore};
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info, warn};

fn default_population_size() -> usize {
    20
}
fn default_mutation_rate() -> f64 {
    0.3
}
fn default_crossover_rate() -> f64 {
    0.7
}
fn default_elitism_rate() -> f64 {
    0.1
}
fn default_reflection_every_n_generations() -> u32 {
    2
}
fn default_reflection_depth() -> u32 {
    3
}
fn default_tournament_size() -> usize {
    3
}
fn default_convergence_threshold() -> f64 {
    0.01
}
fn default_stagnation_limit() -> u32 {
    3
}
fn default_concurrency() -> usize {
    3
}
fn default_temperature() -> f32 {
    0.8
}
fn default_max_tokens() -> u32 {
    500
}
fn default_archive_capacity() -> usize {
    50
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    #[serde(default = "default_elitism_rate")]
    pub elitism_rate: f64,
    #[serde(default = "default_reflection_every_n_generations")]
    pub reflection_every_n_generations: u32,
    #[serde(default = "default_reflection_depth")]
    pub reflection_depth: u32,
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
    #[serde(default = "default_stagnation_limit")]
    pub stagnation_limit: u32,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_archive_capacity")]
    pub archive_capacity: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            crossover_rate: default_crossover_rate(),
            elitism_rate: default_elitism_rate(),
            reflection_every_n_generations: default_reflection_every_n_generations(),
            reflection_depth: default_reflection_depth(),
            tournament_size: default_tournament_size(),
            convergence_threshold: default_convergence_threshold(),
            stagnation_limit: default_stagnation_limit(),
            concurrency: default_concurrency(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            archive_capacity: default_archive_capacity(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    pub name: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
    pub seed_prompt: String,
}

pub struct OptimizationController {
    main_llm: Arc<dyn LlmProvider>,
    reflection_llm: Option<Arc<dyn LlmProvider>>,
    scorer: Arc<dyn CandidateScorer>,
    publisher: Arc<ProgressPublisher>,
    run_store: Arc<dyn OptimizationRunStore>,
    candidate_store: Arc<dyn CandidateStore>,
    config: OptimizerConfig,
}

impl OptimizationController {
    pub fn new(
        main_llm: Arc<dyn LlmProvider>,
        reflection_llm: Option<Arc<dyn LlmProvider>>,
        scorer: Arc<dyn CandidateScorer>,
        publisher: Arc<ProgressPublisher>,
        run_store: Arc<dyn OptimizationRunStore>,
        candidate_store: Arc<dyn CandidateStore>,
        config: OptimizerConfig,
    ) -> Arc<Self> {
        Arc::new(Self { main_llm, reflection_llm, scorer, publisher, run_store, candidate_store, config })
    }

    fn reflection_llm(&self) -> &Arc<dyn LlmProvider> {
        self.reflection_llm.as_ref().unwrap_or(&self.main_llm)
    }

    /// Starts a detached, cancellation-independent optimization run and
    /// returns its id immediately; progress is reported through the
    /// publisher.
    #[tracing::instrument(skip(self, training, validation), fields(signature = %signature.name))]
    pub async fn optimize_signature(
        self: Arc<Self>,
        signature: Signature,
        training: Vec<TrainingExample>,
        validation: Vec<TrainingExample>,
        max_iterations: u32,
        weights: Option<DimensionWeights>,
    ) -> RunId {
        let mut run = OptimizationRun::new(signature.name.clone(), signature.name.clone(), max_iterations);
        run.dimension_weights = weights.unwrap_or_default().normalized();
        let run_id = run.id;
        self.run_store.save(run).await;

        let controller = self.clone();
        let handle = tokio::spawn(async move {
            controller.run_loop(run_id, signature, training, validation).await
        });

        let watchdog = self.clone();
        tokio::spawn(async move {
            if let Err(join_err) = handle.await {
                error!(%run_id, error = %join_err, "optimization task terminated abnormally");
                if let Some(mut run) = watchdog.run_store.get(run_id).await {
                    run.status = RunStatus::Failed;
                    watchdog.publisher.publish(ProgressEvent::failed(&run, join_err.to_string())).await;
                    watchdog.run_store.save(run).await;
                }
                watchdog.publisher.close(run_id).await;
            }
        });

        run_id
    }

    async fn run_loop(
        &self,
        run_id: RunId,
        signature: Signature,
        training: Vec<TrainingExample>,
        validation: Vec<TrainingExample>,
    ) {
        if let Err(e) = self.run_loop_inner(run_id, &signature, &training, &validation).await {
            warn!(%run_id, error = %e, "optimization run failed");
            if let Some(mut run) = self.run_store.get(run_id).await {
                run.status = RunStatus::Failed;
                self.publisher.publish(ProgressEvent::failed(&run, e.to_string())).await;
                self.run_store.save(run).await;
            }
        }
        self.publisher.close(run_id).await;
    }

    async fn run_loop_inner(
        &self,
        run_id: RunId,
        signature: &Signature,
        training: &[TrainingExample],
        validation: &[TrainingExample],
    ) -> Result<()> {
        let mut run = self.run_store.get(run_id).await.ok_or_else(|| OptimizerError::RunNotFound(run_id.to_string()))?;

        let generations = (run.max_iterations / 10).max(1);
        let mut archive: ParetoArchive<Candidate> = ParetoArchive::new(self.config.archive_capacity);
        let mut rng = rand::rng();

        let mut population: Vec<String> = vec![signature.seed_prompt.clone()];
        while population.len() < self.config.population_size {
            population.push(signature.seed_prompt.clone());
        }

        let mut best_fitness_seen = 0.0_f64;
        let mut stagnant_generations = 0_u32;

        for generation in 0..generations {
            let mut generation_candidates = Vec::with_capacity(population.len());
            for prompt_text in &population {
                let candidate = self.evaluate_candidate(run_id, generation, prompt_text, training, &run.dimension_weights).await?;
                generation_candidates.push(candidate.clone());
                archive.add(candidate);
            }

            run.iterations = generation + 1;
            if let Some(best) = archive.get_best_by_quality() {
                run.best_score = best.fitness;
                run.best_dimension_scores = Some(best.dimension_scores);
            }
            self.run_store.save(run.clone()).await;

            let improvement = run.best_score - best_fitness_seen;
            if improvement < self.config.convergence_threshold {
                stagnant_generations += 1;
            } else {
                stagnant_generations = 0;
            }
            best_fitness_seen = run.best_score;

            if stagnant_generations >= self.config.stagnation_limit {
                info!(%run_id, generation, "optimization converged, stopping early");
                break;
            }

            let use_reflection = generation % self.config.reflection_every_n_generations == 0;
            population = self
                .next_generation(&archive, &generation_candidates, use_reflection, &mut rng)
                .await?;
        }

        let mut persisted = 0u32;
        for candidate in archive.pareto_front() {
            self.candidate_store.save(candidate.clone()).await;
            persisted += 1;
            if persisted % 5 == 0 {
                self.publisher.publish(ProgressEvent::progress(&run, candidate.fitness, Some(candidate.dimension_scores))).await;
            }
        }

        if !validation.is_empty() {
            if let Some(best) = archive.get_best_by_quality() {
                let mut validation_scores = Vec::with_capacity(validation.len());
                for example in validation {
                    let (scores, _feedback) = self
                        .scorer
                        .score(&best.prompt_text, example)
                        .await
                        .map_err(OptimizerError::ScoringError)?;
                    validation_scores.push(scores);
                }
                let averaged = average_dimension_scores(&validation_scores);
                let validation_fitness = run.dimension_weights.fitness(&averaged);
                // Conservative reporting: never let validation look better
                // than the training-time estimate suggested.
                if validation_fitness < run.best_score {
                    run.best_score = validation_fitness;
                    run.best_dimension_scores = Some(averaged);
                }
            }
        }

        run.status = RunStatus::Completed;
        run.completed_at = Some(chrono::Utc::now());
        self.run_store.save(run.clone()).await;
        self.publisher.publish(ProgressEvent::completed(&run)).await;
        Ok(())
    }

    async fn evaluate_candidate(
        &self,
        run_id: RunId,
        generation: u32,
        prompt_text: &str,
        training: &[TrainingExample],
        weights: &DimensionWeights,
    ) -> Result<Candidate> {
        let mut scores = Vec::with_capacity(training.len().max(1));
        for example in training {
            let (s, _feedback) = self.scorer.score(prompt_text, example).await.map_err(OptimizerError::ScoringError)?;
            scores.push(s);
        }
        let dimension_scores = average_dimension_scores(&scores);
        let fitness = weights.fitness(&dimension_scores);

        Ok(Candidate {
            id: uuid::Uuid::new_v4(),
            run_id,
            iteration: generation,
            prompt_text: prompt_text.to_string(),
            fitness,
            dimension_scores,
        })
    }

    async fn next_generation(
        &self,
        archive: &ParetoArchive<Candidate>,
        current: &[Candidate],
        use_reflection: bool,
        rng: &mut impl Rng,
    ) -> Result<Vec<String>> {
        let population_size = self.config.population_size;
        let elitism_count = ((population_size as f64) * self.config.elitism_rate).ceil() as usize;

        let mut next = Vec::with_capacity(population_size);

        let mut by_fitness = current.to_vec();
        by_fitness.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
        for elite in by_fitness.iter().take(elitism_count) {
            next.push(elite.prompt_text.clone());
        }

        while next.len() < population_size {
            let roll: f64 = rng.random();
            if roll < self.config.crossover_rate && archive.size() >= 2 {
                if let Some((a, b)) = archive.select_diverse_pair() {
                    let child = self.crossover(&a, &b).await?;
                    next.push(child);
                    continue;
                }
            }

            let parent = self.tournament_select(current, rng);
            if roll < self.config.crossover_rate + self.config.mutation_rate {
                let mutated = self.mutate(parent, use_reflection).await?;
                next.push(mutated);
            } else {
                next.push(parent.prompt_text.clone());
            }
        }

        Ok(next)
    }

    fn tournament_select<'a>(&self, population: &'a [Candidate], rng: &mut impl Rng) -> &'a Candidate {
        let size = self.config.tournament_size.min(population.len()).max(1);
        population
            .choose_multiple(rng, size)
            .max_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap())
            .unwrap_or(&population[0])
    }

    async fn mutate(&self, parent: &Candidate, use_reflection: bool) -> Result<String> {
        let llm = if use_reflection { self.reflection_llm() } else { &self.main_llm };
        let request = CompletionRequest::new(vec![
            ChatMessage::system("Rewrite the following prompt to improve its effectiveness while preserving its intent."),
            ChatMessage::user(parent.prompt_text.clone()),
        ])
        .temperature(self.config.temperature)
        .max_tokens(self.config.max_tokens);

        let response = llm.complete(&request).await.map_err(OptimizerError::LlmError)?;
        Ok(response.content)
    }

    async fn crossover(&self, a: &Candidate, b: &Candidate) -> Result<String> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("Combine the strongest aspects of these two prompts into one improved prompt."),
            ChatMessage::user(format!("Prompt A:\n{}\n\nPrompt B:\n{}", a.prompt_text, b.prompt_text)),
        ])
        .temperature(self.config.temperature)
        .max_tokens(self.config.max_tokens);

        let response = self.reflection_llm().complete(&request).await.map_err(OptimizerError::LlmError)?;
        Ok(response.content)
    }

    /// Adjusts the run's live dimension weights based on categorical
    /// feedback, then renormalizes.
    pub fn apply_feedback_to_weights(weights: &DimensionWeights, feedback: &str) -> DimensionWeights {
        let mut adjusted = *weights;
        match feedback {
            "too_slow" => adjusted.efficiency += 0.1,
            "low_quality" => adjusted.quality += 0.1,
            "inconsistent" => adjusted.robustness += 0.1,
            "narrow" => adjusted.generalization += 0.1,
            "repetitive" => adjusted.diversity += 0.1,
            "stale" => adjusted.innovation += 0.1,
            _ => {}
        }
        adjusted.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_provider::MockLlmProvider;
    use crate::store::{InMemoryCandidateStore, InMemoryRunStore};
    use async_trait::async_trait;

    struct FixedScorer(f64);

    #[async_trait]
    impl CandidateScorer for FixedScorer {
        async fn score(&self, _prompt: &str, _example: &TrainingExample) -> std::result::Result<(DimensionScores, Option<String>), String> {
            Ok((DimensionScores { success_rate: self.0, quality: self.0, ..Default::default() }, None))
        }
    }

    fn sample_examples() -> Vec<TrainingExample> {
        vec![TrainingExample { input: serde_json::json!({"q": "1"}), expected_output: serde_json::json!("a") }]
    }

    #[tokio::test]
    async fn optimize_signature_completes_and_reports_progress() {
        let controller = OptimizationController::new(
            Arc::new(MockLlmProvider::new("main", "m1")),
            None,
            Arc::new(FixedScorer(0.7)),
            Arc::new(ProgressPublisher::new()),
            Arc::new(InMemoryRunStore::new()),
            Arc::new(InMemoryCandidateStore::new()),
            OptimizerConfig { population_size: 4, ..Default::default() },
        );

        let signature = Signature {
            name: "demo".into(),
            input_schema: serde_json::json!({}),
            output_schema: serde_json::json!({}),
            seed_prompt: "answer the question".into(),
        };

        let run_id = controller.clone().optimize_signature(signature, sample_examples(), vec![], 10, None).await;

        let run = loop {
            if let Some(run) = controller.run_store.get(run_id).await {
                if run.status != RunStatus::Running {
                    break run;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        };

        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.best_score > 0.0);
    }

    #[test]
    fn feedback_adjusts_and_renormalizes_weights() {
        let base = DimensionWeights::default();
        let adjusted = OptimizationController::apply_feedback_to_weights(&base, "too_slow");
        assert!(adjusted.efficiency > base.efficiency);
        let sum = adjusted.success_rate
            + adjusted.quality
            + adjusted.efficiency
            + adjusted.robustness
            + adjusted.generalization
            + adjusted.diversity
            + adjusted.innovation;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
