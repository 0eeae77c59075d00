//! Scoring collaborators: the training-example scorer used by the
//! optimization controller and the trace evaluator used by the path-search
//! controller, plus the small arithmetic helpers both rely on.

use crate::types::{DimensionScores, ExecutionTrace, PathScores};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Rough token estimate used for budget accounting: one token per four
/// characters of prompt plus response.
pub fn estimate_tokens(prompt: &str, response: &str) -> u64 {
    ((prompt.len() + response.len()) / 4) as u64
}

pub fn average_dimension_scores(scores: &[DimensionScores]) -> DimensionScores {
    if scores.is_empty() {
        return DimensionScores::default();
    }
    let n = scores.len() as f64;
    let mut sum = DimensionScores::default();
    for s in scores {
        sum.success_rate += s.success_rate;
        sum.quality += s.quality;
        sum.efficiency += s.efficiency;
        sum.robustness += s.robustness;
        sum.generalization += s.generalization;
        sum.diversity += s.diversity;
        sum.innovation += s.innovation;
    }
    DimensionScores {
        success_rate: sum.success_rate / n,
        quality: sum.quality / n,
        efficiency: sum.efficiency / n,
        robustness: sum.robustness / n,
        generalization: sum.generalization / n,
        diversity: sum.diversity / n,
        innovation: sum.innovation / n,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: serde_json::Value,
    pub expected_output: serde_json::Value,
}

/// Scores one candidate prompt against one training or validation example.
#[async_trait]
pub trait CandidateScorer: Send + Sync {
    async fn score(
        &self,
        prompt: &str,
        example: &TrainingExample,
    ) -> Result<(DimensionScores, Option<String>), String>;
}

/// Scores one execution trace, returning both the objective scores and
/// textual feedback the reflection model can mutate against.
#[async_trait]
pub trait PathEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        strategy_prompt: &str,
        trace: &ExecutionTrace,
    ) -> Result<(PathScores, String), String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_divides_combined_length_by_four() {
        assert_eq!(estimate_tokens("abcd", "efgh"), 2);
        assert_eq!(estimate_tokens("", ""), 0);
    }

    #[test]
    fn average_of_empty_slice_is_default() {
        assert_eq!(average_dimension_scores(&[]), DimensionScores::default());
    }

    #[test]
    fn average_dimension_scores_computes_mean() {
        let a = DimensionScores { success_rate: 1.0, ..Default::default() };
        let b = DimensionScores { success_rate: 0.0, ..Default::default() };
        let avg = average_dimension_scores(&[a, b]);
        assert!((avg.success_rate - 0.5).abs() < 1e-9);
    }
}
