//! A bounded, dominance-based Pareto archive shared by both controllers.
//!
//! Single-owner by design (§5 of the design notes): one controller mutates
//! its own archive; no internal locking is attempted here.

use crate::types::{Candidate, DimensionScores, PathCandidate, PathScores};
use uuid::Uuid;

pub trait ScoreVector: Copy {
    fn dominates(&self, other: &Self) -> bool;
    fn distance(&self, other: &Self) -> f64;
}

impl ScoreVector for DimensionScores {
    fn dominates(&self, other: &Self) -> bool {
        DimensionScores::dominates(self, other)
    }
    fn distance(&self, other: &Self) -> f64 {
        self.euclidean_distance(other)
    }
}

impl ScoreVector for PathScores {
    fn dominates(&self, other: &Self) -> bool {
        PathScores::dominates(self, other)
    }
    fn distance(&self, other: &Self) -> f64 {
        self.euclidean_distance(other)
    }
}

pub trait ArchiveMember: Clone {
    type Score: ScoreVector;
    fn id(&self) -> Uuid;
    fn score(&self) -> Self::Score;
    fn fitness(&self) -> f64;
}

impl ArchiveMember for Candidate {
    type Score = DimensionScores;
    fn id(&self) -> Uuid {
        self.id
    }
    fn score(&self) -> DimensionScores {
        self.dimension_scores
    }
    fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl ArchiveMember for PathCandidate {
    type Score = PathScores;
    fn id(&self) -> Uuid {
        self.id
    }
    fn score(&self) -> PathScores {
        self.scores.unwrap_or_default()
    }
    fn fitness(&self) -> f64 {
        let v = self.score().as_vector();
        v.iter().sum::<f64>() / v.len() as f64
    }
}

pub struct ParetoArchive<T: ArchiveMember> {
    capacity: usize,
    members: Vec<T>,
}

impl<T: ArchiveMember> ParetoArchive<T> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), members: Vec::new() }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<&T> {
        self.members.iter().find(|m| m.id() == id)
    }

    /// Add a scored candidate. Any existing member it dominates is removed
    /// first; the candidate is inserted only if nothing remaining dominates
    /// it. If the archive is then over capacity, evict a non-front member
    /// by lowest fitness, falling back to the lowest-fitness member overall.
    pub fn add(&mut self, candidate: T) {
        let score = candidate.score();
        self.members.retain(|m| !score.dominates(&m.score()));

        let dominated_by_existing = self.members.iter().any(|m| m.score().dominates(&score));
        if dominated_by_existing {
            return;
        }

        self.members.push(candidate);

        if self.members.len() > self.capacity {
            self.evict_one();
        }
    }

    fn evict_one(&mut self) {
        let front_ids: Vec<Uuid> = self.pareto_front().iter().map(|m| m.id()).collect();
        let victim = self
            .members
            .iter()
            .filter(|m| !front_ids.contains(&m.id()))
            .min_by(|a, b| a.fitness().partial_cmp(&b.fitness()).unwrap())
            .map(|m| m.id())
            .or_else(|| {
                self.members
                    .iter()
                    .min_by(|a, b| a.fitness().partial_cmp(&b.fitness()).unwrap())
                    .map(|m| m.id())
            });

        if let Some(id) = victim {
            self.members.retain(|m| m.id() != id);
        }
    }

    pub fn pareto_front(&self) -> Vec<T> {
        self.members
            .iter()
            .filter(|candidate| {
                !self
                    .members
                    .iter()
                    .any(|other| other.id() != candidate.id() && other.score().dominates(&candidate.score()))
            })
            .cloned()
            .collect()
    }

    /// Select up to `k` members for mutation, preferring the Pareto front
    /// and padding from the rest (by descending fitness) if the front is
    /// smaller than `k`.
    pub fn select_for_mutation(&self, k: usize) -> Vec<T> {
        let mut front = self.pareto_front();
        front.sort_by(|a, b| b.fitness().partial_cmp(&a.fitness()).unwrap());
        if front.len() >= k {
            front.truncate(k);
            return front;
        }

        let front_ids: Vec<Uuid> = front.iter().map(|m| m.id()).collect();
        let mut rest: Vec<T> = self
            .members
            .iter()
            .filter(|m| !front_ids.contains(&m.id()))
            .cloned()
            .collect();
        rest.sort_by(|a, b| b.fitness().partial_cmp(&a.fitness()).unwrap());

        let remaining = k - front.len();
        front.extend(rest.into_iter().take(remaining));
        front
    }

    pub fn get_best_by_quality(&self) -> Option<T> {
        self.members
            .iter()
            .max_by(|a, b| a.fitness().partial_cmp(&b.fitness()).unwrap())
            .cloned()
    }

    /// The pair within the Pareto front whose scores are farthest apart,
    /// used for crossover diversity.
    pub fn select_diverse_pair(&self) -> Option<(T, T)> {
        let front = self.pareto_front();
        if front.len() < 2 {
            return None;
        }

        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..front.len() {
            for j in (i + 1)..front.len() {
                let d = front[i].score().distance(&front[j].score());
                if best.map(|(_, _, bd)| d > bd).unwrap_or(true) {
                    best = Some((i, j, d));
                }
            }
        }

        best.map(|(i, j, _)| (front[i].clone(), front[j].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RunId;

    fn candidate(run_id: RunId, iteration: u32, fitness: f64, scores: DimensionScores) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            run_id,
            iteration,
            prompt_text: format!("candidate {iteration}"),
            fitness,
            dimension_scores: scores,
        }
    }

    #[test]
    fn front_excludes_dominated_members() {
        let run_id = Uuid::new_v4();
        let mut archive: ParetoArchive<Candidate> = ParetoArchive::new(10);
        let strong = DimensionScores { success_rate: 0.9, quality: 0.9, ..Default::default() };
        let weak = DimensionScores { success_rate: 0.3, quality: 0.3, ..Default::default() };

        archive.add(candidate(run_id, 0, 0.5, weak));
        archive.add(candidate(run_id, 1, 0.9, strong));

        let front = archive.pareto_front();
        assert_eq!(front.len(), 1);
        assert!((front[0].fitness - 0.9).abs() < 1e-9);
    }

    #[test]
    fn add_rejects_dominated_candidate() {
        let run_id = Uuid::new_v4();
        let mut archive: ParetoArchive<Candidate> = ParetoArchive::new(10);
        let strong = DimensionScores { success_rate: 0.9, quality: 0.9, ..Default::default() };
        let weak = DimensionScores { success_rate: 0.3, quality: 0.3, ..Default::default() };

        archive.add(candidate(run_id, 0, 0.9, strong));
        archive.add(candidate(run_id, 1, 0.5, weak));

        assert_eq!(archive.size(), 1);
    }

    #[test]
    fn eviction_respects_capacity() {
        let run_id = Uuid::new_v4();
        let mut archive: ParetoArchive<Candidate> = ParetoArchive::new(2);
        for i in 0..5 {
            let scores = DimensionScores {
                success_rate: 0.1 * i as f64,
                quality: 0.05 * i as f64,
                efficiency: 1.0 - 0.1 * i as f64,
                ..Default::default()
            };
            archive.add(candidate(run_id, i, i as f64, scores));
        }
        assert!(archive.size() <= 2);
    }

    #[test]
    fn select_for_mutation_pads_from_rest_when_front_too_small() {
        let run_id = Uuid::new_v4();
        let mut archive: ParetoArchive<Candidate> = ParetoArchive::new(10);
        let dominant = DimensionScores { success_rate: 1.0, quality: 1.0, efficiency: 1.0, ..Default::default() };
        archive.add(candidate(run_id, 0, 1.0, dominant));
        // These are all dominated by `dominant` and would normally be
        // rejected by `add`; insert directly to exercise the padding path.
        archive.members.push(candidate(run_id, 1, 0.4, DimensionScores::default()));
        archive.members.push(candidate(run_id, 2, 0.2, DimensionScores::default()));

        let selected = archive.select_for_mutation(3);
        assert_eq!(selected.len(), 3);
    }
}
