//! The caching evaluator.
//!
//! One [`Evaluator`] owns one cache keyed by [`ArchHash`]; the surrogate is
//! queried at most once per distinct architecture, failures included.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use super::surrogate::Surrogate;
use super::{compute_fitness, Evaluation, ObjectiveWeights};
use crate::arch::{hash_architecture, ArchHash, Architecture};
use crate::config::HardwareConstraints;

/// Cache counters for one evaluator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Surrogate queries issued (one per distinct architecture).
    pub misses: u64,
    /// Queries that failed and were recorded as penalized results.
    pub failures: u64,
}

/// One scored individual.
#[derive(Clone, Debug)]
pub struct Scored {
    pub arch: Architecture,
    pub hash: ArchHash,
    pub evaluation: Evaluation,
    pub fitness: f64,
}

/// Cached surrogate evaluator.
///
/// Each distinct architecture is queried at most once per evaluator; the
/// result, including a failed query, stays cached for the evaluator's
/// lifetime. The cache is owned by the instance and never shared.
pub struct Evaluator<S> {
    surrogate: S,
    cache: HashMap<ArchHash, Evaluation>,
    stats: EvalStats,
}

impl<S: Surrogate> Evaluator<S> {
    pub fn new(surrogate: S) -> Self {
        Self {
            surrogate,
            cache: HashMap::new(),
            stats: EvalStats::default(),
        }
    }

    pub fn surrogate(&self) -> &S {
        &self.surrogate
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Cached evaluation of `arch`, without querying.
    pub fn cached(&self, arch: &Architecture) -> Option<&Evaluation> {
        self.cache.get(&hash_architecture(arch))
    }

    /// Metrics for `arch`, from the cache or from a single surrogate query.
    ///
    /// Never fails: a query error is logged and recorded as
    /// [`MetricSet::FAILED`](super::MetricSet::FAILED) with the reason in
    /// [`Evaluation::failure`].
    pub fn evaluate_architecture(&mut self, arch: &Architecture) -> Evaluation {
        let key = hash_architecture(arch);
        if let Some(hit) = self.cache.get(&key) {
            self.stats.hits += 1;
            return hit.clone();
        }
        let evaluation = query_surrogate(&self.surrogate, key, arch);
        self.record(key, evaluation.clone());
        evaluation
    }

    /// Evaluate and compute fitness in one step.
    pub fn score(
        &mut self,
        arch: &Architecture,
        objectives: &ObjectiveWeights,
        constraints: &HardwareConstraints,
    ) -> Scored {
        let hash = hash_architecture(arch);
        let evaluation = self.evaluate_architecture(arch);
        let fitness = compute_fitness(&evaluation.metrics, objectives, constraints);
        Scored {
            arch: arch.clone(),
            hash,
            evaluation,
            fitness,
        }
    }

    fn record(&mut self, key: ArchHash, evaluation: Evaluation) {
        self.stats.misses += 1;
        if evaluation.is_failure() {
            self.stats.failures += 1;
        }
        self.cache.insert(key, evaluation);
    }
}

impl<S: Surrogate + Sync> Evaluator<S> {
    /// Evaluate a whole generation, in input order.
    ///
    /// Distinct cache misses are queried in parallel and inserted once all
    /// queries return, so duplicates inside the batch still cost a single
    /// query.
    pub fn evaluate_batch(&mut self, archs: &[Architecture]) -> Vec<Evaluation> {
        let keys: Vec<ArchHash> = archs.par_iter().map(hash_architecture).collect();

        let mut queued = HashSet::new();
        let mut pending = Vec::new();
        for (&key, arch) in keys.iter().zip(archs) {
            if self.cache.contains_key(&key) || !queued.insert(key) {
                self.stats.hits += 1;
            } else {
                pending.push((key, arch));
            }
        }

        let surrogate = &self.surrogate;
        let fresh: Vec<(ArchHash, Evaluation)> = pending
            .into_par_iter()
            .map(|(key, arch)| (key, query_surrogate(surrogate, key, arch)))
            .collect();
        log::debug!(
            "batch of {}: {} surrogate queries",
            archs.len(),
            fresh.len()
        );
        for (key, evaluation) in fresh {
            self.record(key, evaluation);
        }

        keys.iter().map(|key| self.cache[key].clone()).collect()
    }

    /// Evaluate a generation and attach fitness under one weighting.
    pub fn score_batch(
        &mut self,
        archs: &[Architecture],
        objectives: &ObjectiveWeights,
        constraints: &HardwareConstraints,
    ) -> Vec<Scored> {
        let evaluations = self.evaluate_batch(archs);
        archs
            .iter()
            .zip(evaluations)
            .map(|(arch, evaluation)| Scored {
                arch: arch.clone(),
                hash: hash_architecture(arch),
                fitness: compute_fitness(&evaluation.metrics, objectives, constraints),
                evaluation,
            })
            .collect()
    }
}

fn query_surrogate<S: Surrogate>(surrogate: &S, key: ArchHash, arch: &Architecture) -> Evaluation {
    match surrogate.query(arch).and_then(|record| record.metrics()) {
        Ok(metrics) => Evaluation::succeeded(metrics),
        Err(e) => {
            log::warn!("failed to evaluate architecture {}: {}", key, e);
            Evaluation::failed(e.to_string())
        }
    }
}
