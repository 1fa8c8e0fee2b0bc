//! Surrogate evaluation and multi-objective fitness.
//!
//! The evaluator turns an architecture into a cached [`MetricSet`]; the
//! fitness function turns a metric set into a scalar under a set of
//! objective weights and hard hardware bounds. The two are kept separate
//! so a population can be re-ranked under new weights without touching
//! the surrogate again.

pub mod evaluator;
pub mod fitness;
pub mod surrogate;

pub use evaluator::{EvalStats, Evaluator, Scored};
pub use fitness::{compute_fitness, REJECTED_FITNESS};
pub use surrogate::{Surrogate, SurrogateError, SurrogateRecord, TableSurrogate};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MonasError;

// ---------------------------------------------------------------------------
// Metric names
// ---------------------------------------------------------------------------

/// One of the four measured objectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Accuracy,
    Latency,
    Params,
    Flops,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Accuracy,
        Metric::Latency,
        Metric::Params,
        Metric::Flops,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Latency => "latency",
            Metric::Params => "params",
            Metric::Flops => "flops",
        }
    }

    /// Whether larger values are better. Only accuracy is maximized.
    pub fn maximized(self) -> bool {
        matches!(self, Metric::Accuracy)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = MonasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MonasError::UnknownMetric(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MetricSet
// ---------------------------------------------------------------------------

/// Measured (or predicted) metrics of one architecture. All four are always
/// present.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub accuracy: f64,
    pub latency: f64,
    pub params: f64,
    pub flops: f64,
}

impl MetricSet {
    /// Metrics recorded for an architecture the surrogate could not score:
    /// zero accuracy and infinite cost, so it loses every comparison.
    pub const FAILED: MetricSet = MetricSet {
        accuracy: 0.0,
        latency: f64::INFINITY,
        params: f64::INFINITY,
        flops: f64::INFINITY,
    };

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::Latency => self.latency,
            Metric::Params => self.params,
            Metric::Flops => self.flops,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Result of evaluating one architecture.
///
/// A failed query still yields [`MetricSet::FAILED`] in `metrics`; `failure`
/// carries the reason so callers can tell a failed query from an
/// architecture that is merely bad.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub metrics: MetricSet,
    pub failure: Option<String>,
}

impl Evaluation {
    pub fn succeeded(metrics: MetricSet) -> Self {
        Self {
            metrics,
            failure: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            metrics: MetricSet::FAILED,
            failure: Some(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

// ---------------------------------------------------------------------------
// Objective weights
// ---------------------------------------------------------------------------

/// Per-metric weights. Not normalized; negative weights penalize a metric.
/// Metrics without a weight do not contribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectiveWeights {
    weights: BTreeMap<Metric, f64>,
}

impl ObjectiveWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: Metric, weight: f64) -> Self {
        self.weights.insert(metric, weight);
        self
    }

    pub fn weight(&self, metric: Metric) -> f64 {
        self.weights.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.weights.iter().map(|(&m, &w)| (m, w))
    }

    /// Parse `"accuracy=0.7,latency=-0.2"`. Later entries for the same
    /// metric replace earlier ones. Weights must be finite.
    pub fn parse(spec: &str) -> Result<Self, MonasError> {
        let mut weights = Self::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) = entry
                .split_once('=')
                .ok_or_else(|| MonasError::InvalidObjective(entry.to_string()))?;
            let metric: Metric = name.trim().parse()?;
            let weight = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite())
                .ok_or_else(|| MonasError::InvalidObjective(entry.to_string()))?;
            weights.weights.insert(metric, weight);
        }
        Ok(weights)
    }
}

impl FromStr for ObjectiveWeights {
    type Err = MonasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
