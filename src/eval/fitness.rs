//! Scalar fitness from measured metrics.

use super::{MetricSet, ObjectiveWeights};
use crate::config::HardwareConstraints;

/// Fitness of an architecture that breaks a hard hardware bound.
///
/// Far below any weighted score a bounded architecture can reach with
/// realistic weights, so rejected individuals always rank last.
pub const REJECTED_FITNESS: f64 = -1_000_000.0;

/// Weighted multi-objective fitness. Higher is better.
///
/// Any exceeded bound short-circuits to [`REJECTED_FITNESS`], independent of
/// how far the bound was exceeded. Otherwise the score is the weighted sum of
/// the metrics. Pure: no caching, no side effects.
pub fn compute_fitness(
    metrics: &MetricSet,
    objectives: &ObjectiveWeights,
    constraints: &HardwareConstraints,
) -> f64 {
    if constraints.violation(metrics).is_some() {
        return REJECTED_FITNESS;
    }
    // A zero weight must not turn an infinite failure metric into NaN.
    objectives
        .iter()
        .filter(|&(_, weight)| weight != 0.0)
        .map(|(metric, weight)| metrics.get(metric) * weight)
        .sum()
}
