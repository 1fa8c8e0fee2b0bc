//! Cheap cost proxies for pre-filtering candidates.
//!
//! The sampler never spends surrogate queries; it asks a [`CostEstimator`]
//! for an estimated FLOP count and compares that against the hardware
//! profile's bound. The default proxy is a crude linear function of the
//! operation count.

use crate::arch::Architecture;
use crate::eval::Surrogate;

// ---------------------------------------------------------------------------
// CostEstimator trait
// ---------------------------------------------------------------------------

/// Estimates the FLOPs of an architecture without evaluating it.
pub trait CostEstimator {
    fn estimate(&self, arch: &Architecture) -> f64;

    /// Display name for logs.
    fn name(&self) -> &str;
}

impl<E: CostEstimator + ?Sized> CostEstimator for &E {
    fn estimate(&self, arch: &Architecture) -> f64 {
        (**self).estimate(arch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ---------------------------------------------------------------------------
// OpCountEstimator
// ---------------------------------------------------------------------------

/// `op_count * flops_per_op`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpCountEstimator {
    pub flops_per_op: f64,
}

impl OpCountEstimator {
    pub const DEFAULT_FLOPS_PER_OP: f64 = 1e7;
}

impl Default for OpCountEstimator {
    fn default() -> Self {
        Self {
            flops_per_op: Self::DEFAULT_FLOPS_PER_OP,
        }
    }
}

impl CostEstimator for OpCountEstimator {
    fn estimate(&self, arch: &Architecture) -> f64 {
        arch.op_count() as f64 * self.flops_per_op
    }

    fn name(&self) -> &str {
        "op-count"
    }
}

// ---------------------------------------------------------------------------
// PredictorEstimator
// ---------------------------------------------------------------------------

/// Uses the surrogate's FLOP prediction as the cost estimate.
///
/// Uncached: every estimate is a query. An architecture the surrogate cannot
/// score costs `+inf` and is always rejected.
pub struct PredictorEstimator<S> {
    surrogate: S,
}

impl<S: Surrogate> PredictorEstimator<S> {
    pub fn new(surrogate: S) -> Self {
        Self { surrogate }
    }
}

impl<S: Surrogate> CostEstimator for PredictorEstimator<S> {
    fn estimate(&self, arch: &Architecture) -> f64 {
        self.surrogate
            .query(arch)
            .and_then(|record| record.field("flops"))
            .unwrap_or(f64::INFINITY)
    }

    fn name(&self) -> &str {
        "predictor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{SurrogateError, SurrogateRecord, TableSurrogate};

    #[test]
    fn test_op_count_proxy() {
        let arch = Architecture::from_parts(&[0, 1, 2], &["a", "b", "c"]);
        assert_eq!(OpCountEstimator::default().estimate(&arch), 3e7);
        let custom = OpCountEstimator { flops_per_op: 2.5 };
        assert_eq!(custom.estimate(&arch), 7.5);
        assert_eq!(
            OpCountEstimator::default().estimate(&Architecture::from_parts(&[], &[])),
            0.0
        );
    }

    #[test]
    fn test_predictor_estimate_uses_reported_flops() {
        let known = Architecture::from_parts(&[0], &["sep_conv_3x3"]);
        let mut table = TableSurrogate::new();
        table.insert(&known, SurrogateRecord::new().with("flops", 4.2e7));
        let estimator = PredictorEstimator::new(&table);
        assert_eq!(estimator.estimate(&known), 4.2e7);

        let unknown = Architecture::from_parts(&[0], &["conv_1x1"]);
        assert!(estimator.estimate(&unknown).is_infinite());
    }

    #[test]
    fn test_predictor_estimate_on_failure_is_infinite() {
        struct Down;
        impl Surrogate for Down {
            fn query(&self, _: &Architecture) -> Result<SurrogateRecord, SurrogateError> {
                Err(SurrogateError::Query("offline".to_string()))
            }
        }
        let arch = Architecture::from_parts(&[0], &["conv_1x1"]);
        assert_eq!(PredictorEstimator::new(Down).estimate(&arch), f64::INFINITY);
        assert_eq!(PredictorEstimator::new(Down).name(), "predictor");
    }
}
