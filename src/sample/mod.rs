//! Constrained population sampling.
//!
//! Bounded rejection sampling: draw from the search space, keep the draws
//! whose estimated cost is below the profile's bound and whose operations
//! are all whitelisted, stop after `n` hits or `n * 20` draws. A short
//! population is a normal outcome, not an error.

use crate::arch::Architecture;
use crate::config::{HardwareProfile, ProfileTable};
use crate::cost::{CostEstimator, OpCountEstimator};
use crate::error::Result;
use crate::space::SearchSpace;

/// Draw budget per requested architecture.
pub const ATTEMPTS_PER_SAMPLE: usize = 20;

/// Population size used when the caller has no preference.
pub const DEFAULT_POPULATION: usize = 10;

/// Why a candidate was kept or dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Accepted,
    /// Estimated cost is not strictly below the profile's bound.
    OverBudget { estimate: f64, max_flops: f64 },
    /// This operation matches none of the allowed substrings.
    DisallowedOp(String),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Outcome of one sampling run.
#[derive(Clone, Debug, Default)]
pub struct SampleRun {
    pub architectures: Vec<Architecture>,
    /// Draws made, accepted or not.
    pub attempts: usize,
    pub rejected_cost: usize,
    pub rejected_ops: usize,
}

impl SampleRun {
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.architectures.len() as f64 / self.attempts as f64
    }
}

/// Rejection sampler for one hardware profile.
pub struct Sampler<'p, E = OpCountEstimator> {
    profile: &'p HardwareProfile,
    estimator: E,
    attempts_per_sample: usize,
}

impl<'p> Sampler<'p> {
    /// Sampler with the default op-count cost proxy.
    pub fn new(profile: &'p HardwareProfile) -> Self {
        Self {
            profile,
            estimator: OpCountEstimator::default(),
            attempts_per_sample: ATTEMPTS_PER_SAMPLE,
        }
    }
}

impl<'p, E: CostEstimator> Sampler<'p, E> {
    /// Swap the cost proxy.
    pub fn with_estimator<F: CostEstimator>(self, estimator: F) -> Sampler<'p, F> {
        Sampler {
            profile: self.profile,
            estimator,
            attempts_per_sample: self.attempts_per_sample,
        }
    }

    pub fn with_attempts_per_sample(mut self, attempts: usize) -> Self {
        self.attempts_per_sample = attempts;
        self
    }

    pub fn profile(&self) -> &HardwareProfile {
        self.profile
    }

    /// Judge one candidate. The cost check runs first.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn check(&self, arch: &Architecture) -> Verdict {
        let estimate = self.estimator.estimate(arch);
        // `!(a < b)` so a NaN estimate is rejected too
        if !(estimate < self.profile.max_flops) {
            return Verdict::OverBudget {
                estimate,
                max_flops: self.profile.max_flops,
            };
        }
        match arch.ops().iter().find(|op| !self.profile.allows_op(op)) {
            Some(op) => Verdict::DisallowedOp(op.clone()),
            None => Verdict::Accepted,
        }
    }

    /// Collect up to `n` admissible architectures within `n * 20` draws.
    pub fn sample<S: SearchSpace + ?Sized>(&self, space: &mut S, n: usize) -> SampleRun {
        let budget = n.saturating_mul(self.attempts_per_sample);
        let mut run = SampleRun::default();

        while run.architectures.len() < n && run.attempts < budget {
            let arch = space.sample_random();
            run.attempts += 1;
            match self.check(&arch) {
                Verdict::Accepted => run.architectures.push(arch),
                Verdict::OverBudget { .. } => run.rejected_cost += 1,
                Verdict::DisallowedOp(_) => run.rejected_ops += 1,
            }
        }

        if run.architectures.len() < n {
            log::debug!(
                "profile '{}': budget of {} draws exhausted with {}/{} architectures ({} over cost, {} disallowed ops)",
                self.profile.name,
                budget,
                run.architectures.len(),
                n,
                run.rejected_cost,
                run.rejected_ops
            );
        } else {
            log::debug!(
                "profile '{}': {} architectures in {} draws ({} proxy)",
                self.profile.name,
                n,
                run.attempts,
                self.estimator.name()
            );
        }
        run
    }
}

/// Up to `n` architectures admissible under `profile`, using the op-count
/// proxy. May return fewer than `n`.
pub fn sample_architectures<S: SearchSpace + ?Sized>(
    space: &mut S,
    n: usize,
    profile: &HardwareProfile,
) -> Vec<Architecture> {
    Sampler::new(profile).sample(space, n).architectures
}

/// Seed a GA population for the named hardware target.
///
/// Unknown hardware names are an error, never a fallback profile.
pub fn initialize_population<S: SearchSpace + ?Sized>(
    profiles: &ProfileTable,
    space: &mut S,
    hardware: &str,
    n: usize,
) -> Result<Vec<Architecture>> {
    let profile = profiles.resolve(hardware)?;
    Ok(sample_architectures(space, n, profile))
}

#[cfg(test)]
mod tests;
