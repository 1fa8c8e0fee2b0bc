//! Constraint-aware sampling and cached surrogate scoring for
//! multi-objective neural architecture search.
//!
//! Two engines feed a genetic search loop:
//!
//! - [`sample`]: draws an initial population from a [`space::SearchSpace`]
//!   under a named [`config::HardwareProfile`], by bounded rejection
//!   sampling against a cheap [`cost::CostEstimator`];
//! - [`eval`]: scores individuals through a [`eval::Surrogate`], caching by
//!   content hash, and folds accuracy, latency, params and FLOPs into one
//!   fitness value with hard hardware bounds.

pub mod arch;
pub mod config;
pub mod cost;
pub mod error;
pub mod eval;
pub mod pareto;
pub mod report;
pub mod sample;
pub mod space;

pub use arch::{hash_architecture, ArchHash, Architecture};
pub use config::{HardwareConstraints, HardwareProfile, ProfileTable};
pub use error::{MonasError, Result};
pub use eval::{
    compute_fitness, Evaluation, Evaluator, Metric, MetricSet, ObjectiveWeights, Surrogate,
    REJECTED_FITNESS,
};
pub use sample::{initialize_population, sample_architectures, Sampler};
pub use space::{CellSpace, SearchSpace};
