//! Throughput of the population pipeline.
//!
//! 1. Content hashing of DARTS-sized architectures
//! 2. Constrained sampling under a permissive and a restrictive profile
//! 3. Batch evaluation: cold cache vs. warm cache

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use monas::eval::{SurrogateError, SurrogateRecord};
use monas::sample::Sampler;
use monas::{
    hash_architecture, Architecture, CellSpace, Evaluator, HardwareProfile, Metric,
    ObjectiveWeights, SearchSpace, Surrogate,
};

/// Cheap deterministic surrogate so the benchmark measures the pipeline,
/// not a model.
struct OpCountSurrogate;

impl Surrogate for OpCountSurrogate {
    fn query(&self, arch: &Architecture) -> Result<SurrogateRecord, SurrogateError> {
        let n = arch.op_count() as f64;
        Ok(SurrogateRecord::new()
            .with("validation_accuracy", 0.9)
            .with("latency", n)
            .with("params", n * 1e5)
            .with("flops", n * 1e7))
    }
}

fn population(size: usize, seed: u64) -> Vec<Architecture> {
    let mut space = CellSpace::darts(seed);
    (0..size).map(|_| space.sample_random()).collect()
}

fn bench_hash(c: &mut Criterion) {
    let archs = population(64, 1);
    c.bench_function("hash_64_darts", |b| {
        b.iter(|| {
            for arch in &archs {
                black_box(hash_architecture(black_box(arch)));
            }
        })
    });
}

fn bench_sampling(c: &mut Criterion) {
    let gpu = HardwareProfile::gpu();
    let pi = HardwareProfile::raspberry_pi();

    let mut group = c.benchmark_group("sample");
    group.bench_function("gpu_50", |b| {
        let mut space = CellSpace::darts(2);
        b.iter(|| Sampler::new(&gpu).sample(&mut space, black_box(50)))
    });
    group.bench_function("raspberry_pi_50_exhausted", |b| {
        let mut space = CellSpace::darts(3);
        b.iter(|| Sampler::new(&pi).sample(&mut space, black_box(50)))
    });
    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let archs = population(256, 4);
    let weights = ObjectiveWeights::new()
        .with(Metric::Accuracy, 1.0)
        .with(Metric::Latency, -0.01);
    let constraints = HardwareProfile::gpu().constraints();

    let mut group = c.benchmark_group("evaluate");
    group.bench_function("cold_256", |b| {
        b.iter(|| {
            let mut evaluator = Evaluator::new(OpCountSurrogate);
            evaluator.score_batch(black_box(&archs), &weights, &constraints)
        })
    });
    group.bench_function("warm_256", |b| {
        let mut evaluator = Evaluator::new(OpCountSurrogate);
        evaluator.evaluate_batch(&archs);
        b.iter(|| evaluator.score_batch(black_box(&archs), &weights, &constraints))
    });
    group.finish();
}

criterion_group!(benches, bench_hash, bench_sampling, bench_evaluation);
criterion_main!(benches);
