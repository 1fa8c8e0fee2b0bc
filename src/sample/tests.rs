use super::*;
use crate::error::MonasError;
use crate::space::CellSpace;

/// Replays a fixed list of architectures forever and counts draws.
struct Scripted {
    archs: Vec<Architecture>,
    draws: usize,
}

impl Scripted {
    fn new(archs: Vec<Architecture>) -> Self {
        Self { archs, draws: 0 }
    }
}

impl SearchSpace for Scripted {
    fn sample_random(&mut self) -> Architecture {
        let arch = self.archs[self.draws % self.archs.len()].clone();
        self.draws += 1;
        arch
    }
}

fn arch(ops: &[&str]) -> Architecture {
    let nodes: Vec<u32> = (0..ops.len() as u32).collect();
    Architecture::from_parts(&nodes, ops)
}

#[test]
fn test_check_verdicts() {
    let profile = HardwareProfile::mobile();
    let sampler = Sampler::new(&profile);

    assert!(sampler
        .check(&arch(&["sep_conv_3x3", "skip_connect"]))
        .is_accepted());
    assert_eq!(
        sampler.check(&arch(&["sep_conv_3x3", "max_pool_3x3"])),
        Verdict::DisallowedOp("max_pool_3x3".to_string())
    );
    // 10 ops * 1e7 == 1e8 is not strictly below the bound.
    assert_eq!(
        sampler.check(&arch(&["skip_connect"; 10])),
        Verdict::OverBudget {
            estimate: 1e8,
            max_flops: 1e8
        }
    );
    assert!(sampler.check(&arch(&["skip_connect"; 9])).is_accepted());
}

#[test]
fn test_allowed_ops_match_by_substring() {
    let profile = HardwareProfile::new("edge", 1e9, &["conv"]);
    let sampler = Sampler::new(&profile);
    assert!(sampler
        .check(&arch(&["sep_conv_3x3", "dil_conv_5x5", "conv_1x1"]))
        .is_accepted());
    // Case-sensitive.
    assert!(!sampler.check(&arch(&["SEP_CONV_3X3"])).is_accepted());
}

#[test]
fn test_collects_n_when_space_allows() {
    let profile = HardwareProfile::gpu();
    let mut space = Scripted::new(vec![arch(&["sep_conv_3x3", "conv_1x1"])]);
    let run = Sampler::new(&profile).sample(&mut space, 5);
    assert_eq!(run.architectures.len(), 5);
    assert_eq!(run.attempts, 5);
    assert_eq!(space.draws, 5);
    assert_eq!(run.acceptance_rate(), 1.0);
}

#[test]
fn test_rejections_are_counted_and_filtered() {
    let profile = HardwareProfile::mobile();
    let good = arch(&["sep_conv_3x3"]);
    let mut space = Scripted::new(vec![
        arch(&["max_pool_3x3"]),
        good.clone(),
        arch(&["skip_connect"; 12]),
    ]);
    let run = Sampler::new(&profile).sample(&mut space, 3);
    assert_eq!(run.architectures, vec![good.clone(), good.clone(), good]);
    assert_eq!(run.attempts, 8);
    assert_eq!(run.rejected_ops, 3);
    assert_eq!(run.rejected_cost, 2);
}

#[test]
fn test_budget_exhaustion_returns_partial() {
    let profile = HardwareProfile::raspberry_pi();
    // Only every tenth draw is admissible.
    let mut script = vec![arch(&["conv_1x1"]); 9];
    script.push(arch(&["avg_pool_3x3"]));
    let mut space = Scripted::new(script);

    let run = Sampler::new(&profile).sample(&mut space, 4);
    // 4 * 20 = 80 draws yield 8 hits, so 4 are found well within budget.
    assert_eq!(run.architectures.len(), 4);

    // One admissible draw in every forty: 3 * 20 draws find only one.
    let mut script = vec![arch(&["conv_1x1"]); 39];
    script.push(arch(&["avg_pool_3x3"]));
    let mut space = Scripted::new(script);
    let run = Sampler::new(&profile).sample(&mut space, 3);
    assert_eq!(run.attempts, 60);
    assert_eq!(run.architectures.len(), 1);
}

#[test]
fn test_degenerate_profile_terminates_empty() {
    let profile = HardwareProfile::new("off", 0.0, &["sep_conv_3x3"]);
    let mut space = CellSpace::darts(1);
    let run = Sampler::new(&profile).sample(&mut space, 10);
    assert!(run.architectures.is_empty());
    assert_eq!(run.attempts, 200);
    assert_eq!(run.rejected_cost, 200);

    let mut space = CellSpace::darts(1);
    assert!(sample_architectures(&mut space, 10, &profile).is_empty());
}

#[test]
fn test_huge_request_does_not_preallocate() {
    let profile = HardwareProfile::new("off", 0.0, &["sep_conv_3x3"]);
    let sampler = Sampler::new(&profile).with_attempts_per_sample(0);
    let mut space = Scripted::new(vec![arch(&["sep_conv_3x3"])]);
    let run = sampler.sample(&mut space, usize::MAX / 2);
    assert!(run.architectures.is_empty());
    assert_eq!(space.draws, 0);

    let cheap = HardwareProfile::new("cheap", 1e9, &["sep_conv_3x3"]);
    let sampler = Sampler::new(&cheap).with_attempts_per_sample(0);
    assert!(sampler.sample(&mut space, usize::MAX).architectures.is_empty());
}

#[test]
fn test_zero_requested_draws_nothing() {
    let profile = HardwareProfile::gpu();
    let mut space = Scripted::new(vec![arch(&["conv_1x1"])]);
    let run = Sampler::new(&profile).sample(&mut space, 0);
    assert!(run.architectures.is_empty());
    assert_eq!(space.draws, 0);
    assert_eq!(run.acceptance_rate(), 0.0);
}

#[test]
fn test_every_sample_satisfies_profile() {
    let profile = HardwareProfile::new("small", 1e8, &["sep_conv", "skip", "pool"]);
    let mut space = CellSpace::new(
        &["sep_conv_3x3", "skip_connect", "avg_pool_3x3", "dil_conv_3x3"],
        1,
        9,
    )
    .unwrap();
    let sampler = Sampler::new(&profile);
    let run = sampler.sample(&mut space, 25);
    assert!(run.architectures.len() <= 25);
    assert!(run.attempts <= 25 * ATTEMPTS_PER_SAMPLE);
    for arch in &run.architectures {
        assert!((arch.op_count() as f64) * 1e7 < profile.max_flops);
        assert!(profile.allows_all(arch.ops()));
        assert!(sampler.check(arch).is_accepted());
    }
}

#[test]
fn test_darts_space_never_fits_mobile_with_default_proxy() {
    // 16 edges * 1e7 = 1.6e8 >= 1e8
    let profiles = ProfileTable::builtin();
    let mut space = CellSpace::darts(11);
    let population = initialize_population(&profiles, &mut space, "mobile", 5).unwrap();
    assert!(population.is_empty());
}

#[test]
fn test_custom_estimator_and_budget() {
    struct Flat(f64);
    impl CostEstimator for Flat {
        fn estimate(&self, _: &Architecture) -> f64 {
            self.0
        }
        fn name(&self) -> &str {
            "flat"
        }
    }

    let profile = HardwareProfile::mobile();
    let mut space = CellSpace::new(&["sep_conv_3x3"], 4, 0).unwrap();
    let run = Sampler::new(&profile)
        .with_estimator(Flat(1.0))
        .sample(&mut space, 3);
    assert_eq!(run.architectures.len(), 3);

    let run = Sampler::new(&profile)
        .with_estimator(Flat(f64::NAN))
        .with_attempts_per_sample(2)
        .sample(&mut space, 3);
    assert!(run.architectures.is_empty());
    assert_eq!(run.attempts, 6);
}

#[test]
fn test_initialize_population() {
    let profiles = ProfileTable::builtin();
    let mut space = CellSpace::new(&["sep_conv_3x3", "skip_connect", "conv_1x1"], 2, 5).unwrap();
    let population =
        initialize_population(&profiles, &mut space, "gpu", DEFAULT_POPULATION).unwrap();
    assert_eq!(population.len(), DEFAULT_POPULATION);
    let gpu = profiles.get("gpu").unwrap();
    assert!(population.iter().all(|a| gpu.allows_all(a.ops())));
}

#[test]
fn test_initialize_population_unknown_hardware() {
    let profiles = ProfileTable::builtin();
    let mut space = CellSpace::darts(0);
    let err = initialize_population(&profiles, &mut space, "unknown_device", 10).unwrap_err();
    match err {
        MonasError::UnknownHardwareProfile { name, available } => {
            assert_eq!(name, "unknown_device");
            assert!(available.contains(&"mobile".to_string()));
        }
        other => panic!("expected UnknownHardwareProfile, got {other}"),
    }
}
