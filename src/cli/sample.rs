use std::path::PathBuf;

use clap::Args;

use monas::arch::save_population;
use monas::sample::{Sampler, DEFAULT_POPULATION};
use monas::space::{CellSpace, DARTS_OPS};

use super::{fail, load_profiles};

#[derive(Args)]
pub struct SampleArgs {
    /// Hardware profile name (see `monas profiles`)
    #[arg(long, default_value = "gpu")]
    pub hardware: String,
    /// Number of architectures to sample
    #[arg(short, default_value_t = DEFAULT_POPULATION)]
    pub n: usize,
    /// Seed for the search space's random stream
    #[arg(long, default_value = "0")]
    pub seed: u64,
    /// Intermediate nodes per cell
    #[arg(long, default_value = "4")]
    pub nodes: usize,
    /// JSON file with extra or overriding profiles
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Write the population to this JSON file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn cmd_sample(args: SampleArgs) {
    let profiles = load_profiles(args.config.as_deref());
    let profile = profiles.resolve(&args.hardware).unwrap_or_else(|e| fail(e));
    let mut space =
        CellSpace::new(&DARTS_OPS, args.nodes, args.seed).unwrap_or_else(|e| fail(e));

    let run = Sampler::new(profile).sample(&mut space, args.n);
    log::info!(
        "sampled {}/{} architectures for '{}' in {} draws ({} over cost, {} disallowed ops)",
        run.architectures.len(),
        args.n,
        profile.name,
        run.attempts,
        run.rejected_cost,
        run.rejected_ops
    );
    if run.architectures.len() < args.n {
        log::warn!(
            "population is short: the profile admits few architectures of {} edges",
            space.edges_per_architecture()
        );
    }

    for arch in &run.architectures {
        println!("{} {}", arch.hash(), arch.ops().join(" "));
    }

    if let Some(path) = args.output {
        save_population(&path, &run.architectures).unwrap_or_else(|e| fail(e));
        log::info!("wrote {}", path.display());
    }
}
