mod cli;

use clap::{Parser, Subcommand};

use cli::hash::{cmd_hash, HashArgs};
use cli::profiles::{cmd_profiles, ProfilesArgs};
use cli::sample::{cmd_sample, SampleArgs};
use cli::score::{cmd_score, ScoreArgs};

#[derive(Parser)]
#[command(
    name = "monas",
    version,
    about = "Hardware-aware architecture sampling and surrogate scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List hardware profiles
    Profiles(ProfilesArgs),
    /// Sample an initial population under a hardware profile
    Sample(SampleArgs),
    /// Show content hashes (BLAKE3) of a saved population
    Hash(HashArgs),
    /// Score a saved population against a benchmark table
    Score(ScoreArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Profiles(args) => cmd_profiles(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Hash(args) => cmd_hash(args),
        Command::Score(args) => cmd_score(args),
    }
}
