use std::path::PathBuf;

use clap::{Args, ValueEnum};

use monas::eval::{Evaluator, ObjectiveWeights, TableSurrogate};
use monas::report::PopulationReport;

use super::{fail, load_profiles, read_population};

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Population JSON file
    pub population: PathBuf,
    /// Benchmark table JSON file used as the surrogate
    #[arg(long, value_name = "PATH")]
    pub table: PathBuf,
    /// Hardware profile whose FLOP bound is enforced
    #[arg(long, default_value = "gpu")]
    pub hardware: String,
    /// Objective weights, e.g. "accuracy=0.7,latency=-0.2,params=-0.1"
    #[arg(long, default_value = "accuracy=1.0")]
    pub weights: String,
    /// JSON file with extra or overriding profiles
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

pub fn cmd_score(args: ScoreArgs) {
    let profiles = load_profiles(args.config.as_deref());
    let profile = profiles.resolve(&args.hardware).unwrap_or_else(|e| fail(e));
    let objectives = ObjectiveWeights::parse(&args.weights).unwrap_or_else(|e| fail(e));
    let table = TableSurrogate::load(&args.table).unwrap_or_else(|e| fail(e));
    let population = read_population(&args.population);

    let mut evaluator = Evaluator::new(table);
    let scored = evaluator.score_batch(&population, &objectives, &profile.constraints());
    let stats = evaluator.stats();
    log::info!(
        "{} surrogate queries, {} cache hits, {} failures",
        stats.misses,
        stats.hits,
        stats.failures
    );

    let report = PopulationReport::new(&scored);
    match args.format {
        Format::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        },
        Format::Csv => print!("{}", report.to_csv()),
        Format::Text => print_text(&report),
    }
}

fn print_text(report: &PopulationReport) {
    println!(
        "{:<10} {:>8} {:>12} {:>12} {:>10} {:>14}  pareto",
        "model", "acc", "flops", "params", "latency", "fitness"
    );
    for row in &report.rows {
        println!(
            "{:<10} {:>8.4} {:>12.4e} {:>12.4e} {:>10.3} {:>14.4}  {}",
            row.model_id,
            row.accuracy,
            row.flops,
            row.params,
            row.latency,
            row.fitness,
            if row.is_pareto { "*" } else { "" }
        );
    }
    let summary = &report.summary;
    println!();
    println!(
        "population {}: {} rejected by hardware bounds, {} failed queries",
        summary.population, summary.rejected, summary.failed
    );
    if let (Some(best), Some(mean), Some(std_dev)) = (summary.best, summary.mean, summary.std_dev)
    {
        println!(
            "fitness: best {:.4}, mean {:.4}, std-dev {:.4}",
            best, mean, std_dev
        );
    }
}
