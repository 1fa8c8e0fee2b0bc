pub mod hash;
pub mod profiles;
pub mod sample;
pub mod score;

use std::fmt::Display;
use std::path::Path;
use std::process;

use monas::arch::{load_population, Architecture};
use monas::ProfileTable;

/// Print an error and exit with status 1.
pub fn fail(err: impl Display) -> ! {
    eprintln!("error: {}", err);
    process::exit(1);
}

/// Built-in profiles, extended by `--config` when given.
pub fn load_profiles(config: Option<&Path>) -> ProfileTable {
    match config {
        Some(path) => ProfileTable::load(path).unwrap_or_else(|e| fail(e)),
        None => ProfileTable::builtin(),
    }
}

pub fn read_population(path: &Path) -> Vec<Architecture> {
    let population = load_population(path).unwrap_or_else(|e| fail(e));
    log::info!(
        "loaded {} architectures from {}",
        population.len(),
        path.display()
    );
    population
}
