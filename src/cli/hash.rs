use std::path::PathBuf;

use clap::Args;

use monas::ArchHash;

use super::{fail, read_population};

#[derive(Args)]
pub struct HashArgs {
    /// Population JSON file
    pub population: PathBuf,
    /// Show full 256-bit hashes instead of short form
    #[arg(long)]
    pub full: bool,
    /// Print the generator-facing description under each hash
    #[arg(long)]
    pub describe: bool,
    /// Only show the architecture with this full hex hash
    #[arg(long, value_name = "HASH")]
    pub find: Option<String>,
}

pub fn cmd_hash(args: HashArgs) {
    let target = args.find.as_deref().map(|hex| {
        ArchHash::from_hex(hex)
            .unwrap_or_else(|| fail(format!("'{}' is not a 64-digit hex hash", hex)))
    });

    let mut shown = 0usize;
    for arch in read_population(&args.population) {
        let hash = arch.hash();
        if target.is_some_and(|t| t != hash) {
            continue;
        }
        shown += 1;
        if args.full {
            println!("{} ops={}", hash.to_hex(), arch.op_count());
        } else {
            println!("{} ops={}", hash, arch.op_count());
        }
        if args.describe {
            for line in arch.describe().lines() {
                println!("  {}", line);
            }
        }
    }

    if let Some(target) = target {
        if shown == 0 {
            fail(format!("no architecture with hash {}", target.to_short()));
        }
    }
}
