use std::path::PathBuf;

use clap::Args;

use super::load_profiles;

#[derive(Args)]
pub struct ProfilesArgs {
    /// JSON file with extra or overriding profiles
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn cmd_profiles(args: ProfilesArgs) {
    let profiles = load_profiles(args.config.as_deref());
    for profile in profiles.iter() {
        println!(
            "{:<14} max_flops={:<10e} ops=[{}]",
            profile.name,
            profile.max_flops,
            profile.allowed_ops.join(", ")
        );
    }
}
