pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wcm")]
#[command(about = "Create and inspect content in a WCM repository")]
pub struct Args {
    /// Path to the wcm config directory (defaults to ~/.wcm)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Workspace to log into (defaults to the configured default workspace)
    #[arg(long, global = true)]
    pub workspace: Option<String>,

    #[arg(long, global = true, default_value = "admin")]
    pub user: String,

    #[arg(long, global = true, env = "WCM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
