mod args;
mod logging;
mod op;
mod ops;
mod state;
mod version;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Acl, Binary, Category, Comment, Content, Folder, Init, Text, Version};

command_enum! {
    (Init, Init),
    (Version, Version),
    (Folder, Folder),
    (Text, Text),
    (Binary, Binary),
    (Category, Category),
    (Comment, Comment),
    (Content, Content),
    (Acl, Acl),
}

/// Log level from the config, or the default before `wcm init`
fn configured_log_level(args: &Args) -> String {
    state::AppState::load(args.config_path.clone())
        .map(|state| state.config.log_level)
        .unwrap_or_else(|_| "info".to_string())
}

async fn run(args: Args) -> anyhow::Result<String> {
    logging::init_logging(&configured_log_level(&args))?;

    let ctx = op::OpContext::new(args.config_path, args.workspace, args.user, args.password);
    let output = args.command.execute(&ctx).await?;
    Ok(output.to_string())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match run(args).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
