mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the summary on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Remove { session, removal, target } => {
            commands::remove::run(&session, &removal, &target)
        }
        Commands::Compress(args) => commands::compress::run(&args),
        Commands::Inspect { session, dir } => commands::inspect::run(&session, dir.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
