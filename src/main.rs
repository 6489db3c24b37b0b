use clap::Parser;
use tracing_subscriber::EnvFilter;

mod annotate;
mod cli;
mod core;
mod matching;
mod parsing;
mod pipeline;
mod store;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("motif_scan=debug,info")
    } else {
        EnvFilter::new("motif_scan=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Run(args) => {
            cli::run::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Kmers(args) => {
            cli::kmers::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
