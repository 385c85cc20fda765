mod cli;
mod commands;
mod compare;
mod config;
mod report;
mod store;

use clap::Parser;
use config::{BatchConfig, CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("imgdiff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Init { force } => {
            commands::init(force)?;
        }
        cli::Command::Diff {
            first,
            second,
            output,
            threshold,
            stats,
        } => {
            let overrides = CliOverrides {
                threshold,
                batch: BatchConfig::default(),
            };
            let config = ResolvedRunConfig::new(overrides)?;
            commands::diff(&config, &first, &second, &output, stats)?;
        }
        cli::Command::Stats {
            first,
            second,
            threshold,
            json,
        } => {
            let overrides = CliOverrides {
                threshold,
                batch: BatchConfig::default(),
            };
            let config = ResolvedRunConfig::new(overrides)?;
            let code = commands::stats(&config, &first, &second, json)?;
            std::process::exit(code);
        }
        cli::Command::Batch {
            first_dir,
            second_dir,
            output,
            threshold,
            batch,
        } => {
            let overrides = CliOverrides { threshold, batch };
            let config = ResolvedRunConfig::new(overrides)?;
            let code = commands::batch(config, &first_dir, &second_dir, output.as_deref()).await?;
            std::process::exit(code);
        }
    }

    Ok(())
}
