use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use overlap_cli::commands::appearance::OutputFormat;
use overlap_cli::commands::{appearance, intersect, util, verify};
use overlap_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.lenient {
        config.strict = false;
    }
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Appearance {
            input,
            json,
            explain,
        }) => {
            let format = if *json {
                OutputFormat::Json
            } else if *explain {
                OutputFormat::Explain
            } else {
                OutputFormat::Plain
            };
            let input = util::read_input(input.as_deref())?;
            appearance::run(&mut out, &input, format, &config)?;
        }
        Some(Commands::Intersect { a, b }) => {
            intersect::run(&mut out, a, b, &config)?;
        }
        Some(Commands::Verify { input }) => {
            let input = util::read_input(input.as_deref())?;
            let summary = verify::run(&mut out, &input, &config)?;
            if !summary.all_passed() {
                anyhow::bail!(
                    "{} of {} case(s) did not pass",
                    summary.failed + summary.invalid,
                    summary.total()
                );
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(out)?;
        }
    }

    Ok(())
}
