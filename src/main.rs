// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use repoconv::cli::{Cli, Commands};
use repoconv::commands;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            packages,
            output,
            config,
            run_mode,
            continue_on_error,
        }) => {
            commands::convert(
                &packages,
                &output,
                config.as_deref(),
                run_mode.as_deref(),
                continue_on_error,
            )?;
        }
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
