// src/cli.rs
//! CLI definitions for the repoconv converter
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "repoconv")]
#[command(author = "Repoconv Project")]
#[command(version)]
#[command(about = "Converts content packages into ordered deployment artifacts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one or more content packages
    Convert {
        /// Paths of the package directories to convert
        #[arg(required = true)]
        packages: Vec<String>,

        /// Output directory for artifacts and the manifest
        #[arg(short, long, default_value = "out")]
        output: String,

        /// Path to a conversion config file
        #[arg(short, long)]
        config: Option<String>,

        /// Run mode the initialization script is filed under
        #[arg(long)]
        run_mode: Option<String>,

        /// Continue with the remaining packages when one fails
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
