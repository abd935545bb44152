//! Command-line interface.

pub mod completions;
pub mod output;
pub mod plan;
pub mod rotate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::constants::CONFIG_FILE;

/// Rotator - rotate credentials and push them to the systems that use them.
#[derive(Parser)]
#[command(
    name = "rotator",
    about = "Rotate credentials and publish them to CI, parameter stores and PaaS config",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Show which secrets would be rotated and where they go
    Plan {
        /// Path to the config file
        #[arg(short, long, env = "ROTATOR_CONFIG", default_value = CONFIG_FILE)]
        file: PathBuf,
    },

    /// Rotate every configured secret
    Rotate {
        /// Path to the config file
        #[arg(short, long, env = "ROTATOR_CONFIG", default_value = CONFIG_FILE)]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Give up issuing new provider calls after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Plan { file } => plan::execute(&file),
        Rotate { file, yes, timeout } => rotate::execute(&file, yes, timeout),
        Completions { shell } => completions::execute(shell),
    }
}
