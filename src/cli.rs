use clap::{Parser, Subcommand};
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  Start the default instance:
  $ fermyon up

  Export environment:
  $ fermyon environment

  List Fermyon service status:
  $ fermyon status

  Stop the default instance:
  $ fermyon down";

#[derive(Parser, Debug)]
#[command(
    name = "fermyon",
    version,
    about = "Fermyon local dev installer",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to settings file (default: ~/.config/fermyon/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an instance of Fermyon
    #[command(after_help = "Example:\n  $ fermyon up")]
    Up {
        /// Instance name (overrides settings)
        name: Option<String>,
    },

    /// Stop an instance of Fermyon
    #[command(after_help = "Example:\n  $ fermyon down")]
    Down {
        /// Instance name (overrides settings)
        name: Option<String>,
    },

    /// Get environment variables to help with local dev for Spin
    #[command(after_help = "Example:\n  $ fermyon environment")]
    Environment {
        /// Accepted for symmetry with the other commands; unused
        #[arg(hide = true)]
        name: Option<String>,
    },

    /// Validate the Fermyon service status
    #[command(after_help = "Example:\n  $ fermyon status")]
    Status {
        /// Instance name (overrides settings)
        name: Option<String>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Up { .. } => "up",
            Command::Down { .. } => "down",
            Command::Environment { .. } => "environment",
            Command::Status { .. } => "status",
        }
    }
}
