use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_FORMAT};
use crate::data::InputFormat;
use crate::utils::file::STDIN_PATH;

#[derive(Parser)]
#[command(name = "traceprism")]
#[command(version, about = "Normalize OpenTelemetry and Langfuse traces", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Input format (auto detects OTLP/JSON, OTLP protobuf and Langfuse)
    #[arg(long, short = 'f', global = true, env = ENV_FORMAT, value_enum)]
    pub format: Option<InputFormat>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the normalized span tree as JSON
    Convert {
        /// Trace file, `-` for stdin
        #[arg(default_value = STDIN_PATH)]
        file: String,
    },
    /// Print one timeline row per span
    Timeline {
        /// Trace file, `-` for stdin
        #[arg(default_value = STDIN_PATH)]
        file: String,
    },
    /// Print trace totals (spans, duration, cost, tokens, categories)
    Summary {
        /// Trace file, `-` for stdin
        #[arg(default_value = STDIN_PATH)]
        file: String,
    },
}

impl Commands {
    /// Input path of the command
    pub fn file(&self) -> &str {
        match self {
            Self::Convert { file } | Self::Timeline { file } | Self::Summary { file } => file,
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub format: Option<InputFormat>,
    pub compact: bool,
}

fn split(cli: Cli) -> (CliConfig, Commands) {
    let config = CliConfig {
        config: cli.config,
        format: cli.format,
        compact: cli.compact,
    };
    (config, cli.command)
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    split(Cli::parse())
}
