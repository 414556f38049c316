//! CLI parse: clap types for the care plan client. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Care plan client - validate, generate and submit care plan orders
#[derive(Parser)]
#[command(name = "careplan")]
#[command(about = "Validate orders, generate care plans, and submit them to the care plan service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Care plan service base URL (overrides configuration)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show order, patient and provider totals
    Stats,
    /// Validate an order without generating a care plan
    Validate {
        /// Order file (JSON, or TOML by extension)
        #[arg(long)]
        order: PathBuf,
    },
    /// Validate, generate the care plan, and persist the order
    Submit {
        /// Order file (JSON, or TOML by extension)
        #[arg(long)]
        order: PathBuf,
        /// Save the generated care plan to the download directory
        #[arg(long)]
        download: bool,
    },
    /// Export every persisted order as CSV to the download directory
    Export,
    /// Menu-driven session with live stats
    Interactive {
        /// Prefill the form from an order file
        #[arg(long)]
        order: Option<PathBuf>,
    },
}
