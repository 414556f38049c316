//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string for log events (e.g. "submit", "interactive").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Stats => "stats",
        Commands::Validate { .. } => "validate",
        Commands::Submit { .. } => "submit",
        Commands::Export => "export",
        Commands::Interactive { .. } => "interactive",
    }
}
