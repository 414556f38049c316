//! CLI domain: parse, route, help, output, and presentation only.
//! No workflow logic; the route table dispatches to a `CarePlanSession`.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_sanitized_order, format_stats_table, format_submit_summary};
pub use route::{load_config, RunContext};
