//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("server.base_url", crate::config::default_base_url())?
        .set_default(
            "stats.refresh_interval_ms",
            crate::config::default_refresh_interval_ms() as i64,
        )?
        .set_default("stats.auto_refresh", true)
}
