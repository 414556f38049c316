//! Config loader facade: composes sources and merge policy into a `ClientConfig`.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::ClientConfig;
use config::{Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads `ClientConfig` from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from defaults, the user config file, `<base_dir>/config/*.toml`, then environment.
    pub fn load(base_dir: &Path) -> Result<ClientConfig, config::ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, base_dir)?;
        let config = builder.add_source(Self::environment()).build()?;
        let loaded: ClientConfig = config.try_deserialize()?;
        debug!(base_url = %loaded.server.base_url, "Configuration loaded");
        Ok(loaded)
    }

    /// Load from a single explicit file, still honoring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<ClientConfig, config::ConfigError> {
        let config = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?;
        config.try_deserialize()
    }

    /// Path of the user-level configuration file, when a home directory is known.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults only.
    pub fn default() -> ClientConfig {
        ClientConfig::default()
    }

    fn environment() -> Environment {
        Environment::with_prefix("CAREPLAN")
            .separator("__")
            .try_parsing(true)
    }
}
