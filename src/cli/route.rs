//! CLI route: single route table and run context. Dispatches to the session and presentation.

use crate::config::{ClientConfig, ConfigLoader};
use crate::error::ClientError;
use crate::export::DirectorySink;
use crate::form::FormFields;
use crate::gateway::{CarePlanGateway, HttpGateway};
use crate::session::{CarePlanSession, SessionOptions};
use crate::types::{OrderField, StatsDisplay};
use crate::view::TerminalView;
use crate::workflow::WorkflowOutcome;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::{format_sanitized_order, format_stats_table, format_submit_summary};
use crate::cli::command_name;

const MENU: [&str; 8] = [
    "Edit order form",
    "Validate order",
    "Generate care plan and submit",
    "Download care plan",
    "Export all orders",
    "Refresh stats",
    "Reset form",
    "Quit",
];

/// Load configuration for a CLI invocation: `--config` replaces the layered lookup,
/// `--base-url` overrides whatever was loaded. The result is validated.
pub fn load_config(cli: &Cli) -> Result<ClientConfig, ClientError> {
    let mut config = if let Some(ref path) = cli.config {
        ConfigLoader::load_from_file(path)?
    } else {
        let cwd = std::env::current_dir()?;
        ConfigLoader::load(&cwd)?
    };
    if let Some(ref base_url) = cli.base_url {
        config.server.base_url = base_url.clone();
    }
    config.ensure_valid()?;
    Ok(config)
}

/// Runtime context for CLI execution: validated config and the service gateway.
pub struct RunContext {
    config: ClientConfig,
    gateway: Arc<dyn CarePlanGateway>,
}

impl RunContext {
    /// Build the HTTP gateway from configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let gateway = HttpGateway::new(&config.server)?;
        debug!(base_url = %gateway.base_url(), "Gateway ready");
        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    pub fn with_gateway(config: ClientConfig, gateway: Arc<dyn CarePlanGateway>) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a command on a fresh runtime. Must not be called from inside a runtime.
    pub fn execute(&self, command: &Commands) -> Result<String, ClientError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute_async(command))
    }

    /// Execute a command on the current runtime.
    pub async fn execute_async(&self, command: &Commands) -> Result<String, ClientError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = name, "Command started");

        let result = match command {
            Commands::Stats => self.handle_stats().await,
            Commands::Validate { order } => self.handle_validate(order).await,
            Commands::Submit { order, download } => self.handle_submit(order, *download).await,
            Commands::Export => self.handle_export().await,
            Commands::Interactive { order } => self.handle_interactive(order.as_deref()).await,
        };

        info!(
            command = name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn session(&self, form: Arc<FormFields>, auto_refresh: bool) -> (Arc<TerminalView>, CarePlanSession) {
        let color = self.config.logging.color && std::io::stdout().is_terminal();
        let view = Arc::new(TerminalView::stdout(color));
        let sink = Arc::new(DirectorySink::new(
            self.config.export.resolve_download_dir(),
        ));
        let options = SessionOptions {
            refresh_interval: self.config.stats.refresh_interval(),
            auto_refresh,
        };
        let session = CarePlanSession::new(
            Arc::clone(&self.gateway),
            view.clone(),
            form,
            sink,
            options,
        );
        (view, session)
    }

    async fn handle_stats(&self) -> Result<String, ClientError> {
        let (view, session) = self.session(Arc::new(FormFields::new()), false);
        session.start().await?;
        match view.latest_stats() {
            StatsDisplay::Unavailable => Err(ClientError::ActionFailed("stats refresh".to_string())),
            stats => Ok(format_stats_table(stats)),
        }
    }

    async fn handle_validate(&self, order: &Path) -> Result<String, ClientError> {
        let form = Arc::new(FormFields::from_file(order)?);
        let (_view, session) = self.session(form, false);
        match session.handle_validate().await {
            Some(sanitized) => format_sanitized_order(&sanitized),
            None => Err(ClientError::ActionFailed("validate".to_string())),
        }
    }

    async fn handle_submit(&self, order: &Path, download: bool) -> Result<String, ClientError> {
        let form = Arc::new(FormFields::from_file(order)?);
        let (_view, session) = self.session(form, false);
        match session.handle_submit().await {
            WorkflowOutcome::Completed(full_order) => {
                let saved = if download {
                    match session.handle_download() {
                        Some(path) => Some(path),
                        None => return Err(ClientError::ActionFailed("download".to_string())),
                    }
                } else {
                    None
                };
                Ok(format_submit_summary(&full_order, saved.as_deref()))
            }
            WorkflowOutcome::Halted(step) => Err(ClientError::ActionFailed(step.to_string())),
            WorkflowOutcome::Busy => Err(ClientError::WorkflowBusy),
        }
    }

    async fn handle_export(&self) -> Result<String, ClientError> {
        let (_view, session) = self.session(Arc::new(FormFields::new()), false);
        match session.handle_export().await {
            Some(path) => Ok(format!("Orders exported to {}", path.display())),
            None => Err(ClientError::ActionFailed("export".to_string())),
        }
    }

    async fn handle_interactive(&self, order: Option<&Path>) -> Result<String, ClientError> {
        let form = match order {
            Some(path) => Arc::new(FormFields::from_file(path)?),
            None => Arc::new(FormFields::new()),
        };
        let (view, session) = self.session(Arc::clone(&form), self.config.stats.auto_refresh);
        session.start().await?;

        let result = self.interactive_loop(&view, &session, &form).await;
        session.shutdown();
        result.map(|_| "Session closed".to_string())
    }

    async fn interactive_loop(
        &self,
        view: &TerminalView,
        session: &CarePlanSession,
        form: &Arc<FormFields>,
    ) -> Result<(), ClientError> {
        loop {
            println!("{}", format_stats_table(view.latest_stats()));
            // Background stats failures wait until the prompt closes.
            view.hold();
            let choice = tokio::task::spawn_blocking(prompt_menu).await;
            view.release();
            let choice = choice
                .map_err(|e| ClientError::InputError(format!("Prompt task failed: {}", e)))??;

            match choice {
                0 => {
                    let form = Arc::clone(form);
                    view.hold();
                    let edited = tokio::task::spawn_blocking(move || edit_form(&form)).await;
                    view.release();
                    edited
                        .map_err(|e| ClientError::InputError(format!("Prompt task failed: {}", e)))??;
                }
                1 => {
                    if let Some(sanitized) = session.handle_validate().await {
                        println!("{}", format_sanitized_order(&sanitized)?);
                    }
                }
                2 => {
                    if let WorkflowOutcome::Completed(order) = session.handle_submit().await {
                        println!("{}", format_submit_summary(&order, None));
                    }
                }
                3 => {
                    if let Some(path) = session.handle_download() {
                        println!("Saved to {}", path.display());
                    }
                }
                4 => {
                    if let Some(path) = session.handle_export().await {
                        println!("Saved to {}", path.display());
                    }
                }
                5 => session.refresh_stats().await,
                6 => session.handle_reset(),
                _ => return Ok(()),
            }
        }
    }
}

fn prompt_menu() -> Result<usize, ClientError> {
    use dialoguer::Select;

    Select::new()
        .with_prompt("Care plan")
        .items(&MENU)
        .default(0)
        .interact()
        .map_err(|e| ClientError::InputError(format!("Failed to get user input: {}", e)))
}

fn edit_form(form: &FormFields) -> Result<(), ClientError> {
    use dialoguer::Input;

    for field in OrderField::ALL {
        let value: String = Input::new()
            .with_prompt(field.label())
            .with_initial_text(form.get(field))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ClientError::InputError(format!("Failed to get user input: {}", e)))?;
        form.set(field, value);
    }
    Ok(())
}
