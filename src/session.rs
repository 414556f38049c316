//! Session: every client component, built once, plus the user-facing event handlers.

use crate::error::ClientError;
use crate::export::{ExportHelper, FileSink};
use crate::form::FormCollector;
use crate::gateway::CarePlanGateway;
use crate::notify::Notifier;
use crate::stats::StatsPoller;
use crate::types::SanitizedOrder;
use crate::view::View;
use crate::workflow::{CurrentPlan, Workflow, WorkflowOutcome, WorkflowState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Session-level knobs.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub refresh_interval: Duration,
    pub auto_refresh: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(5000),
            auto_refresh: true,
        }
    }
}

pub struct CarePlanSession {
    form: Arc<dyn FormCollector>,
    notifier: Notifier,
    stats: Arc<StatsPoller>,
    workflow: Arc<Workflow>,
    export: ExportHelper,
    options: SessionOptions,
}

impl CarePlanSession {
    pub fn new(
        gateway: Arc<dyn CarePlanGateway>,
        view: Arc<dyn View>,
        form: Arc<dyn FormCollector>,
        sink: Arc<dyn FileSink>,
        options: SessionOptions,
    ) -> Self {
        let notifier = Notifier::new(view);
        let stats = Arc::new(StatsPoller::new(Arc::clone(&gateway), notifier.clone()));
        let workflow = Arc::new(Workflow::new(
            Arc::clone(&gateway),
            notifier.clone(),
            Arc::clone(&stats),
        ));
        let export = ExportHelper::new(
            gateway,
            notifier.clone(),
            sink,
            workflow.current_plan(),
            Arc::clone(&form),
        );

        Self {
            form,
            notifier,
            stats,
            workflow,
            export,
            options,
        }
    }

    /// Show the stats loading marker, load once, and start auto-refresh if enabled.
    pub async fn start(&self) -> Result<(), ClientError> {
        info!("Care plan session starting");
        if self.options.auto_refresh {
            self.stats.initialize(self.options.refresh_interval).await
        } else {
            self.notifier.stats_loading();
            self.stats.load().await;
            Ok(())
        }
    }

    /// Stop the stats timer. Idempotent.
    pub fn shutdown(&self) {
        self.stats.stop_auto_refresh();
        info!("Care plan session stopped");
    }

    pub async fn handle_validate(&self) -> Option<SanitizedOrder> {
        let form = self.form.collect();
        self.workflow.validate(&form).await
    }

    pub async fn handle_submit(&self) -> WorkflowOutcome {
        let form = self.form.collect();
        self.workflow.run(&form).await
    }

    pub fn handle_reset(&self) {
        self.form.clear();
        self.workflow.reset();
    }

    pub async fn handle_export(&self) -> Option<PathBuf> {
        self.export.export_orders().await
    }

    pub fn handle_download(&self) -> Option<PathBuf> {
        self.export.download_care_plan()
    }

    pub async fn refresh_stats(&self) {
        self.stats.load().await;
    }

    pub fn workflow_state(&self) -> WorkflowState {
        self.workflow.state()
    }

    pub fn current_plan(&self) -> Arc<CurrentPlan> {
        self.workflow.current_plan()
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.stats.is_auto_refreshing()
    }
}

impl Drop for CarePlanSession {
    fn drop(&mut self) {
        self.stats.stop_auto_refresh();
    }
}
