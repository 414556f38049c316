//! Export/Download Helper: materializes server exports and the current care plan as files.

use crate::error::FailureKind;
use crate::form::FormCollector;
use crate::gateway::CarePlanGateway;
use crate::notify::Notifier;
use crate::workflow::CurrentPlan;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const EXPORTED: &str = "Data exported successfully!";
pub const EXPORT_FAILED: &str = "Export failed due to an internal error";
pub const NO_PLAN: &str = "No care plan to download";
pub const DOWNLOADED: &str = "Care plan downloaded successfully!";
pub const DOWNLOAD_FAILED: &str = "Download failed due to an internal error";

/// Where materialized files go.
pub trait FileSink: Send + Sync {
    /// Write `contents` under `file_name`, returning where it landed.
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf>;
}

/// Writes files into one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, file_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let is_plain_name = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        if !is_plain_name {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to write file name {:?}", file_name),
            ));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// `care_plans_export_<unix millis>.csv`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("care_plans_export_{}.csv", now.timestamp_millis())
}

/// `care_plan_<mrn or "unknown">_<YYYY-MM-DDTHH-MM-SS>.txt`
pub fn care_plan_file_name(mrn: &str, now: DateTime<Utc>) -> String {
    let mrn = mrn.trim();
    let mrn = if mrn.is_empty() { "unknown" } else { mrn };
    format!("care_plan_{}_{}.txt", mrn, now.format("%Y-%m-%dT%H-%M-%S"))
}

pub struct ExportHelper {
    gateway: Arc<dyn CarePlanGateway>,
    notifier: Notifier,
    sink: Arc<dyn FileSink>,
    plan: Arc<CurrentPlan>,
    form: Arc<dyn FormCollector>,
}

impl ExportHelper {
    pub fn new(
        gateway: Arc<dyn CarePlanGateway>,
        notifier: Notifier,
        sink: Arc<dyn FileSink>,
        plan: Arc<CurrentPlan>,
        form: Arc<dyn FormCollector>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            sink,
            plan,
            form,
        }
    }

    /// Download every persisted order as CSV.
    pub async fn export_orders(&self) -> Option<PathBuf> {
        let blob = match self.gateway.export_orders().await {
            Ok(blob) => blob,
            Err(e) => {
                let kind = if e.server_message().is_some() {
                    FailureKind::Operation
                } else {
                    FailureKind::Transport
                };
                warn!(%kind, error = %e, "Export failed");
                self.notifier
                    .show_error(e.server_message().unwrap_or(EXPORT_FAILED));
                return None;
            }
        };

        match self.sink.save(&export_file_name(Utc::now()), &blob) {
            Ok(path) => {
                info!(path = %path.display(), bytes = blob.len(), "Orders exported");
                self.notifier.show_success(EXPORTED);
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Failed to write export");
                self.notifier.show_error(EXPORT_FAILED);
                None
            }
        }
    }

    /// Save the current care plan as a text file named after the patient MRN.
    pub fn download_care_plan(&self) -> Option<PathBuf> {
        let text = self.plan.get();
        if text.is_empty() {
            info!(kind = %FailureKind::Precondition, "Download requested without a care plan");
            self.notifier.show_error(NO_PLAN);
            return None;
        }

        let mrn = self.form.collect().patient_mrn;
        let file_name = care_plan_file_name(&mrn, Utc::now());
        match self.sink.save(&file_name, text.as_bytes()) {
            Ok(path) => {
                info!(path = %path.display(), "Care plan downloaded");
                self.notifier.show_success(DOWNLOADED);
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Failed to write care plan");
                self.notifier.show_error(DOWNLOAD_FAILED);
                None
            }
        }
    }
}
