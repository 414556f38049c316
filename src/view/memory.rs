//! In-memory view: keeps the rendered state and an ordered event log.

use super::{AlertKind, View};
use crate::types::StatsDisplay;
use parking_lot::Mutex;

/// One call made against the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ErrorsShown(Vec<String>),
    WarningsShown(Vec<String>),
    SuccessShown(String),
    AlertHidden(AlertKind),
    LoadingShown(String),
    LoadingHidden,
    CarePlanShown(String),
    CarePlanHidden,
    StatsShown(StatsDisplay),
}

/// What is visible right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub errors: Option<Vec<String>>,
    pub success: Option<String>,
    pub warnings: Option<Vec<String>>,
    pub loading: Option<String>,
    pub care_plan: Option<String>,
    pub stats: Option<StatsDisplay>,
}

/// A [`View`] with no output device.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<SurfaceState>,
    events: Mutex<Vec<ViewEvent>>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SurfaceState {
        self.state.lock().clone()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    /// Number of logged events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().push(event);
    }
}

impl View for MemoryView {
    fn show_errors(&self, errors: &[String]) {
        self.state.lock().errors = Some(errors.to_vec());
        self.record(ViewEvent::ErrorsShown(errors.to_vec()));
    }

    fn show_warnings(&self, warnings: &[String]) {
        self.state.lock().warnings = Some(warnings.to_vec());
        self.record(ViewEvent::WarningsShown(warnings.to_vec()));
    }

    fn show_success(&self, message: &str) {
        self.state.lock().success = Some(message.to_string());
        self.record(ViewEvent::SuccessShown(message.to_string()));
    }

    fn hide_alert(&self, kind: AlertKind) {
        {
            let mut state = self.state.lock();
            match kind {
                AlertKind::Error => state.errors = None,
                AlertKind::Success => state.success = None,
                AlertKind::Warning => state.warnings = None,
            }
        }
        self.record(ViewEvent::AlertHidden(kind));
    }

    fn set_loading(&self, message: Option<&str>) {
        self.state.lock().loading = message.map(str::to_string);
        self.record(match message {
            Some(message) => ViewEvent::LoadingShown(message.to_string()),
            None => ViewEvent::LoadingHidden,
        });
    }

    fn show_care_plan(&self, text: &str) {
        self.state.lock().care_plan = Some(text.to_string());
        self.record(ViewEvent::CarePlanShown(text.to_string()));
    }

    fn hide_care_plan(&self) {
        self.state.lock().care_plan = None;
        self.record(ViewEvent::CarePlanHidden);
    }

    fn show_stats(&self, stats: StatsDisplay) {
        self.state.lock().stats = Some(stats);
        self.record(ViewEvent::StatsShown(stats));
    }
}
