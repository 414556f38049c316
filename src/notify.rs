//! Notification Surface
//!
//! Banner policy over a [`View`]: errors replace every banner, while warnings and
//! success messages are additive. The loading indicator is held through a guard so it
//! is released on every exit path.

use crate::types::{StatsDisplay, StatsSnapshot};
use crate::view::{AlertKind, View};
use std::sync::Arc;

#[derive(Clone)]
pub struct Notifier {
    view: Arc<dyn View>,
}

impl Notifier {
    pub fn new(view: Arc<dyn View>) -> Self {
        Self { view }
    }

    /// Hide the error, success and warning banners.
    pub fn hide_all(&self) {
        for kind in AlertKind::ALL {
            self.view.hide_alert(kind);
        }
    }

    /// Replace every banner with an error list.
    pub fn show_errors(&self, errors: &[String]) {
        self.hide_all();
        self.view.show_errors(errors);
    }

    pub fn show_error(&self, message: &str) {
        self.show_errors(&[message.to_string()]);
    }

    /// Shown on top of whatever is visible.
    pub fn show_warnings(&self, warnings: &[String]) {
        self.view.show_warnings(warnings);
    }

    /// Replaces an earlier success message; leaves warnings alone.
    pub fn show_success(&self, message: &str) {
        self.view.show_success(message);
    }

    /// Show the busy indicator until the returned guard is dropped.
    #[must_use = "the loading indicator is hidden as soon as the guard is dropped"]
    pub fn loading(&self, message: &str) -> LoadingGuard {
        self.view.set_loading(Some(message));
        LoadingGuard {
            view: Arc::clone(&self.view),
        }
    }

    pub fn show_care_plan(&self, text: &str) {
        self.view.show_care_plan(text);
    }

    pub fn hide_care_plan(&self) {
        self.view.hide_care_plan();
    }

    pub fn stats_loading(&self) {
        self.view.show_stats(StatsDisplay::Loading);
    }

    pub fn update_stats(&self, stats: StatsSnapshot) {
        self.view.show_stats(StatsDisplay::Snapshot(stats));
    }

    pub fn stats_unavailable(&self) {
        self.view.show_stats(StatsDisplay::Unavailable);
    }
}

/// Hides the loading indicator when dropped.
pub struct LoadingGuard {
    view: Arc<dyn View>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.view.set_loading(None);
    }
}
