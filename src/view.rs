//! View binding: the rendering capabilities the client drives.
//!
//! Implementations only render. Banner policy (what hides what) lives in
//! [`crate::notify::Notifier`].

use crate::types::StatsDisplay;

mod memory;
mod terminal;

pub use memory::{MemoryView, SurfaceState, ViewEvent};
pub use terminal::TerminalView;

/// The three banner channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Error,
    Success,
    Warning,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [AlertKind::Error, AlertKind::Success, AlertKind::Warning];
}

/// Rendering capabilities.
pub trait View: Send + Sync {
    fn show_errors(&self, errors: &[String]);

    fn show_warnings(&self, warnings: &[String]);

    fn show_success(&self, message: &str);

    fn hide_alert(&self, kind: AlertKind);

    /// `Some(message)` shows the busy indicator and disables submission; `None` hides it.
    fn set_loading(&self, message: Option<&str>);

    fn show_care_plan(&self, text: &str);

    fn hide_care_plan(&self);

    fn show_stats(&self, stats: StatsDisplay);
}
