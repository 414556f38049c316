//! Terminal view: banners as colored lines, the care plan as a framed block.

use super::{AlertKind, View};
use crate::types::StatsDisplay;
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::io::Write;
use tracing::{debug, warn};

/// Renders to a terminal stream. Stats are kept, not printed, so background refreshes
/// never interleave with prompts; callers render them with [`TerminalView::latest_stats`].
/// Banners raised while a prompt is open are queued with [`TerminalView::hold`] and written
/// by [`TerminalView::release`].
pub struct TerminalView {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
    stats: Mutex<StatsDisplay>,
    held: Mutex<Option<Vec<String>>>,
}

impl TerminalView {
    pub fn stdout(color: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), color)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
            stats: Mutex::new(StatsDisplay::Loading),
            held: Mutex::new(None),
        }
    }

    pub fn latest_stats(&self) -> StatsDisplay {
        *self.stats.lock()
    }

    /// Queue output instead of writing it.
    pub fn hold(&self) {
        let mut held = self.held.lock();
        if held.is_none() {
            *held = Some(Vec::new());
        }
    }

    /// Write everything queued since [`TerminalView::hold`] and resume direct output.
    pub fn release(&self) {
        let pending = self.held.lock().take();
        for text in pending.into_iter().flatten() {
            self.write_out(&text);
        }
    }

    fn emit(&self, text: &str) {
        if let Some(pending) = self.held.lock().as_mut() {
            pending.push(text.to_string());
            return;
        }
        self.write_out(text);
    }

    fn write_out(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn paint(&self, text: &str, kind: AlertKind) -> String {
        if !self.color {
            return text.to_string();
        }
        match kind {
            AlertKind::Error => text.red().bold().to_string(),
            AlertKind::Success => text.green().bold().to_string(),
            AlertKind::Warning => text.yellow().bold().to_string(),
        }
    }

    fn list(&self, title: &str, items: &[String], kind: AlertKind) {
        let mut block = self.paint(title, kind);
        for item in items {
            block.push_str(&format!("\n  - {}", item));
        }
        self.emit(&block);
    }
}

impl View for TerminalView {
    fn show_errors(&self, errors: &[String]) {
        self.list("✗ Error", errors, AlertKind::Error);
    }

    fn show_warnings(&self, warnings: &[String]) {
        self.list("! Warning", warnings, AlertKind::Warning);
    }

    fn show_success(&self, message: &str) {
        let line = format!("✓ {}", message);
        self.emit(&self.paint(&line, AlertKind::Success));
    }

    fn hide_alert(&self, kind: AlertKind) {
        debug!(?kind, "Alert cleared");
    }

    fn set_loading(&self, message: Option<&str>) {
        if let Some(message) = message {
            let line = if self.color {
                message.dimmed().to_string()
            } else {
                message.to_string()
            };
            self.emit(&line);
        }
    }

    fn show_care_plan(&self, text: &str) {
        let rule = "─".repeat(60);
        let title = if self.color {
            "Care Plan".bold().to_string()
        } else {
            "Care Plan".to_string()
        };
        self.emit(&format!("{}\n{}\n{}\n{}", rule, title, text, rule));
    }

    fn hide_care_plan(&self) {
        debug!("Care plan output cleared");
    }

    fn show_stats(&self, stats: StatsDisplay) {
        *self.stats.lock() = stats;
        debug!(%stats, "Stats updated");
    }
}
