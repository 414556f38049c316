//! Presentation: stats tables and command summaries.

use crate::error::ClientError;
use crate::types::{FullOrder, SanitizedOrder, StatsDisplay};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::path::Path;

pub fn format_stats_table(stats: StatsDisplay) -> String {
    let [orders, patients, providers] = stats.cells();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Total Orders", "Total Patients", "Total Providers"]);
    table.add_row(vec![orders, patients, providers]);
    table.to_string()
}

pub fn format_sanitized_order(order: &SanitizedOrder) -> Result<String, ClientError> {
    serde_json::to_string_pretty(&order.0)
        .map_err(|e| ClientError::InputError(format!("Failed to render sanitized order: {}", e)))
}

pub fn format_submit_summary(order: &FullOrder, download: Option<&Path>) -> String {
    let mut s = String::from("Order submitted.");
    if let Some(mrn) = order.order.get("patient_mrn").and_then(|v| v.as_str()) {
        s.push_str(&format!("\n  Patient MRN: {}", mrn));
    }
    s.push_str(&format!("\n  Care plan: {} characters", order.care_plan.chars().count()));
    if let Some(path) = download {
        s.push_str(&format!("\n  Saved to: {}", path.display()));
    }
    s
}
