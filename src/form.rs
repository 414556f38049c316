//! Form Data Collector: the editable order fields as a flat record.

use crate::error::ClientError;
use crate::types::{OrderField, OrderForm};
use parking_lot::RwLock;
use std::path::Path;

/// Read/clear access to the order form, whatever holds it.
pub trait FormCollector: Send + Sync {
    /// Snapshot of every field.
    fn collect(&self) -> OrderForm;

    /// Reset every field to empty.
    fn clear(&self);
}

/// In-memory form fields.
#[derive(Debug, Default)]
pub struct FormFields {
    fields: RwLock<OrderForm>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(form: OrderForm) -> Self {
        Self {
            fields: RwLock::new(form),
        }
    }

    /// Load field values from a JSON or TOML file (chosen by extension, JSON otherwise).
    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        Ok(Self::with_values(read_order_file(path)?))
    }

    /// Replace every field.
    pub fn fill(&self, form: OrderForm) {
        *self.fields.write() = form;
    }

    pub fn set(&self, field: OrderField, value: impl Into<String>) {
        self.fields.write().set(field, value);
    }

    pub fn get(&self, field: OrderField) -> String {
        self.fields.read().get(field).to_string()
    }
}

impl FormCollector for FormFields {
    fn collect(&self) -> OrderForm {
        self.fields.read().clone()
    }

    fn clear(&self) {
        *self.fields.write() = OrderForm::default();
    }
}

/// Parse an order file.
pub fn read_order_file(path: &Path) -> Result<OrderForm, ClientError> {
    let order_error = |message: String| ClientError::OrderFile {
        path: path.display().to_string(),
        message,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| order_error(e.to_string()))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        toml::from_str(&contents).map_err(|e| order_error(e.to_string()))
    } else {
        serde_json::from_str(&contents).map_err(|e| order_error(e.to_string()))
    }
}
