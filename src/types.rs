//! Wire types exchanged with the care plan service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The editable order form. Every field is a string; an absent field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_mrn: String,
    pub provider_name: String,
    pub provider_npi: String,
    pub primary_diagnosis: String,
    pub medication: String,
    pub additional_diagnoses: String,
    pub medication_history: String,
    pub patient_records: String,
}

/// Names of the form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    PatientFirstName,
    PatientLastName,
    PatientMrn,
    ProviderName,
    ProviderNpi,
    PrimaryDiagnosis,
    Medication,
    AdditionalDiagnoses,
    MedicationHistory,
    PatientRecords,
}

impl OrderField {
    pub const ALL: [OrderField; 10] = [
        OrderField::PatientFirstName,
        OrderField::PatientLastName,
        OrderField::PatientMrn,
        OrderField::ProviderName,
        OrderField::ProviderNpi,
        OrderField::PrimaryDiagnosis,
        OrderField::Medication,
        OrderField::AdditionalDiagnoses,
        OrderField::MedicationHistory,
        OrderField::PatientRecords,
    ];

    /// Wire name of the field.
    pub fn key(&self) -> &'static str {
        match self {
            OrderField::PatientFirstName => "patient_first_name",
            OrderField::PatientLastName => "patient_last_name",
            OrderField::PatientMrn => "patient_mrn",
            OrderField::ProviderName => "provider_name",
            OrderField::ProviderNpi => "provider_npi",
            OrderField::PrimaryDiagnosis => "primary_diagnosis",
            OrderField::Medication => "medication",
            OrderField::AdditionalDiagnoses => "additional_diagnoses",
            OrderField::MedicationHistory => "medication_history",
            OrderField::PatientRecords => "patient_records",
        }
    }

    /// Human-readable label used for prompts.
    pub fn label(&self) -> &'static str {
        match self {
            OrderField::PatientFirstName => "Patient first name",
            OrderField::PatientLastName => "Patient last name",
            OrderField::PatientMrn => "Patient MRN",
            OrderField::ProviderName => "Provider name",
            OrderField::ProviderNpi => "Provider NPI",
            OrderField::PrimaryDiagnosis => "Primary diagnosis",
            OrderField::Medication => "Medication",
            OrderField::AdditionalDiagnoses => "Additional diagnoses",
            OrderField::MedicationHistory => "Medication history",
            OrderField::PatientRecords => "Patient records",
        }
    }
}

impl OrderForm {
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::PatientFirstName => &self.patient_first_name,
            OrderField::PatientLastName => &self.patient_last_name,
            OrderField::PatientMrn => &self.patient_mrn,
            OrderField::ProviderName => &self.provider_name,
            OrderField::ProviderNpi => &self.provider_npi,
            OrderField::PrimaryDiagnosis => &self.primary_diagnosis,
            OrderField::Medication => &self.medication,
            OrderField::AdditionalDiagnoses => &self.additional_diagnoses,
            OrderField::MedicationHistory => &self.medication_history,
            OrderField::PatientRecords => &self.patient_records,
        }
    }

    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        let slot = match field {
            OrderField::PatientFirstName => &mut self.patient_first_name,
            OrderField::PatientLastName => &mut self.patient_last_name,
            OrderField::PatientMrn => &mut self.patient_mrn,
            OrderField::ProviderName => &mut self.provider_name,
            OrderField::ProviderNpi => &mut self.provider_npi,
            OrderField::PrimaryDiagnosis => &mut self.primary_diagnosis,
            OrderField::Medication => &mut self.medication,
            OrderField::AdditionalDiagnoses => &mut self.additional_diagnoses,
            OrderField::MedicationHistory => &mut self.medication_history,
            OrderField::PatientRecords => &mut self.patient_records,
        };
        *slot = value.into();
    }

    /// True when every field is empty.
    pub fn is_blank(&self) -> bool {
        OrderField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

/// Server-normalized order. Opaque to the client; passed back to generate unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanitizedOrder(pub Value);

/// Generated order: the care plan text plus the order data it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullOrder {
    pub care_plan: String,
    #[serde(flatten)]
    pub order: Map<String, Value>,
}

/// Aggregate counts reported by the stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_orders: u64,
    pub total_patients: u64,
    pub total_providers: u64,
}

/// What the stats area currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsDisplay {
    Loading,
    Snapshot(StatsSnapshot),
    /// The last refresh failed. Distinct from a snapshot of zeros.
    Unavailable,
}

impl StatsDisplay {
    /// Cell text for (orders, patients, providers).
    pub fn cells(&self) -> [String; 3] {
        match self {
            StatsDisplay::Loading => ["...".into(), "...".into(), "...".into()],
            StatsDisplay::Unavailable => ["—".into(), "—".into(), "—".into()],
            StatsDisplay::Snapshot(stats) => [
                stats.total_orders.to_string(),
                stats.total_patients.to_string(),
                stats.total_providers.to_string(),
            ],
        }
    }
}

impl fmt::Display for StatsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [orders, patients, providers] = self.cells();
        write!(
            f,
            "orders: {}  patients: {}  providers: {}",
            orders, patients, providers
        )
    }
}

/// Tagged result of a remote call that reached the server and got a JSON answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// The server refused the request. `None` when the body had no `errors` list.
    Failure(Option<Vec<String>>),
}

/// Server errors, or the single fallback message when the list is missing or empty.
pub fn errors_or_fallback(errors: Option<Vec<String>>, fallback: &str) -> Vec<String> {
    match errors {
        Some(errors) if !errors.is_empty() => errors,
        _ => vec![fallback.to_string()],
    }
}

/// Successful validation payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationPayload {
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub sanitized_data: Option<SanitizedOrder>,
}

/// Successful generation payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationPayload {
    pub full_order: FullOrder,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// Failure body shared by validate, generate and submit.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorListBody {
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// Failure body of the export endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ExportErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
