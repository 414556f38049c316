//! Scripted gateway shared by unit tests.

use crate::error::GatewayError;
use crate::gateway::CarePlanGateway;
use crate::types::{
    FullOrder, GenerationPayload, OrderForm, Outcome, SanitizedOrder, StatsSnapshot,
    ValidationPayload,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Scripted reply for one operation.
#[derive(Debug, Clone)]
pub(crate) enum Script<T> {
    Accept(T),
    Reject(Option<Vec<String>>),
    Raise,
}

#[derive(Debug, Default)]
pub(crate) struct CallCounts {
    pub stats: AtomicUsize,
    pub validate: AtomicUsize,
    pub generate: AtomicUsize,
    pub submit: AtomicUsize,
    pub export: AtomicUsize,
}

pub(crate) struct ScriptedGateway {
    pub stats: Mutex<Option<StatsSnapshot>>,
    pub validate: Mutex<Script<ValidationPayload>>,
    pub generate: Mutex<Script<GenerationPayload>>,
    pub submit: Mutex<Script<()>>,
    pub export: Mutex<Script<Vec<u8>>>,
    pub calls: CallCounts,
    pub submitted: Mutex<Vec<FullOrder>>,
    /// When set, validate parks until the gate is notified.
    pub validate_gate: Mutex<Option<Arc<Notify>>>,
    pub validate_entered: Arc<Notify>,
}

pub(crate) fn full_order(plan: &str) -> FullOrder {
    let mut order = serde_json::Map::new();
    order.insert("patient_mrn".to_string(), json!("123456"));
    FullOrder {
        care_plan: plan.to_string(),
        order,
    }
}

impl ScriptedGateway {
    /// Every operation succeeds.
    pub fn happy() -> Self {
        Self {
            stats: Mutex::new(Some(StatsSnapshot {
                total_orders: 3,
                total_patients: 2,
                total_providers: 1,
            })),
            validate: Mutex::new(Script::Accept(ValidationPayload {
                warnings: None,
                sanitized_data: Some(SanitizedOrder(json!({ "a": 1 }))),
            })),
            generate: Mutex::new(Script::Accept(GenerationPayload {
                full_order: full_order("PLAN TEXT"),
                warnings: None,
            })),
            submit: Mutex::new(Script::Accept(())),
            export: Mutex::new(Script::Accept(b"patient_mrn,care_plan\n".to_vec())),
            calls: CallCounts::default(),
            submitted: Mutex::new(Vec::new()),
            validate_gate: Mutex::new(None),
            validate_entered: Arc::new(Notify::new()),
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn play<T: Clone>(script: &Mutex<Script<T>>) -> Result<Outcome<T>, GatewayError> {
    match script.lock().clone() {
        Script::Accept(payload) => Ok(Outcome::Success(payload)),
        Script::Reject(errors) => Ok(Outcome::Failure(errors)),
        Script::Raise => Err(GatewayError::Transport("connection refused".to_string())),
    }
}

#[async_trait]
impl CarePlanGateway for ScriptedGateway {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError> {
        self.calls.stats.fetch_add(1, Ordering::SeqCst);
        let stats = *self.stats.lock();
        stats.ok_or(GatewayError::UnexpectedStatus(500))
    }

    async fn validate_order(
        &self,
        _form: &OrderForm,
    ) -> Result<Outcome<ValidationPayload>, GatewayError> {
        self.calls.validate.fetch_add(1, Ordering::SeqCst);
        let gate = self.validate_gate.lock().clone();
        if let Some(gate) = gate {
            self.validate_entered.notify_one();
            gate.notified().await;
        }
        play(&self.validate)
    }

    async fn generate_care_plan(
        &self,
        _order: &SanitizedOrder,
    ) -> Result<Outcome<GenerationPayload>, GatewayError> {
        self.calls.generate.fetch_add(1, Ordering::SeqCst);
        play(&self.generate)
    }

    async fn submit_order(&self, order: &FullOrder) -> Result<Outcome<()>, GatewayError> {
        self.calls.submit.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().push(order.clone());
        play(&self.submit)
    }

    async fn export_orders(&self) -> Result<Vec<u8>, GatewayError> {
        self.calls.export.fetch_add(1, Ordering::SeqCst);
        match self.export.lock().clone() {
            Script::Accept(blob) => Ok(blob),
            Script::Reject(errors) => Err(GatewayError::Rejected(
                errors.and_then(|e| e.into_iter().next()),
            )),
            Script::Raise => Err(GatewayError::Decode("expected value".to_string())),
        }
    }
}
