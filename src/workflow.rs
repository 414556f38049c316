//! Workflow Orchestrator
//!
//! Sequences validate → generate → submit, decides what the notification surface shows
//! at each step, and owns the in-flight state and the current care plan text.
//!
//! Every gateway failure is absorbed here and turned into a banner. A step that yields
//! nothing halts the composite workflow; later steps never run.

use crate::error::FailureKind;
use crate::gateway::CarePlanGateway;
use crate::notify::Notifier;
use crate::stats::StatsPoller;
use crate::types::{errors_or_fallback, FullOrder, OrderForm, Outcome, SanitizedOrder};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const VALIDATION_PASSED: &str = "Validation passed! You can now generate the care plan";
pub const VALIDATION_FALLBACK: &str = "Unknown validation error";
pub const VALIDATION_REQUEST_FAILED: &str = "Validation request failed due to an internal error";
pub const GENERATING: &str = "Generating care plan...";
pub const GENERATED: &str = "Care plan generated successfully!";
pub const GENERATE_FAILED: &str = "Failed to generate care plan due to an internal error";
pub const SUBMITTING: &str = "Submitting order...";
pub const SUBMITTED: &str = "Order and Care Plan persisted successfully!";
pub const SUBMIT_FAILED: &str = "Failed to submit order due to an internal error";

/// Request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Validating,
    Validated,
    Generating,
    Generated,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Validate,
    Generate,
    Submit,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkflowStep::Validate => "validate",
            WorkflowStep::Generate => "generate",
            WorkflowStep::Submit => "submit",
        })
    }
}

/// Result of one composite submit workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// The order and its care plan were persisted.
    Completed(FullOrder),
    /// The named step failed; nothing after it ran (except the stats refresh after submit).
    Halted(WorkflowStep),
    /// Another run was already in flight; nothing was done.
    Busy,
}

/// Last successfully generated care plan text, or empty.
#[derive(Debug, Default)]
pub struct CurrentPlan {
    text: RwLock<String>,
}

impl CurrentPlan {
    pub fn get(&self) -> String {
        self.text.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.text.read().is_empty()
    }

    pub(crate) fn set(&self, text: &str) {
        *self.text.write() = text.to_string();
    }

    pub(crate) fn clear(&self) {
        self.text.write().clear();
    }
}

/// Releases the single-flight flag.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Workflow {
    gateway: Arc<dyn CarePlanGateway>,
    notifier: Notifier,
    stats: Arc<StatsPoller>,
    plan: Arc<CurrentPlan>,
    state: Mutex<WorkflowState>,
    in_flight: AtomicBool,
}

fn non_empty(warnings: Option<Vec<String>>) -> Option<Vec<String>> {
    warnings.filter(|w| !w.is_empty())
}

impl Workflow {
    pub fn new(
        gateway: Arc<dyn CarePlanGateway>,
        notifier: Notifier,
        stats: Arc<StatsPoller>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            stats,
            plan: Arc::new(CurrentPlan::default()),
            state: Mutex::new(WorkflowState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WorkflowState {
        *self.state.lock()
    }

    /// Read handle on the current care plan text.
    pub fn current_plan(&self) -> Arc<CurrentPlan> {
        Arc::clone(&self.plan)
    }

    /// True while a composite workflow is in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn transition(&self, next: WorkflowState) {
        let mut state = self.state.lock();
        debug!(from = ?*state, to = ?next, "Workflow transition");
        *state = next;
    }

    /// Hide the care plan output and forget its text.
    pub fn hide_care_plan(&self) {
        self.notifier.hide_care_plan();
        self.plan.clear();
    }

    /// Back to a blank slate: no plan, no banners, idle.
    pub fn reset(&self) {
        self.hide_care_plan();
        self.notifier.hide_all();
        self.transition(WorkflowState::Idle);
    }

    /// Validate the form. Returns the sanitized order, or `None` to abort.
    pub async fn validate(&self, form: &OrderForm) -> Option<SanitizedOrder> {
        self.notifier.hide_all();
        self.transition(WorkflowState::Validating);

        match self.gateway.validate_order(form).await {
            Ok(Outcome::Success(payload)) => {
                if let Some(warnings) = non_empty(payload.warnings) {
                    info!(count = warnings.len(), "Validation passed with warnings");
                    self.notifier.show_warnings(&warnings);
                }
                self.notifier.show_success(VALIDATION_PASSED);
                match payload.sanitized_data {
                    Some(sanitized) => {
                        self.transition(WorkflowState::Validated);
                        Some(sanitized)
                    }
                    None => {
                        warn!("Validation passed without sanitized data");
                        self.transition(WorkflowState::Idle);
                        None
                    }
                }
            }
            Ok(Outcome::Failure(errors)) => {
                let errors = errors_or_fallback(errors, VALIDATION_FALLBACK);
                info!(kind = %FailureKind::Validation, count = errors.len(), "Validation rejected");
                self.notifier.show_errors(&errors);
                self.transition(WorkflowState::Idle);
                None
            }
            Err(e) => {
                warn!(kind = %FailureKind::Transport, error = %e, "Validation request failed");
                self.notifier.show_error(VALIDATION_REQUEST_FAILED);
                self.transition(WorkflowState::Idle);
                None
            }
        }
    }

    /// Generate a care plan for a validated order. Returns the full order, or `None`.
    pub async fn generate(&self, order: &SanitizedOrder) -> Option<FullOrder> {
        let _loading = self.notifier.loading(GENERATING);
        self.hide_care_plan();
        self.transition(WorkflowState::Generating);

        match self.gateway.generate_care_plan(order).await {
            Ok(Outcome::Success(payload)) => {
                if let Some(warnings) = non_empty(payload.warnings) {
                    self.notifier.show_warnings(&warnings);
                }
                let full_order = payload.full_order;
                self.plan.set(&full_order.care_plan);
                self.notifier.show_care_plan(&full_order.care_plan);
                self.notifier.show_success(GENERATED);
                info!(plan_len = full_order.care_plan.len(), "Care plan generated");
                self.transition(WorkflowState::Generated);
                Some(full_order)
            }
            Ok(Outcome::Failure(errors)) => {
                info!(kind = %FailureKind::Operation, "Care plan generation rejected");
                self.notifier
                    .show_errors(&errors_or_fallback(errors, GENERATE_FAILED));
                self.transition(WorkflowState::Idle);
                None
            }
            Err(e) => {
                warn!(kind = %FailureKind::Transport, error = %e, "Care plan generation failed");
                self.notifier.show_error(GENERATE_FAILED);
                self.transition(WorkflowState::Idle);
                None
            }
        }
    }

    /// Persist a generated order. Returns whether the server accepted it.
    pub async fn submit(&self, order: &FullOrder) -> bool {
        let _loading = self.notifier.loading(SUBMITTING);
        self.transition(WorkflowState::Submitting);

        let accepted = match self.gateway.submit_order(order).await {
            Ok(Outcome::Success(())) => {
                info!("Order persisted");
                self.notifier.show_success(SUBMITTED);
                true
            }
            Ok(Outcome::Failure(errors)) => {
                info!(kind = %FailureKind::Operation, "Order submission rejected");
                self.notifier
                    .show_errors(&errors_or_fallback(errors, SUBMIT_FAILED));
                false
            }
            Err(e) => {
                warn!(kind = %FailureKind::Transport, error = %e, "Order submission failed");
                self.notifier.show_error(SUBMIT_FAILED);
                false
            }
        };
        self.transition(WorkflowState::Idle);
        accepted
    }

    /// Validate, generate, submit, then refresh stats once. Rejects overlapping runs.
    pub async fn run(&self, form: &OrderForm) -> WorkflowOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Submit workflow already in progress; ignoring trigger");
            return WorkflowOutcome::Busy;
        }
        let _flight = FlightGuard(&self.in_flight);

        let Some(sanitized) = self.validate(form).await else {
            return WorkflowOutcome::Halted(WorkflowStep::Validate);
        };
        let Some(full_order) = self.generate(&sanitized).await else {
            return WorkflowOutcome::Halted(WorkflowStep::Generate);
        };
        let accepted = self.submit(&full_order).await;
        self.stats.load().await;

        if accepted {
            WorkflowOutcome::Completed(full_order)
        } else {
            WorkflowOutcome::Halted(WorkflowStep::Submit)
        }
    }
}
