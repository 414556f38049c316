//! End-to-end session flows over HTTP against a mock care plan service

use careplan::config::ServerConfig;
use careplan::export::{DirectorySink, NO_PLAN};
use careplan::form::{FormCollector, FormFields};
use careplan::gateway::HttpGateway;
use careplan::session::{CarePlanSession, SessionOptions};
use careplan::types::{OrderField, StatsDisplay, StatsSnapshot};
use careplan::view::MemoryView;
use careplan::workflow::{WorkflowOutcome, WorkflowState, SUBMITTED};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    view: Arc<MemoryView>,
    form: Arc<FormFields>,
    session: CarePlanSession,
}

fn harness(server: &MockServer, download_dir: &Path) -> Harness {
    let gateway = HttpGateway::new(&ServerConfig {
        base_url: server.uri(),
        ..ServerConfig::default()
    })
    .unwrap();
    let view = Arc::new(MemoryView::new());
    let form = Arc::new(FormFields::new());
    let session = CarePlanSession::new(
        Arc::new(gateway),
        view.clone(),
        form.clone(),
        Arc::new(DirectorySink::new(download_dir)),
        SessionOptions {
            auto_refresh: false,
            ..SessionOptions::default()
        },
    );
    Harness {
        view,
        form,
        session,
    }
}

async fn mount_stats(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/care-plan/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_orders": 4,
            "total_patients": 3,
            "total_providers": 2
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_submit_flow_persists_order_and_refreshes_stats() {
    let server = MockServer::start().await;
    mount_stats(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/care-plan/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "warnings": ["Provider NPI not found in registry"],
            "sanitized_data": { "patient_mrn": "123456" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/care-plan/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_order": { "patient_mrn": "123456", "care_plan": "1. Problem list" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/care-plan/submit"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let downloads = TempDir::new().unwrap();
    let h = harness(&server, downloads.path());
    h.session.start().await.unwrap();
    assert_eq!(
        h.view.state().stats,
        Some(StatsDisplay::Snapshot(StatsSnapshot {
            total_orders: 4,
            total_patients: 3,
            total_providers: 2,
        }))
    );

    h.form.set(OrderField::PatientMrn, "123456");
    let outcome = h.session.handle_submit().await;
    let order = match outcome {
        WorkflowOutcome::Completed(order) => order,
        other => panic!("expected completed workflow, got {:?}", other),
    };
    assert_eq!(order.care_plan, "1. Problem list");

    let state = h.view.state();
    assert_eq!(state.success.as_deref(), Some(SUBMITTED));
    assert_eq!(
        state.warnings,
        Some(vec!["Provider NPI not found in registry".to_string()])
    );
    assert_eq!(state.care_plan.as_deref(), Some("1. Problem list"));
    assert_eq!(state.loading, None);
    assert_eq!(h.session.workflow_state(), WorkflowState::Idle);

    let saved = h.session.handle_download().unwrap();
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "1. Problem list");
}

#[tokio::test]
async fn test_rejected_validation_stops_before_generation() {
    let server = MockServer::start().await;
    mount_stats(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/care-plan/validate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["Patient MRN is required", "Medication is required"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/care-plan/generate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let downloads = TempDir::new().unwrap();
    let h = harness(&server, downloads.path());

    let outcome = h.session.handle_submit().await;
    assert!(matches!(outcome, WorkflowOutcome::Halted(_)));
    assert_eq!(
        h.view.state().errors,
        Some(vec![
            "Patient MRN is required".to_string(),
            "Medication is required".to_string(),
        ])
    );
    assert!(h.session.current_plan().is_empty());

    assert!(h.session.handle_download().is_none());
    assert_eq!(h.view.state().errors, Some(vec![NO_PLAN.to_string()]));
}

#[tokio::test]
async fn test_reset_clears_form_and_plan() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();
    let h = harness(&server, downloads.path());

    h.form.set(OrderField::PatientFirstName, "Ada");
    h.session.handle_reset();

    assert!(h.form.collect().is_blank());
    assert!(h.session.current_plan().is_empty());
    assert_eq!(h.view.state().care_plan, None);
}
