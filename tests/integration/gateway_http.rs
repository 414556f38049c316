//! HTTP gateway against a mock care plan service

use careplan::config::ServerConfig;
use careplan::error::GatewayError;
use careplan::gateway::{CarePlanGateway, HttpGateway};
use careplan::types::{FullOrder, OrderForm, Outcome, SanitizedOrder};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&ServerConfig {
        base_url: format!("{}/", server.uri()),
        ..ServerConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_stats_bypasses_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/care-plan/stats"))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_orders": 12,
            "total_patients": 7,
            "total_providers": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = gateway(&server).fetch_stats().await.unwrap();
    assert_eq!(stats.total_orders, 12);
    assert_eq!(stats.total_patients, 7);
    assert_eq!(stats.total_providers, 3);
}

#[tokio::test]
async fn test_stats_error_status_is_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/care-plan/stats"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "errors": ["boom"] })))
        .mount(&server)
        .await;

    let err = gateway(&server).fetch_stats().await.unwrap_err();
    assert!(matches!(err, GatewayError::UnexpectedStatus(500)));
}

#[tokio::test]
async fn test_validate_posts_form_and_reads_both_outcomes() {
    let server = MockServer::start().await;
    let mut form = OrderForm::default();
    form.patient_mrn = "123456".to_string();
    let form_json = serde_json::to_value(&form).unwrap();

    Mock::given(method("POST"))
        .and(path("/care-plan/validate"))
        .and(body_json(&form_json))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "warnings": ["Possible duplicate order"],
            "sanitized_data": { "patient_mrn": "123456" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/care-plan/validate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "errors": ["MRN must be 6 digits"] })),
        )
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    match gateway.validate_order(&form).await.unwrap() {
        Outcome::Success(payload) => {
            assert_eq!(
                payload.warnings,
                Some(vec!["Possible duplicate order".to_string()])
            );
            assert_eq!(
                payload.sanitized_data,
                Some(SanitizedOrder(json!({ "patient_mrn": "123456" })))
            );
        }
        other => panic!("expected success, got {:?}", other),
    }

    match gateway.validate_order(&form).await.unwrap() {
        Outcome::Failure(errors) => {
            assert_eq!(errors, Some(vec!["MRN must be 6 digits".to_string()]));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_returns_full_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/care-plan/generate"))
        .and(body_json(json!({ "patient_mrn": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_order": { "patient_mrn": "123456", "care_plan": "PLAN" }
        })))
        .mount(&server)
        .await;

    let outcome = gateway(&server)
        .generate_care_plan(&SanitizedOrder(json!({ "patient_mrn": "123456" })))
        .await
        .unwrap();
    match outcome {
        Outcome::Success(payload) => {
            assert_eq!(payload.full_order.care_plan, "PLAN");
            assert_eq!(payload.full_order.order["patient_mrn"], json!("123456"));
            assert_eq!(payload.warnings, None);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_failure_without_errors_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/care-plan/submit"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let order: FullOrder =
        serde_json::from_value(json!({ "care_plan": "PLAN", "patient_mrn": "123456" })).unwrap();
    let outcome = gateway(&server).submit_order(&order).await.unwrap();
    assert_eq!(outcome, Outcome::Failure(None));
}

#[tokio::test]
async fn test_submit_success_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/care-plan/submit"))
        .and(body_json(json!({ "care_plan": "PLAN", "patient_mrn": "123456" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let order: FullOrder =
        serde_json::from_value(json!({ "care_plan": "PLAN", "patient_mrn": "123456" })).unwrap();
    let outcome = gateway(&server).submit_order(&order).await.unwrap();
    assert_eq!(outcome, Outcome::Success(()));
}

#[tokio::test]
async fn test_non_json_failure_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/care-plan/validate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .validate_order(&OrderForm::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn test_export_returns_raw_bytes_or_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/care-plan/orders"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("patient_mrn,care_plan\n123456,PLAN\n", "text/csv"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/care-plan/orders"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "No orders to export" })),
        )
        .mount(&server)
        .await;

    let gateway = gateway(&server);
    let blob = gateway.export_orders().await.unwrap();
    assert_eq!(blob, b"patient_mrn,care_plan\n123456,PLAN\n".to_vec());

    let err = gateway.export_orders().await.unwrap_err();
    assert_eq!(err.server_message(), Some("No orders to export"));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let gateway = HttpGateway::new(&ServerConfig {
        base_url: format!("http://127.0.0.1:{}", port),
        ..ServerConfig::default()
    })
    .unwrap();
    let err = gateway.fetch_stats().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}
