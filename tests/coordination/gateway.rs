use std::sync::Arc;

use harvestd::{
    config::GatewayConfig,
    gateway::{GatewayErrorKind, InferenceGateway, types::CutDecision},
    store::CutResultStore,
};

use crate::support::{StubServer, sample_features};

fn gateway_for(base_url: &str, store: Arc<CutResultStore>) -> InferenceGateway {
    let config = GatewayConfig {
        base_url: base_url.to_string(),
        ..GatewayConfig::default()
    };
    InferenceGateway::new(&config, store).expect("gateway must build")
}

#[tokio::test]
async fn cut_decision_is_returned_and_stored() {
    let server = StubServer::start(
        200,
        r#"{"x_coordinate":3,"y_coordinate":5,"probability":0.92,"cut_decision":"cut_plant"}"#,
    )
    .await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let decision = gateway
        .analyze(&sample_features(3, 5))
        .await
        .expect("analyze must succeed");

    assert_eq!(decision.x_coordinate, 3);
    assert_eq!(decision.y_coordinate, 5);
    assert_eq!(decision.cut_decision, CutDecision::CutPlant);
    assert!((decision.probability - 0.92).abs() < 1e-9);
    assert_eq!(store.count(), 1);
    assert_eq!(store.snapshot()[0], decision);
}

#[tokio::test]
async fn no_cut_decision_is_returned_but_never_stored() {
    let server = StubServer::start(
        200,
        r#"{"x_coordinate":1,"y_coordinate":1,"probability":0.12,"cut_decision":"no_cut"}"#,
    )
    .await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let decision = gateway
        .analyze(&sample_features(1, 1))
        .await
        .expect("analyze must succeed");

    assert_eq!(decision.cut_decision, CutDecision::NoCut);
    assert!(store.is_empty());
}

#[tokio::test]
async fn cut_neighbors_decision_is_stored() {
    let server = StubServer::start(
        200,
        r#"{"x_coordinate":2,"y_coordinate":4,"probability":0.88,"cut_decision":"cut_neighbors"}"#,
    )
    .await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let decision = gateway
        .analyze(&sample_features(2, 4))
        .await
        .expect("analyze must succeed");

    assert_eq!(decision.cut_decision, CutDecision::CutNeighbors);
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn http_error_carries_status_and_body() {
    let server = StubServer::start(500, r#"{"detail":"model not loaded"}"#).await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let err = gateway
        .analyze(&sample_features(0, 0))
        .await
        .expect_err("non-2xx must fail");

    assert_eq!(err.kind, GatewayErrorKind::Transport);
    assert_eq!(err.http_status, Some(500));
    assert!(err.message.contains("HTTP 500"));
    assert!(err.message.contains("model not loaded"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = StubServer::start(200, "not json at all").await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let err = gateway
        .analyze(&sample_features(0, 0))
        .await
        .expect_err("malformed body must fail");

    assert_eq!(err.kind, GatewayErrorKind::Parse);
    assert!(store.is_empty());
}

#[tokio::test]
async fn legacy_boolean_schema_is_a_parse_error() {
    let server = StubServer::start(
        200,
        r#"{"x_coordinate":1,"y_coordinate":2,"probability":0.5,"cut_decision":true}"#,
    )
    .await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let err = gateway
        .analyze(&sample_features(1, 2))
        .await
        .expect_err("boolean cut_decision must fail");

    assert_eq!(err.kind, GatewayErrorKind::Parse);
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Nothing listens on this port; the listener is dropped immediately.
    let unused = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener must bind");
    let base_url = format!("http://{}", unused.local_addr().expect("addr"));
    drop(unused);

    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&base_url, Arc::clone(&store));

    let err = gateway
        .analyze(&sample_features(0, 0))
        .await
        .expect_err("connection refused must fail");
    assert_eq!(err.kind, GatewayErrorKind::Transport);
    assert_eq!(err.http_status, None);
}

#[tokio::test]
async fn request_wire_format_round_trips() {
    let server = StubServer::start(
        200,
        r#"{"x_coordinate":7,"y_coordinate":9,"probability":0.5,"cut_decision":"no_cut"}"#,
    )
    .await;
    let store = Arc::new(CutResultStore::new());
    let gateway = gateway_for(&server.base_url, Arc::clone(&store));

    let features = sample_features(7, 9);
    gateway
        .analyze(&features)
        .await
        .expect("analyze must succeed");

    let bodies = server.received_bodies();
    assert_eq!(bodies.len(), 1);
    let expected = serde_json::to_value(&features).expect("features must encode");
    assert_eq!(bodies[0], expected);

    // The coordinates survive as exact integers on the receiving side.
    assert_eq!(bodies[0]["x_coordinate"], serde_json::json!(7));
    assert_eq!(bodies[0]["y_coordinate"], serde_json::json!(9));
    let redness = bodies[0]["fruit_redness"]
        .as_f64()
        .expect("fruit_redness must be a number");
    assert!((redness - features.fruit_redness).abs() < 1e-12);
}

#[test]
fn invalid_configuration_is_rejected() {
    let store = Arc::new(CutResultStore::new());
    let config = GatewayConfig {
        base_url: String::new(),
        ..GatewayConfig::default()
    };
    let err = InferenceGateway::new(&config, Arc::clone(&store))
        .expect_err("empty base_url must fail");
    assert_eq!(err.kind, GatewayErrorKind::Configuration);

    let config = GatewayConfig {
        endpoint_path: "predict".to_string(),
        ..GatewayConfig::default()
    };
    let err = InferenceGateway::new(&config, store).expect_err("relative path must fail");
    assert_eq!(err.kind, GatewayErrorKind::Configuration);
}
