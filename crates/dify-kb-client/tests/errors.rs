//! Error mapping for failed and malformed responses.

mod common;

use std::time::{Duration, Instant};

use common::{client_for, API_KEY};
use dify_kb_client::{ClientConfig, DifyKbClient, Error};
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_api_error_carries_server_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "dataset_not_found",
            "message": "Dataset not found.",
            "status": 404
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .datasets()
        .get("missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    match err {
        Error::Api { code, message, .. } => {
            assert_eq!(code.as_deref(), Some("dataset_not_found"));
            assert_eq!(message, "Dataset not found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_with_plain_body_keeps_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/datasets/ds-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .datasets()
        .delete("ds-1")
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert!(err.is_retryable());
    match err {
        Error::Api { code, message, .. } => {
            assert!(code.is_none());
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "unauthorized",
            "message": "Access token is invalid",
            "status": 401
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).datasets().list(1, 20).await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_unexpected_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets/ds-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = client_for(&server).datasets().get("ds-1").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 9 locally.
    let client = DifyKbClient::new("http://127.0.0.1:9/v1", "key").unwrap();
    let err = client.datasets().list(1, 20).await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_blank_path_id_is_rejected() {
    let client = DifyKbClient::new("http://127.0.0.1:9/v1", "key").unwrap();
    let err = client.documents().delete("ds-1", "").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation {
            field: "document_id",
            ..
        }
    ));
}

#[tokio::test]
async fn test_dot_segment_id_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).datasets().delete("..").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation {
            field: "dataset_id",
            ..
        }
    ));
}

#[tokio::test]
async fn test_path_ids_are_encoded_as_single_segments() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/datasets/x%2F..%2F..%2Fother"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/datasets/ds-1/documents/doc%3Fforce=1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/datasets/ds-1/documents/doc-1/segments/seg%23frag"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.datasets().delete("x/../../other").await.unwrap();
    client.documents().delete("ds-1", "doc?force=1").await.unwrap();
    client
        .segments()
        .delete("ds-1", "doc-1", "seg#frag")
        .await
        .unwrap();

    for request in server.received_requests().await.unwrap() {
        assert!(request.url.query().is_none());
        assert!(request.url.path().starts_with("/v1/datasets/"));
    }
}

#[tokio::test]
async fn test_slow_response_hits_read_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets/ds-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::dataset_json("ds-1", "slow"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        read_timeout_ms: 200,
        write_timeout_ms: 100,
        ..ClientConfig::new(format!("{}/v1", server.uri()), API_KEY)
    };
    let client = DifyKbClient::from_config(&config).unwrap();

    let started = Instant::now();
    let err = client.datasets().get("ds-1").await.unwrap_err();
    let waited = started.elapsed();

    assert!(err.is_transport());
    assert!(err.is_retryable());
    assert!(waited < Duration::from_secs(2), "waited {:?}", waited);
}

#[tokio::test]
async fn test_fast_response_within_timeouts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/datasets/ds-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::dataset_json("ds-1", "quick"))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        read_timeout_ms: 2_000,
        ..ClientConfig::new(format!("{}/v1", server.uri()), API_KEY)
    };
    let client = DifyKbClient::from_config(&config).unwrap();
    let dataset = client.datasets().get("ds-1").await.unwrap();
    assert_eq!(dataset.name, "quick");
}
