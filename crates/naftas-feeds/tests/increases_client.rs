//! Integration tests for `IncreasesClient` using wiremock HTTP mocks.

use naftas_feeds::{build_http_client, FeedError, IncreasesClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> IncreasesClient {
    let client = build_http_client(5, "naftas-test/0.1").expect("client construction should not fail");
    IncreasesClient::new(client, &format!("{}/run", server.uri()))
}

#[tokio::test]
async fn fetch_returns_body_unchanged() {
    let server = MockServer::start().await;
    let body = json!({ "aumentos": [{ "fecha": "2024-03-01", "porcentaje": 4.5 }] });

    Mock::given(method("GET"))
        .and(path("/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let value = test_client(&server).fetch().await.expect("should fetch");
    assert_eq!(value, body);
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch().await.unwrap_err();
    assert!(
        matches!(err, FeedError::UnexpectedStatus { status: 502, .. }),
        "got {err:?}"
    );
}
