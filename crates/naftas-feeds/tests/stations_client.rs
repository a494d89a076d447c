//! Integration tests for `StationsClient` using wiremock HTTP mocks.

use naftas_core::{Coordinate, Zone};
use naftas_feeds::{build_http_client, FeedError, StationsClient};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> StationsClient {
    let client = build_http_client(5, "naftas-test/0.1").expect("client construction should not fail");
    StationsClient::new(client, &format!("{}/ws/rest/rest/server.php", server.uri()))
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[tokio::test]
async fn fetch_board_queries_every_fuel_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ws/rest/rest/server.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultado": [] })))
        .expect(21)
        .mount(&server)
        .await;

    let board = test_client(&server)
        .fetch_board(Zone::Este.anchor())
        .await
        .expect("should build board");

    assert!(board.is_empty());
}

#[tokio::test]
async fn fetch_board_sends_form_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("getEmpresasAgrupadasBanderasCombustible"))
        .and(body_string_contains(r#"["28","2","26","4"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultado": [] })))
        .expect(21)
        .mount(&server)
        .await;

    test_client(&server)
        .fetch_board(Coordinate::new(-34.6, -58.4))
        .await
        .expect("should build board");
}

#[tokio::test]
async fn fetch_board_merges_prices_for_a_station() {
    let server = MockServer::start().await;

    let station = json!({
        "idempresa": "100",
        "cuit": "30-1",
        "empresabandera": "YPF",
        "direccion": "AV. LIBERTADOR 1",
        "lat": "-34.58",
        "lon": "-58.43",
        "razonsocial": "YPF SA",
        "localidad": "CAPITAL FEDERAL",
        "precios": {
            "2": { "precio": 950, "fechavigencia": today() },
            "3": { "precio": 1200, "fechavigencia": today() }
        }
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultado": [station] })))
        .mount(&server)
        .await;

    let board = test_client(&server)
        .fetch_board(Zone::Este.anchor())
        .await
        .expect("should build board");

    assert_eq!(board.len(), 1);
    let ypf = &board[0];
    assert_eq!(ypf.nombre, "YPF");
    assert_eq!(ypf.precios.len(), 2);
    assert_eq!(ypf.precios[&2].nombre, "SUPER");
    assert_eq!(ypf.precios[&3].nombre, "INFINIA");
    assert!(ypf.distancia.unwrap() < 5.0);
}

#[tokio::test]
async fn one_failed_fuel_request_fails_the_board() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("name=\"combustible\"\r\n\r\n7\r\n"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultado": [] })))
        .with_priority(2)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_board(Zone::Este.anchor())
        .await
        .unwrap_err();

    assert!(
        matches!(err, FeedError::UnexpectedStatus { status: 500, .. }),
        "got {err:?}"
    );
}
