//! HttpSource against a mocked prediction backend

use std::time::Duration;

use salesboard::services::{Aggregator, BusinessMetrics, ComparisonService};
use salesboard::sources::{ForecastSource, HistorySource, HttpSource, MetricsSource};
use salesboard::types::{Bucket, FetchError, Granularity, LeaderboardEntry};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body(product: &str, values: &[f64]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            json!({
                "product_code": product,
                "forecast_date": format!("2026-01-{:02}T00:00:00", 4 + i * 7),
                "predicted_sales": v,
            })
        })
        .collect();
    serde_json::Value::Array(rows)
}

async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> HttpSource {
    HttpSource::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_history_parses_and_orders() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/sales/history/P12",
        200,
        json!([
            { "product_code": "P12", "ds": "2025-01-14T00:00:00", "y": 4.0 },
            { "product_code": "P12", "ds": "2025-01-07T00:00:00", "y": 3.0 },
            { "product_code": "P12", "ds": "2025-02-04T00:00:00", "y": 4.0 },
        ]),
    )
    .await;

    let history = client(&server).fetch_history("P12").await.unwrap();

    let dates: Vec<String> = history.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, vec!["2025-01-07", "2025-01-14", "2025-02-04"]);
    assert_eq!(
        Aggregator::aggregate(&history, Granularity::Monthly),
        vec![Bucket::new("2025-01", 7.0, 2), Bucket::new("2025-02", 4.0, 1)]
    );
    assert_eq!(BusinessMetrics::growth_rate(&history), 33.3);
}

#[tokio::test]
async fn test_fetch_forecast_parses_values() {
    let server = MockServer::start().await;
    mount_json(&server, "/sales/forecast/P12", 200, forecast_body("P12", &[2.52, 1.01])).await;

    let forecast = client(&server).fetch_forecast("P12").await.unwrap();

    assert_eq!(forecast.len(), 2);
    assert_eq!(forecast[0].date.to_string(), "2026-01-04");
    assert_eq!(forecast[1].date.to_string(), "2026-01-11");
    assert_eq!(forecast[1].forecast_value, 1.01);
}

#[tokio::test]
async fn test_not_found_is_distinguishable() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/sales/forecast/P404",
        404,
        json!({ "detail": "Forecasts not found for this product" }),
    )
    .await;

    let err = client(&server).fetch_forecast("P404").await.unwrap_err();

    assert_eq!(err, FetchError::NotFound { status: 404 });
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let server = MockServer::start().await;
    mount_json(&server, "/sales/history/P1", 503, json!({ "detail": "down" })).await;

    let err = client(&server).fetch_history("P1").await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_malformed_payload() {
    let server = MockServer::start().await;
    mount_json(&server, "/sales/forecast/P1", 200, json!({ "unexpected": true })).await;
    mount_json(
        &server,
        "/sales/forecast/P2",
        200,
        json!([{ "product_code": "P2", "forecast_date": "soon", "predicted_sales": 1.0 }]),
    )
    .await;

    let source = client(&server);

    assert!(matches!(
        source.fetch_forecast("P1").await,
        Err(FetchError::Payload(_))
    ));
    assert!(matches!(
        source.fetch_forecast("P2").await,
        Err(FetchError::Payload(_))
    ));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sales/forecast/P1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body("P1", &[1.0]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let source = HttpSource::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = source.fetch_forecast("P1").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let source = HttpSource::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = source.fetch_history("P12").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_fetch_model_metrics() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/metrics/model",
        200,
        json!({
            "model_version": "Hybrid-Prophet-LGBM-v1",
            "wmape": null,
            "accuracy": 84.89,
            "last_trained": "2025-12-16T17:08:22",
        }),
    )
    .await;

    let metrics = client(&server).fetch_model_metrics().await.unwrap();

    assert_eq!(metrics.model_version, "Hybrid-Prophet-LGBM-v1");
    assert_eq!(metrics.wmape, None);
    assert_eq!(metrics.accuracy, Some(84.89));
    assert_eq!(metrics.last_trained.to_string(), "2025-12-16 17:08:22");
}

#[tokio::test]
async fn test_compare_against_backend_with_partial_failure() {
    let server = MockServer::start().await;
    mount_json(&server, "/sales/forecast/P1", 200, forecast_body("P1", &[20.0, 30.0])).await;
    mount_json(&server, "/sales/forecast/P2", 404, json!({ "detail": "not found" })).await;
    mount_json(&server, "/sales/forecast/P3", 200, forecast_body("P3", &[50.0, 30.0])).await;

    let ids: Vec<String> = ["P1", "P2", "P3"].iter().map(|s| s.to_string()).collect();
    let report = ComparisonService::new(3)
        .compare(&ids, &client(&server))
        .await
        .unwrap();

    assert_eq!(
        report.leaderboard,
        vec![
            LeaderboardEntry {
                rank: 1,
                entity_id: "P3".into(),
                potential_total: 80.0,
            },
            LeaderboardEntry {
                rank: 2,
                entity_id: "P1".into(),
                potential_total: 50.0,
            },
        ]
    );
    assert_eq!(report.failed_ids(), vec!["P2"]);
    assert_eq!(report.failures[0].status, Some(404));
}
