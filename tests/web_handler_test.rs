#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Signal evaluation from a posted price list
//! - Realtime signals over a mock market data port
//! - Model-output coercion
//! - Analysis history save, list and delete
//! - JSON errors for bad input and unknown routes

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use signaldesk::adapters::memory_repository::InMemoryAnalysisRepository;
use signaldesk::adapters::web::{AppState, build_router};
use signaldesk::domain::signal::SignalGenerator;
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

fn create_test_app() -> Router {
    let port = MockMarketDataPort::new()
        .with_closes("BTC/USDT", linear(100.0, 2.0, 30))
        .with_closes("EUR/USD", flat(1.08, 30))
        .with_error("ETH/USDT", "feed down");
    create_app_with(port)
}

fn create_app_with(port: MockMarketDataPort) -> Router {
    let state = AppState {
        generator: Arc::new(SignalGenerator::default()),
        market_data: Arc::new(port),
        repository: Arc::new(InMemoryAnalysisRepository::new()),
        history_limit: 2,
    };
    build_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

mod evaluate {
    use super::*;

    #[tokio::test]
    async fn falling_prices_below_band_is_buy() {
        let app = create_test_app();
        let prices = linear(100.0, -2.0, 30);
        let (status, body) = send(
            &app,
            post_json(
                "/api/signals/evaluate",
                json!({ "timeframe": "H1", "prices": prices, "currentPrice": 30.0 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signal"], "BUY");
        assert_eq!(body["confidence"], 80);
        assert_eq!(body["reasoning"], "RSI oversold. price below lower band");
        assert!(body["bollingerBands"]["lower"].is_number());
        assert_eq!(body["macd"]["histogram"], 0.0);
    }

    #[tokio::test]
    async fn current_price_defaults_to_last_close() {
        let app = create_test_app();
        let (status, body) = send(
            &app,
            post_json("/api/signals/evaluate", json!({ "prices": [5.0, 5.0, 5.0] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signal"], "HOLD");
        assert_eq!(body["reasoning"], "technical analysis neutral");
    }

    #[tokio::test]
    async fn empty_prices_is_bad_request() {
        let app = create_test_app();
        let (status, body) = send(
            &app,
            post_json("/api/signals/evaluate", json!({ "timeframe": "H1", "prices": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least one price"));
    }
}

mod realtime {
    use super::*;

    #[tokio::test]
    async fn failing_pair_is_skipped() {
        let app = create_test_app();
        let (status, body) = send(&app, get("/api/signals/realtime?timeframe=D1")).await;

        assert_eq!(status, StatusCode::OK);
        let signals = body["signals"].as_array().unwrap();
        let pairs: Vec<_> = signals.iter().map(|s| s["pair"].as_str().unwrap()).collect();
        assert_eq!(pairs, vec!["BTC/USDT", "EUR/USD"]);
        assert!(signals.iter().all(|s| s["timeframe"] == "D1"));
        assert_eq!(signals[1]["signal"], "HOLD");
    }

    #[tokio::test]
    async fn metadata_lists_indicators() {
        let app = create_test_app();
        let (_, body) = send(&app, get("/api/signals/realtime")).await;

        assert_eq!(body["metadata"]["source"], "csv");
        assert_eq!(
            body["metadata"]["indicators"],
            json!(["RSI(14)", "MACD(12,26,9)", "BOLLINGER(20,2)"])
        );
        assert_eq!(body["signals"][0]["timeframe"], "H1");
    }

    #[tokio::test]
    async fn no_pairs_is_empty_list() {
        let app = create_app_with(MockMarketDataPort::new());
        let (status, body) = send(&app, get("/api/signals/realtime")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signals"], json!([]));
    }
}

mod coerce {
    use super::*;

    fn post_text(uri: &str, text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(text.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn fenced_json_is_coerced() {
        let app = create_test_app();
        let text = "Here you go:\n```json\n{\"signal\":\"sell\",\"confidence\":140,\"entryPrice\":1.0845}\n```";
        let (status, body) = send(&app, post_text("/api/analysis/coerce?timeframe=M15", text)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signal"], "SELL");
        assert_eq!(body["confidence"], 100);
        assert_eq!(body["timeframe"], "M15");
        assert_eq!(body["aiGenerated"], true);
        assert_eq!(body["technicalIndicators"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn plain_text_becomes_hold() {
        let app = create_test_app();
        let (status, body) = send(&app, post_text("/api/analysis/coerce", "no idea")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signal"], "HOLD");
        assert_eq!(body["confidence"], 50);
        assert_eq!(body["analysis"], "no idea");
        assert_eq!(body["technicalIndicators"], json!([]));
    }
}

mod history {
    use super::*;

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn save_list_delete() {
        let app = create_test_app();
        let (status, saved) = send(
            &app,
            post_json(
                "/api/users/alice/analyses",
                json!({ "signal": "BUY", "confidence": 70, "pair": "EUR/USD" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(saved["userId"], "alice");
        assert_eq!(saved["pair"], "EUR/USD");
        let id = saved["id"].as_str().unwrap().to_string();

        let (status, listed) = send(&app, get("/api/users/alice/analyses")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], id.as_str());

        let (status, _) = send(&app, delete(&format!("/api/analyses/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, delete(&format!("/api/analyses/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().ends_with("not found"));
    }

    #[tokio::test]
    async fn list_uses_limit_and_newest_first() {
        let app = create_test_app();
        for pattern in ["one", "two", "three"] {
            let (status, _) = send(
                &app,
                post_json("/api/users/bob/analyses", json!({ "pattern": pattern })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, default_limit) = send(&app, get("/api/users/bob/analyses")).await;
        let patterns: Vec<_> = default_limit
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["pattern"].as_str().unwrap())
            .collect();
        assert_eq!(patterns, vec!["three", "two"]);

        let (_, explicit) = send(&app, get("/api/users/bob/analyses?limit=1")).await;
        assert_eq!(explicit.as_array().unwrap().len(), 1);

        let (_, other_user) = send(&app, get("/api/users/carol/analyses")).await;
        assert_eq!(other_user, json!([]));
    }

    #[tokio::test]
    async fn non_object_payload_is_bad_request() {
        let app = create_test_app();
        let (status, body) = send(&app, post_json("/api/users/alice/analyses", json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "analysis must be a JSON object");
    }
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}
