//! Integration tests for the web API.
//!
//! These tests verify the HTTP endpoints through the axum router.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use rs_irrigation::hal::{MockBoard, MockStorage};
use rs_irrigation::services::{build_router, AppState, SharedController, WebServerConfig};
use rs_irrigation::{Config, IrrigationController, SystemMode};

fn create_test_app(raw: u16) -> (axum::Router, AppState<MockBoard, MockStorage>) {
    let mut hw = MockBoard::hardware();
    hw.sensor.raw = raw;
    let controller = IrrigationController::new(hw, MockStorage::new(), &Config::default());
    let state = Arc::new(SharedController::new(controller));
    let router = build_router(Arc::clone(&state), &WebServerConfig::default());
    (router, state)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn test_status_manual_mode() {
    let (app, state) = create_test_app(600);

    let (status, content_type, body) = get(&app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("application/json"));

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["moisture"], 14);
    assert_eq!(json["threshold"], 40);
    assert_eq!(json["status"], "Irrigating (Manual)");

    // Critical moisture sounds the buzzer on a status request
    state.with_controller(|c| {
        assert!(c.hardware().buzzer.level);
    });
}

#[tokio::test]
async fn test_status_exact_body() {
    let (app, _state) = create_test_app(4095);

    let (_, _, body) = get(&app, "/status").await;

    assert_eq!(
        body,
        r#"{"moisture":100,"threshold":40,"status":"Idle (Manual)"}"#
    );
}

#[tokio::test]
async fn test_status_in_wifi_mode_drives_relay() {
    let (app, state) = create_test_app(0);

    let (_, _, body) = get(&app, "/toggle-mode").await;
    assert_eq!(body, "Mode toggled");

    let (_, _, body) = get(&app, "/status").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "Irrigating (WiFi)");

    state.with_controller(|c| {
        assert_eq!(c.mode(), SystemMode::Wifi);
        assert!(c.hardware().relay.level);
    });

    // Soil is now wet: the next poll switches the pump off
    state.with_controller(|c| c.hardware_mut().sensor.raw = 4095);
    let (_, _, body) = get(&app, "/status").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "Idle (WiFi)");
    state.with_controller(|c| assert!(!c.hardware().relay.level));
}

// ============================================================================
// Threshold
// ============================================================================

#[tokio::test]
async fn test_threshold_increase_and_decrease() {
    let (app, state) = create_test_app(2048);

    let (status, content_type, body) = get(&app, "/threshold?action=increase").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, "Threshold updated");
    assert_eq!(state.with_controller(|c| c.threshold().percent()), 41);

    get(&app, "/threshold?action=decrease").await;
    get(&app, "/threshold?action=decrease").await;
    assert_eq!(state.with_controller(|c| c.threshold().percent()), 39);
}

#[tokio::test]
async fn test_threshold_set_value_clamped() {
    let (app, state) = create_test_app(2048);

    get(&app, "/threshold?value=55").await;
    assert_eq!(state.with_controller(|c| c.threshold().percent()), 55);

    get(&app, "/threshold?value=150").await;
    assert_eq!(state.with_controller(|c| c.threshold().percent()), 100);

    get(&app, "/threshold?value=-5").await;
    assert_eq!(state.with_controller(|c| c.threshold().percent()), 0);

    // Non-numeric converts to 0
    get(&app, "/threshold?value=50").await;
    get(&app, "/threshold?value=abc").await;
    assert_eq!(state.with_controller(|c| c.threshold().percent()), 0);
}

#[tokio::test]
async fn test_threshold_change_is_persisted() {
    let (app, state) = create_test_app(2048);

    get(&app, "/threshold?value=65").await;

    state.with_controller(|c| {
        let storage = c.state().threshold_store().storage();
        assert_eq!(storage.stored(), Some(65));
        assert_eq!(storage.save_count(), 1);
    });
}

#[tokio::test]
async fn test_threshold_without_params_is_noop() {
    let (app, state) = create_test_app(2048);

    let (status, _, body) = get(&app, "/threshold").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Threshold updated");

    let (_, _, body) = get(&app, "/threshold?action=sideways").await;
    assert_eq!(body, "Threshold updated");

    state.with_controller(|c| {
        assert_eq!(c.threshold().percent(), 40);
        assert_eq!(c.state().threshold_store().storage().save_count(), 0);
    });
}

// ============================================================================
// Mode
// ============================================================================

#[tokio::test]
async fn test_toggle_mode_twice_returns_to_manual() {
    let (app, state) = create_test_app(2048);

    get(&app, "/toggle-mode").await;
    assert_eq!(state.with_controller(|c| c.mode()), SystemMode::Wifi);

    get(&app, "/toggle-mode").await;
    assert_eq!(state.with_controller(|c| c.mode()), SystemMode::Manual);
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_index_serves_html() {
    let (app, _state) = create_test_app(2048);

    let (status, content_type, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains("/status"));
    assert!(body.contains("/toggle-mode"));
}

#[tokio::test]
async fn test_index_html_path_serves_same_page() {
    let (app, _state) = create_test_app(2048);

    let (_, _, root) = get(&app, "/").await;
    let (status, content_type, body) = get(&app, "/index.html").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert_eq!(body, root);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _state) = create_test_app(2048);

    let (status, _, body) = get(&app, "/api/state").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not found");
}
