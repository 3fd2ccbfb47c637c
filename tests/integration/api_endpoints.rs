//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - `/sfp` polls on demand and refreshes the cache
//! - Snapshot endpoints serve the cache without touching the switches
//! - Authentication middleware rejects missing and wrong tokens

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rxwatch::{
    Reading, ReadingStatus,
    api::{ApiConfig, ApiState, HealthResponse, spawn_api_server},
};
use serde_json::Value;

use crate::helpers::*;

const TOKEN: &str = "test-token";

async fn spawn_test_api(connector: Arc<MockConnector>, hosts: &[&str]) -> SocketAddr {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = ApiState::new(poller(connector, notifier, hosts, -10.0));

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        auth_token: Some(TOKEN.to_string()),
        enable_cors: true,
    };

    spawn_api_server(config, state).await.unwrap()
}

async fn get(addr: SocketAddr, path: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(format!("http://{addr}{path}"))
        .header("Authorization", format!("Bearer {TOKEN}"))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_sfp_returns_fresh_readings() {
    let connector = Arc::new(MockConnector::new(&[("10.0.0.1", Behavior::Output(vec![TWO_PORTS]))]));
    let addr = spawn_test_api(connector.clone(), &["10.0.0.1"]).await;

    let response = get(addr, "/sfp").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let readings = body.as_array().unwrap();
    assert_eq!(readings.len(), 2);

    let low = &readings[1];
    assert_eq!(low["host"], "10.0.0.1");
    assert_eq!(low["interface"], 2);
    assert_eq!(low["rx_power"], -40.0);
    assert_eq!(low["status"], "LOW");
    assert!(low.get("comment").is_none());

    // YYYY/MM/DD HH:MM:SS
    let timestamp = low["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), 19);
    assert_eq!(&timestamp[4..5], "/");
    assert_eq!(&timestamp[10..11], " ");

    assert_eq!(connector.opened(), 1);
}

#[tokio::test]
async fn test_sfp_with_unreachable_switches_is_empty_array() {
    let connector = Arc::new(MockConnector::new(&[]));
    let addr = spawn_test_api(connector, &["down-1", "down-2"]).await;

    let response = get(addr, "/sfp").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "[]");
}

#[tokio::test]
async fn test_snapshot_serves_cache() {
    let connector = Arc::new(MockConnector::new(&[
        ("a", Behavior::Output(vec![TWO_PORTS])),
        ("b", Behavior::Output(vec!["Rx Power -3.00 dBm\n"])),
    ]));
    let addr = spawn_test_api(connector.clone(), &["a", "b"]).await;

    let before: Vec<Reading> = get(addr, "/api/v1/snapshot").await.json().await.unwrap();
    assert!(before.is_empty());

    get(addr, "/sfp").await;
    assert_eq!(connector.opened(), 2);

    let cached: Vec<Reading> = get(addr, "/api/v1/snapshot").await.json().await.unwrap();
    assert_eq!(cached.len(), 3);
    assert_eq!(connector.opened(), 2);

    let host_b: Vec<Reading> = get(addr, "/api/v1/snapshot/b").await.json().await.unwrap();
    assert_eq!(host_b.len(), 1);
    assert_eq!(host_b[0].rx_power, -3.0);
    assert_eq!(host_b[0].status, ReadingStatus::Ok);
}

#[tokio::test]
async fn test_unknown_host_is_not_found() {
    let connector = Arc::new(MockConnector::new(&[]));
    let addr = spawn_test_api(connector, &["a"]).await;

    let response = get(addr, "/api/v1/snapshot/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_health_reports_cache_state() {
    let connector = Arc::new(MockConnector::new(&[("a", Behavior::Output(vec![TWO_PORTS]))]));
    let addr = spawn_test_api(connector, &["a"]).await;

    let health: HealthResponse = get(addr, "/api/v1/health").await.json().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.cycle, 0);
    assert!(health.last_poll.is_none());

    get(addr, "/sfp").await;

    let health: HealthResponse = get(addr, "/api/v1/health").await.json().await.unwrap();
    assert_eq!(health.cycle, 1);
    assert_eq!(health.readings, 2);
    assert_eq!(health.low, 1);
    assert!(health.last_poll.is_some());
}

#[tokio::test]
async fn test_auth_missing_token() {
    let connector = Arc::new(MockConnector::new(&[]));
    let addr = spawn_test_api(connector.clone(), &["a"]).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/sfp"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(connector.opened(), 0);
}

#[tokio::test]
async fn test_auth_wrong_token() {
    let connector = Arc::new(MockConnector::new(&[]));
    let addr = spawn_test_api(connector, &["a"]).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/api/v1/snapshot"))
        .header("Authorization", "Bearer wrong-token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cors_preflight_skips_auth() {
    let connector = Arc::new(MockConnector::new(&[]));
    let addr = spawn_test_api(connector, &["a"]).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/api/v1/snapshot"))
        .header("Origin", "http://dashboard.local")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-origin"));
}
