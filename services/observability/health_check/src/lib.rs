//! # Bandwatch Health Check
//!
//! Embedded HTTP endpoint exposing the state of a polling service:
//! - `/health` - Basic liveness check (503 when the loop has stalled)
//! - `/ready` - Ready once the first full pass has completed
//! - `/metrics` - Pass counters and pass latency
//! - `/status` - Full snapshot including per-symbol details
//!
//! The service owns a [`SharedHealth`] handle and pushes updates after every
//! pass; request handling only reads it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use health_check::{HealthCheckServer, ServiceHealth};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let server = HealthCheckServer::new(ServiceHealth::new("band_signals"), 8080);
//! let health = server.shared();
//! tokio::spawn(async move { server.start().await });
//!
//! health.lock().await.add_detail("XAU/USD", "wait");
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Handle shared between the service loop and the HTTP server
pub type SharedHealth = Arc<tokio::sync::Mutex<ServiceHealth>>;

/// Service health status levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    /// Last pass completed without per-symbol errors
    Healthy,
    /// No pass completed yet
    Starting,
    /// Last pass completed but some symbols failed
    Degraded,
    /// No pass completed within the staleness window
    Unhealthy,
}

/// Poll loop counters reported on `/metrics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub passes_completed: u64,
    pub symbols_processed: u64,
    pub signals_generated: u64,
    pub notifications_sent: u64,
    pub errors: u64,
    /// Per-symbol failures in the most recent pass
    pub last_pass_errors: u64,
    pub last_pass_ms: f64,
    pub avg_pass_ms: f64,
    pub p99_pass_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub service_name: String,
    pub status: HealthStatus,
    pub startup_time: SystemTime,
    /// Time of the most recent metrics push
    pub last_update: Option<SystemTime>,
    /// Liveness fails when no update arrives within this window
    pub stale_after: Option<Duration>,
    pub metrics: PerformanceMetrics,
    /// Service-specific key/value details, e.g. last direction per symbol
    pub details: BTreeMap<String, String>,
    /// Most recent error messages, oldest first
    pub errors: Vec<String>,
}

const MAX_ERRORS: usize = 10;

impl ServiceHealth {
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            status: HealthStatus::Starting,
            startup_time: SystemTime::now(),
            last_update: None,
            stale_after: None,
            metrics: PerformanceMetrics::default(),
            details: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn set_stale_after(&mut self, window: Duration) {
        self.stale_after = Some(window);
    }

    /// Replace metrics and recompute status
    pub fn update_metrics(&mut self, metrics: PerformanceMetrics) {
        self.metrics = metrics;
        self.last_update = Some(SystemTime::now());
        self.refresh_status(SystemTime::now());
    }

    pub fn add_detail(&mut self, key: &str, value: &str) {
        self.details.insert(key.to_string(), value.to_string());
    }

    pub fn add_error(&mut self, error: &str) {
        self.errors.push(error.to_string());
        if self.errors.len() > MAX_ERRORS {
            self.errors.remove(0);
        }
    }

    /// Derive the status from the metrics and the age of the last update
    pub fn refresh_status(&mut self, now: SystemTime) {
        let stalled = match (self.stale_after, self.last_update) {
            (Some(window), Some(last)) => now.duration_since(last).unwrap_or_default() > window,
            (Some(window), None) => {
                now.duration_since(self.startup_time).unwrap_or_default() > window
            }
            (None, _) => false,
        };

        self.status = if stalled {
            HealthStatus::Unhealthy
        } else if self.metrics.passes_completed == 0 {
            HealthStatus::Starting
        } else if self.metrics.last_pass_errors > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
    }

    /// Ready once a pass has completed, even with per-symbol failures
    pub fn is_ready(&self) -> bool {
        matches!(self.status, HealthStatus::Healthy | HealthStatus::Degraded)
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.status, HealthStatus::Unhealthy)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.startup_time.elapsed().unwrap_or_default().as_secs()
    }
}

/// HTTP health check server
pub struct HealthCheckServer {
    health: SharedHealth,
    port: u16,
}

impl HealthCheckServer {
    pub fn new(health: ServiceHealth, port: u16) -> Self {
        Self {
            health: Arc::new(tokio::sync::Mutex::new(health)),
            port,
        }
    }

    /// Handle the service uses to push updates
    pub fn shared(&self) -> SharedHealth {
        Arc::clone(&self.health)
    }

    /// Serve until the task is dropped
    pub async fn start(&self) -> Result<()> {
        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        let health = Arc::clone(&self.health);

        let make_svc = make_service_fn(move |_conn| {
            let health = Arc::clone(&health);
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let health = Arc::clone(&health);
                    handle_request(req, health)
                }))
            }
        });

        let server = Server::try_bind(&addr)
            .with_context(|| format!("Failed to bind health endpoint on {}", addr))?
            .serve(make_svc);

        info!("Health check server listening on http://{}", addr);
        info!("Endpoints: /health, /ready, /metrics, /status");

        server.await.context("Health check server error")
    }
}

/// Route one request against the current health snapshot
pub async fn handle_request(
    req: Request<Body>,
    health: SharedHealth,
) -> Result<Response<Body>, Infallible> {
    let path = req.uri().path();
    let method = req.method();

    debug!("Health check request: {} {}", method, path);

    if method != Method::GET {
        return Ok(text_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
        ));
    }

    let snapshot = {
        let mut guard = health.lock().await;
        guard.refresh_status(SystemTime::now());
        guard.clone()
    };

    let response = match path {
        "/health" => health_endpoint(&snapshot),
        "/ready" => ready_endpoint(&snapshot),
        "/metrics" => json_response(StatusCode::OK, serde_json::json!(snapshot.metrics)),
        "/status" => json_response(StatusCode::OK, serde_json::json!(snapshot)),
        _ => text_response(StatusCode::NOT_FOUND, "Not found"),
    };
    Ok(response)
}

fn health_endpoint(health: &ServiceHealth) -> Response<Body> {
    if health.is_alive() {
        json_response(
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "service": health.service_name,
                "uptime_seconds": health.uptime_seconds()
            }),
        )
    } else {
        json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "unhealthy",
                "service": health.service_name,
                "errors": health.errors
            }),
        )
    }
}

fn ready_endpoint(health: &ServiceHealth) -> Response<Body> {
    if health.is_ready() {
        json_response(
            StatusCode::OK,
            serde_json::json!({
                "status": "ready",
                "service": health.service_name
            }),
        )
    } else {
        json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "not ready",
                "service": health.service_name,
                "current_status": health.status
            }),
        )
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
}

/// Rolling pass-duration statistics
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    samples: Vec<f64>,
    max_samples: usize,
}

impl LatencyTracker {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    pub fn record(&mut self, duration: Duration) {
        if self.samples.len() >= self.max_samples {
            self.samples.remove(0);
        }
        self.samples.push(duration.as_secs_f64() * 1000.0);
    }

    pub fn last_ms(&self) -> f64 {
        self.samples.last().copied().unwrap_or(0.0)
    }

    pub fn average_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn p99_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let index = ((sorted.len() as f64 * 0.99) as usize).min(sorted.len() - 1);
        sorted[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get(health: &SharedHealth, path: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = handle_request(req, Arc::clone(health)).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    fn shared(health: ServiceHealth) -> SharedHealth {
        Arc::new(tokio::sync::Mutex::new(health))
    }

    fn completed_pass(errors: u64) -> PerformanceMetrics {
        PerformanceMetrics {
            passes_completed: 1,
            symbols_processed: 3,
            last_pass_errors: errors,
            errors,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_transitions() {
        let mut health = ServiceHealth::new("band_signals");
        assert_eq!(health.status, HealthStatus::Starting);
        assert!(health.is_alive());
        assert!(!health.is_ready());

        health.update_metrics(completed_pass(0));
        assert_eq!(health.status, HealthStatus::Healthy);
        assert!(health.is_ready());

        health.update_metrics(completed_pass(1));
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(health.is_ready());
    }

    #[test]
    fn test_stalled_loop_is_unhealthy() {
        let mut health = ServiceHealth::new("band_signals");
        health.set_stale_after(Duration::from_secs(60));
        health.update_metrics(completed_pass(0));

        let later = SystemTime::now() + Duration::from_secs(120);
        health.refresh_status(later);
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_error_log_is_bounded() {
        let mut health = ServiceHealth::new("band_signals");
        for i in 0..15 {
            health.add_error(&format!("error {}", i));
        }
        assert_eq!(health.errors.len(), MAX_ERRORS);
        assert_eq!(health.errors[0], "error 5");
    }

    #[tokio::test]
    async fn test_ready_endpoint_waits_for_first_pass() {
        let health = shared(ServiceHealth::new("band_signals"));

        let (status, body) = get(&health, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not ready");

        health.lock().await.update_metrics(completed_pass(0));
        let (status, body) = get(&health, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_health_and_status_endpoints() {
        let health = shared(ServiceHealth::new("band_signals"));
        {
            let mut guard = health.lock().await;
            guard.update_metrics(completed_pass(0));
            guard.add_detail("XAU/USD", "buy");
        }

        let (status, body) = get(&health, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "band_signals");

        let (status, body) = get(&health, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["details"]["XAU/USD"], "buy");
        assert_eq!(body["status"], "Healthy");

        let (status, body) = get(&health, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["passes_completed"], 1);
    }

    #[tokio::test]
    async fn test_unknown_path_and_method() {
        let health = shared(ServiceHealth::new("band_signals"));

        let (status, _) = get(&health, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = handle_request(req, health).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_latency_tracker() {
        let mut tracker = LatencyTracker::new(3);
        assert_eq!(tracker.average_ms(), 0.0);

        for ms in [10, 20, 30, 40] {
            tracker.record(Duration::from_millis(ms));
        }
        assert_eq!(tracker.last_ms(), 40.0);
        assert!((tracker.average_ms() - 30.0).abs() < 1e-9);
        assert_eq!(tracker.p99_ms(), 40.0);
    }
}
