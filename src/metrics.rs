use std::sync::Arc;

use actix_web::http::Method;
use actix_web::HttpResponse;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::router::{handler, Router};

// ============================================================================
// Metrics Module - Prometheus Metrics for Observability
// ============================================================================
//
// Counters for the HTTP surface, record commits and hook chain triggers.
// Exposed via /metrics (text encoding) on the same route table as the rest
// of the application.
//
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounterVec,
    pub records_created_total: IntCounterVec,
    pub hook_triggers_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["method"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let records_created_total = IntCounterVec::new(
            Opts::new("records_created_total", "Total records committed"),
            &["collection"],
        )?;
        registry.register(Box::new(records_created_total.clone()))?;

        let hook_triggers_total = IntCounterVec::new(
            Opts::new("hook_triggers_total", "Total hook chain triggers"),
            &["hook", "target"],
        )?;
        registry.register(Box::new(hook_triggers_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            records_created_total,
            hook_triggers_total,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_http_request(&self, method: &str) {
        self.http_requests_total.with_label_values(&[method]).inc();
    }

    pub fn record_created(&self, collection: &str) {
        self.records_created_total
            .with_label_values(&[collection])
            .inc();
    }

    pub fn record_hook_trigger(&self, hook: &str, target: &str) {
        self.hook_triggers_total
            .with_label_values(&[hook, target])
            .inc();
    }
}

/// Expose /metrics and /health unless another component already claimed
/// those routes.
pub fn register_routes(router: &mut Router, metrics: Arc<Metrics>) {
    if !router.has_route(&Method::GET, "/metrics") {
        let metrics = metrics.clone();
        router.get(
            "/metrics",
            handler(move |_req| {
                let metrics = metrics.clone();
                async move { render(&metrics) }
            }),
        );
    }

    if !router.has_route(&Method::GET, "/health") {
        router.get(
            "/health",
            handler(|_req| async {
                HttpResponse::Ok().json(serde_json::json!({
                    "status": "healthy",
                    "service": "shopbase"
                }))
            }),
        );
    }
}

fn render(metrics: &Metrics) -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metrics.registry().gather(), &mut buffer) {
        tracing::error!(error = %err, "failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
