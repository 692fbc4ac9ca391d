use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::check::check;
use super::handlers::health::health;
use crate::domain::authz::engine::AuthorizationEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AuthorizationEngine>,
}

/// HTTP ext-authz surface. Every path except `GET /healthz` is a check.
pub fn create_router(engine: Arc<AuthorizationEngine>) -> Router {
    let state = AppState { engine };

    // Header values carry credentials and stay out of spans and events.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::debug!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/healthz", get(health).fallback(check))
        .fallback(check)
        .layer(trace_layer)
        .with_state(state)
}
