//! Middleware for the file-serving route.
//!
//! `log_request` emits one line per request with the remote host, method and
//! path before handing the request on. Each request also gets a `request` span
//! with a UUID v4 so anything logged further down can be correlated.
//!
//! `cors_layer` stamps `Access-Control-Allow-Origin: *` on every response.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::Instrument;
use uuid::Uuid;

/// Request logging middleware.
pub async fn log_request(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let remote_host = remote_host(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        duration_ms = tracing::field::Empty,
    );

    // Logged before the file responder runs
    tracing::info!(parent: &span, "{} {} {}", remote_host, method, path);

    let start = Instant::now();
    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::debug!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Remote IP of the peer, without the port. `-` when the connection info is
/// unavailable (e.g. requests driven directly through the router).
fn remote_host(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Layer adding the permissive CORS header to every response.
pub fn cors_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))
}
