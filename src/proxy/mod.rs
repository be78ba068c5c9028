//! Core HTTP request forwarding handler.
//!
//! The [`forward_handler`] function is the Axum fallback that receives
//! every non-`/health` request, validates its `date` query parameter,
//! matches it against the configured date-range table, and relays the
//! request to the selected backend. Submodules handle table matching
//! ([`routing`]), header construction ([`headers`]), and the outbound
//! call ([`forward`]).

pub mod forward;
pub mod headers;
pub mod routing;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;
use tower_http::timeout::TimeoutBody;

use crate::server::AppState;

const MISSING_DATE: &str = "Missing 'date' query parameter";
const INVALID_DATE: &str = "Invalid date format. Expected YYYYMMDD";
const NO_BACKEND: &str = "No backend configured for the requested date";
const UPSTREAM_FAILED: &str = "Upstream request failed";

/// First `date` parameter in the raw query string, if any.
fn date_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "date")
        .map(|(_, value)| value.into_owned())
}

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();

    let correlation_id = parts
        .headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let date_value = match date_param(parts.uri.query()) {
        Some(value) if !value.is_empty() => value,
        _ => {
            tracing::debug!(
                correlation_id = %correlation_id,
                path = %parts.uri.path(),
                "date parameter missing"
            );
            return (StatusCode::BAD_REQUEST, MISSING_DATE).into_response();
        }
    };

    let Some(date) = routing::parse_request_date(&date_value) else {
        tracing::debug!(
            correlation_id = %correlation_id,
            date = %date_value,
            "date parameter malformed"
        );
        return (StatusCode::BAD_REQUEST, INVALID_DATE).into_response();
    };

    let Some(target) = state.table.match_date(date) else {
        tracing::warn!(
            correlation_id = %correlation_id,
            date = %date_value,
            path = %parts.uri.path(),
            "no date range matched"
        );
        return (StatusCode::NOT_FOUND, NO_BACKEND).into_response();
    };

    let client_ip = headers::resolve_client_ip(&parts.headers, addr);

    tracing::info!(
        correlation_id = %correlation_id,
        method = %parts.method,
        path = %parts.uri.path(),
        date = %date_value,
        target = %target,
        "request received"
    );

    // Inbound read timeout: each body frame must arrive within the
    // configured window while it streams to the backend.
    let body = Body::new(TimeoutBody::new(state.read_timeout, body));

    let start = Instant::now();
    let result = forward::forward(forward::ForwardRequest {
        client: &state.http_client,
        target,
        method: parts.method.clone(),
        uri: &parts.uri,
        headers: &parts.headers,
        body,
        client_ip: &client_ip,
        correlation_id: &correlation_id,
        timeout: state.forward_timeout,
    })
    .await;

    #[allow(clippy::cast_possible_truncation)]
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(response) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                target = %target,
                status = response.status().as_u16(),
                latency_ms,
                "backend responded"
            );
            relay_response(response, &correlation_id)
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                correlation_id = %correlation_id,
                target = %target,
                latency_ms,
                error = %e,
                "forwarding failed"
            );
            (StatusCode::BAD_GATEWAY, UPSTREAM_FAILED).into_response()
        }
    }
}

/// Relay the backend response: status and headers verbatim (hop-by-hop
/// stripped, multi-value order preserved), body streamed as it arrives.
fn relay_response(response: hyper::Response<hyper::body::Incoming>, correlation_id: &str) -> Response {
    let (mut parts, body) = response.into_parts();

    headers::strip_response_hop_by_hop(&mut parts.headers);
    if let Ok(val) = correlation_id.parse() {
        parts.headers.insert("x-correlation-id", val);
    }

    // Relay failures after the status line are best-effort: log and let
    // the connection terminate.
    let cid = correlation_id.to_string();
    let body = Body::new(body.map_err(move |e| {
        tracing::warn!(correlation_id = %cid, error = %e, "response body relay failed");
        e
    }));

    Response::from_parts(parts, body)
}
