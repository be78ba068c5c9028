//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the immutable
//! date-range table, HTTP client, stats, and uptime),
//! [`build_router`] for constructing the Axum router with middleware
//! layers, [`build_http_client`] for the connection-pooled hyper
//! client, and [`shutdown_signal`] for SIGTERM / Ctrl+C handling.
//!
//! The table is built once before the server starts and never mutated;
//! request tasks read it through the shared `Arc` with no locking. The
//! client's connection pool is its own synchronization domain.

use std::sync::atomic::AtomicU64;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::routing::any;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::health::health_handler;
use crate::proxy;
use crate::proxy::routing::DateRangeTable;

#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub failed: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Outbound client. The body type is `axum::body::Body` so inbound
/// request bodies stream straight through without buffering.
pub type HttpClient = Client<HttpsConnector, Body>;

pub struct AppState {
    pub table: DateRangeTable,
    pub http_client: HttpClient,
    pub forward_timeout: Duration,
    pub read_timeout: Duration,
    pub start_time: Instant,
    pub stats: Stats,
}

#[must_use]
pub fn build_http_client(pool_idle_timeout: Duration) -> HttpClient {
    // When multiple rustls crypto providers are compiled in (e.g. `--all-features`
    // enables both `ring` and `aws-lc-rs`), rustls cannot auto-detect which one
    // to use. Explicitly install `ring` as the default provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(pool_idle_timeout)
        .build(https)
}

/// Assemble the router: `/health` answers any method directly, every
/// other path goes through the forwarding handler. `write_timeout`
/// bounds how long a request may take to produce its response; body
/// read pacing is enforced per-frame inside the forwarding handler.
pub fn build_router(state: Arc<AppState>, write_timeout: Duration) -> Router {
    Router::new()
        .route("/health", any(health_handler))
        .fallback(proxy::forward_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(write_timeout)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
