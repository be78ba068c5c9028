//! `timegate run` — start the proxy server.
//!
//! Loads configuration once, builds the immutable date-range table,
//! and starts the Axum HTTP server with graceful shutdown. There is no
//! hot reload: the table lives unchanged for the process lifetime, so
//! request tasks share it without locks.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::RunArgs;
use crate::config::sources;
use crate::config::ConfigSource;
use crate::error::TimegateError;
use crate::logging;
use crate::proxy::routing::DateRangeTable;
use crate::server::{self, AppState, Stats};

pub async fn execute(args: RunArgs) -> Result<(), TimegateError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let source = resolve_file_source(args.config.as_deref()).await?;
    let (mut config, version) = source.load().await?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.forward_timeout_ms = timeout;
    }

    let table = DateRangeTable::from_config(&config)?;

    let state = Arc::new(AppState {
        table,
        http_client: server::build_http_client(Duration::from_millis(config.idle_timeout_ms)),
        forward_timeout: Duration::from_millis(config.forward_timeout_ms),
        read_timeout: Duration::from_millis(config.read_timeout_ms),
        start_time: Instant::now(),
        stats: Stats::new(),
    });

    let router = server::build_router(
        Arc::clone(&state),
        Duration::from_millis(config.write_timeout_ms),
    );

    let addr: SocketAddr = format!("{}:{}", args.host, config.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        ranges = state.table.len(),
        config_source = source.name(),
        config_version = version.short(),
        forward_timeout_ms = config.forward_timeout_ms,
        "timegate started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!(
        forwarded = state.stats.forwarded.load(Ordering::Relaxed),
        failed = state.stats.failed.load(Ordering::Relaxed),
        uptime_s = state.start_time.elapsed().as_secs(),
        "timegate stopped"
    );
    Ok(())
}

async fn resolve_file_source(
    explicit: Option<&std::path::Path>,
) -> Result<Box<dyn ConfigSource>, TimegateError> {
    if let Some(path) = explicit {
        return create_file_source(path);
    }

    // Auto-detect in current directory
    let candidates = [
        "timegate.yaml",
        "timegate.yml",
        "timegate.json",
        "timegate.toml",
    ];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return create_file_source(&path);
        }
    }

    Err(TimegateError::NoConfigSource {
        hint: "Provide --config <file> or create ./timegate.yaml.\n  \
               Run 'timegate init' to create a config file."
            .into(),
    })
}

fn create_file_source(path: &std::path::Path) -> Result<Box<dyn ConfigSource>, TimegateError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(sources::yaml::new(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(sources::json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(sources::toml_source::new(path.to_path_buf()))),

        other => Err(TimegateError::UnsupportedFormat(other.to_string())),
    }
}
