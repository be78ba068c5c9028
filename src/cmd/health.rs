//! `timegate health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and reports the
//! result. The endpoint answers with a fixed plaintext body, so the
//! check verifies both the status code and the body content.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::TimegateError;
use crate::health::HEALTH_BODY;

pub async fn execute(args: HealthArgs) -> Result<(), TimegateError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse().map_err(
            |e: hyper::http::uri::InvalidUri| TimegateError::UriParse {
                source: Box::new(e),
            },
        )?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| TimegateError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| TimegateError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| TimegateError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| TimegateError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(TimegateError::HealthCheckFailed(status));
    }

    let body_str = String::from_utf8_lossy(&body);
    if body_str != HEALTH_BODY {
        eprintln!("Unexpected health response body: {body_str}");
    }

    println!("\u{2713} timegate is healthy ({})", args.url);
    Ok(())
}
