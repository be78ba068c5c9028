//! Single-target request forwarding.
//!
//! [`forward`] composes the outbound request against the matched
//! target (the target contributes scheme, host, and port; the inbound
//! request contributes path, raw query, headers, and body), executes it
//! on the shared connection-pooled client under the configured outbound
//! timeout, and hands the streaming response back to the handler.
//!
//! The future is driven inside the inbound request task, so dropping
//! the inbound request (client disconnect, graceful shutdown deadline)
//! cancels the outbound call and releases its connection.

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Uri};
use hyper::body::Incoming;
use url::Url;

use crate::server::HttpClient;

use super::headers::build_forward_headers;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid outbound URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },

    #[error("failed to build outbound request: {0}")]
    RequestBuild(#[from] hyper::http::Error),

    #[error("request to {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    #[error("request to {target} failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

pub struct ForwardRequest<'a> {
    pub client: &'a HttpClient,
    pub target: &'a Url,
    pub method: Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub body: Body,
    pub client_ip: &'a str,
    pub correlation_id: &'a str,
    pub timeout: Duration,
}

/// Scheme + authority from the target, path + raw query from the
/// inbound request, verbatim. The target's own path and query are
/// discarded.
fn compose_outbound_uri(target: &Url, inbound: &Uri) -> String {
    let authority = target.port().map_or_else(
        || target.host_str().unwrap_or_default().to_string(),
        |port| format!("{}:{port}", target.host_str().unwrap_or_default()),
    );
    let path_and_query = inbound
        .path_and_query()
        .map_or("/", |pq| pq.as_str());

    format!("{}://{authority}{path_and_query}", target.scheme())
}

pub async fn forward(req: ForwardRequest<'_>) -> Result<hyper::Response<Incoming>, ForwardError> {
    let outbound_uri = compose_outbound_uri(req.target, req.uri);
    let uri: hyper::Uri = outbound_uri
        .parse()
        .map_err(|source| ForwardError::InvalidUri {
            uri: outbound_uri.clone(),
            source,
        })?;

    let forwarded_headers =
        build_forward_headers(req.headers, req.client_ip, req.target, req.correlation_id);

    let mut builder = hyper::Request::builder().method(req.method).uri(uri);
    for (key, value) in &forwarded_headers {
        builder = builder.header(key, value);
    }
    let outbound = builder.body(req.body)?;

    // Bounds connection establishment and response headers; once the
    // response starts streaming, only cancellation ends it early.
    match tokio::time::timeout(req.timeout, req.client.request(outbound)).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(source)) => Err(ForwardError::Transport {
            target: outbound_uri,
            source,
        }),
        Err(_) => Err(ForwardError::Timeout {
            target: outbound_uri,
            timeout: req.timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn appends_inbound_path_and_query() {
        let target = Url::parse("http://backend:9001").unwrap();
        let inbound = uri("http://proxy/orders?x=1&date=20230101");
        assert_eq!(
            compose_outbound_uri(&target, &inbound),
            "http://backend:9001/orders?x=1&date=20230101"
        );
    }

    #[test]
    fn discards_target_path_and_query() {
        let target = Url::parse("http://backend:9001/base?drop=me").unwrap();
        let inbound = uri("http://proxy/orders?date=20230101");
        assert_eq!(
            compose_outbound_uri(&target, &inbound),
            "http://backend:9001/orders?date=20230101"
        );
    }

    #[test]
    fn preserves_raw_query_encoding() {
        let target = Url::parse("http://backend:9001").unwrap();
        let inbound = uri("/search?q=a%20b&tag=x&tag=y");
        assert_eq!(
            compose_outbound_uri(&target, &inbound),
            "http://backend:9001/search?q=a%20b&tag=x&tag=y"
        );
    }

    #[test]
    fn default_port_stays_implicit() {
        let target = Url::parse("https://backend.example.com").unwrap();
        let inbound = uri("/orders");
        assert_eq!(
            compose_outbound_uri(&target, &inbound),
            "https://backend.example.com/orders"
        );
    }

    #[test]
    fn empty_query_keeps_bare_path() {
        let target = Url::parse("http://backend:9001").unwrap();
        let inbound = uri("/orders");
        assert_eq!(
            compose_outbound_uri(&target, &inbound),
            "http://backend:9001/orders"
        );
    }
}
