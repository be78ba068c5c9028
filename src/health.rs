//! `/health` endpoint handler.
//!
//! A fixed, backend-independent liveness probe: any method, any query,
//! always `200 OK` with the same plaintext body. No routing table or
//! backend state is consulted, so the endpoint stays truthful even
//! when every configured backend is down.

/// Body returned by `/health`; the `health` subcommand checks for it.
pub const HEALTH_BODY: &str = "timegate is healthy";

pub async fn health_handler() -> &'static str {
    HEALTH_BODY
}
