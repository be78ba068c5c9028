//! Serde data structures for the Timegate configuration file.
//!
//! Contains [`Config`] (the root) and [`DateRangeConfig`] (one routing
//! entry). All types derive `Serialize` and `Deserialize` with
//! `deny_unknown_fields` for strict parsing. Dates stay `YYYYMMDD`
//! strings here; [`DateRangeTable`](crate::proxy::routing::DateRangeTable)
//! holds the parsed form used at runtime.

use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y%m%d";

const fn default_port() -> u16 {
    8080
}

const fn default_read_timeout() -> u64 {
    15_000
}

const fn default_write_timeout() -> u64 {
    60_000
}

const fn default_idle_timeout() -> u64 {
    60_000
}

const fn default_forward_timeout() -> u64 {
    30_000
}

fn is_default_port(v: &u16) -> bool {
    *v == default_port()
}

fn is_default_read_timeout(v: &u64) -> bool {
    *v == default_read_timeout()
}

fn is_default_write_timeout(v: &u64) -> bool {
    *v == default_write_timeout()
}

fn is_default_idle_timeout(v: &u64) -> bool {
    *v == default_idle_timeout()
}

fn is_default_forward_timeout(v: &u64) -> bool {
    *v == default_forward_timeout()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listen port for the inbound server.
    #[serde(default = "default_port", skip_serializing_if = "is_default_port")]
    pub port: u16,

    /// Inbound request body read timeout, milliseconds.
    #[serde(
        default = "default_read_timeout",
        skip_serializing_if = "is_default_read_timeout"
    )]
    pub read_timeout_ms: u64,

    /// Inbound response deadline, milliseconds.
    #[serde(
        default = "default_write_timeout",
        skip_serializing_if = "is_default_write_timeout"
    )]
    pub write_timeout_ms: u64,

    /// Idle timeout for pooled backend connections, milliseconds.
    #[serde(
        default = "default_idle_timeout",
        skip_serializing_if = "is_default_idle_timeout"
    )]
    pub idle_timeout_ms: u64,

    /// Outbound forwarding timeout, milliseconds. Independent of the
    /// inbound timeouts above.
    #[serde(
        default = "default_forward_timeout",
        skip_serializing_if = "is_default_forward_timeout"
    )]
    pub forward_timeout_ms: u64,

    /// Ordered routing table. First range containing the request date wins.
    pub date_ranges: Vec<DateRangeConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DateRangeConfig {
    /// First day of the range, inclusive, `YYYYMMDD`.
    pub start: String,

    /// Last day of the range, inclusive, `YYYYMMDD`.
    pub end: String,

    /// Absolute base URL of the backend. Only scheme, host, and port are
    /// used when forwarding; any path or query here is ignored.
    pub target: String,
}

impl Config {
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.date_ranges.len()
    }
}
