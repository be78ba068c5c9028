//! Timegate is a date-routed HTTP reverse proxy.
//!
//! Incoming requests carry a `date=YYYYMMDD` query parameter that is
//! matched against an ordered table of inclusive date ranges; the first
//! range containing the date selects the backend. The request is then
//! forwarded end-to-end — path, raw query, headers, and body — and the
//! backend's response is streamed back unchanged apart from standard
//! proxy header additions (`X-Forwarded-For`, `X-Forwarded-Host`,
//! `X-Forwarded-Proto`).
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Configuration loading and validation via the
//!   [`ConfigSource`](config::ConfigSource) trait; the table is loaded
//!   once and immutable for the process lifetime.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `/health` endpoint handler returning a fixed liveness body.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core HTTP forwarding: date-range matching, header
//!   synthesis, and streaming relay to the selected backend.
//! - [`server`] -- Axum server setup, shared application state, HTTP client,
//!   and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
