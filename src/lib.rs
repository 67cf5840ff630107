//! MultiCloud - a framework core that normalizes inbound serverless
//! requests into a uniform event representation.
//!
//! This crate has two layers:
//! 1. A normalization core: protocol adapters that drain a streaming
//!    request body channel and produce an [`core::Event`] with typed,
//!    lazy accessors over body content (JSON, XML, form data, binary,
//!    text)
//! 2. CLI collaborators: a YAML-backed configuration store and a build
//!    packaging step used by the `multicloud` binary
//!
//! # Architecture
//!
//! The system uses:
//! - Tokio for the async runtime
//! - An [`knative::BodyChannel`] trait as the seam between adapters and
//!   the serverless runtime's body delivery
//! - serde/serde_json for JSON interpretation, serde_yaml for config
//!   persistence
//! - Tracing for structured logs
//!
//! # Example
//!
//! ```
//! use indexmap::IndexMap;
//! use multicloud::core::{Body, Event};
//!
//! let mut headers = IndexMap::new();
//! headers.insert("Content-Type".to_string(), "application/json".to_string());
//!
//! let event = Event::new("POST", "/api/users", headers)
//!     .with_body(Body::Text(r#"{"name":"Ada"}"#.to_string()));
//!
//! assert!(event.is_json());
//! assert_eq!(event.get_json().unwrap()["name"], "Ada");
//! ```
// Module declarations
pub mod cli;
pub mod core;
pub mod errors;
pub mod knative;

pub use errors::{AdapterError, ChannelError};

/// Configure structured logging with JSON format for serverless
/// environments.
///
/// This function sets up tracing-subscriber with a JSON formatter
/// suitable for log ingestion by the hosting platform. It should be
/// called once at the start of each function entrypoint.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
