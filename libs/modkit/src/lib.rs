//! # ModKit - shared HTTP plumbing for service modules
//!
//! - [`api::problem`]: RFC 9457 Problem Details rendered as axum responses.
//! - [`http::client`]: a `reqwest` wrapper that opens an `outgoing_http` span per call
//!   and propagates a W3C `traceparent` header.

pub use anyhow::Result;

pub mod api;
pub use api::problem::{
    bad_request, conflict, internal_error, not_found, Problem, ProblemResponse, ValidationError,
};

pub mod http;
pub use http::client::TracedClient;
