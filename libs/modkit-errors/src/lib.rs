//! Catalog-driven Problem building.
//!
//! Modules declare their errors once as `ErrDef` constants and turn them into
//! RFC 9457 problems at the API boundary.
use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse};

/// Base URL for problem `type` links.
pub const ERRORS_BASE_URL: &str = "https://errors.example.com";

/// Static error definition from a module catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
}

impl ErrDef {
    pub const fn new(status: u16, title: &'static str, code: &'static str) -> Self {
        Self {
            status,
            title,
            code,
        }
    }

    pub fn type_url(&self) -> String {
        format!("{}/{}", ERRORS_BASE_URL, self.code)
    }

    /// Convert this error definition into a Problem with the given detail
    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            self.title,
            detail.into(),
        )
        .with_code(self.code)
        .with_type(self.type_url())
    }

    /// Build a ready-to-return response for the request at `instance`,
    /// tagged with the current trace id.
    pub fn to_response(&self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        ProblemResponse(
            self.to_problem(detail)
                .with_instance(instance)
                .with_current_trace_id(),
        )
    }
}
