use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use modkit::api::problem::{ProblemResponse, ValidationError};

use crate::domain::error::DomainError;
use crate::errors;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::InvalidPassport { .. } => with_pointer(
            errors::VALIDATION.to_response(e.to_string(), instance),
            "/passportNumber",
            "expected 4 digits, a space and 6 digits",
        ),
        DomainError::Validation { field, message } => with_pointer(
            errors::VALIDATION.to_response(e.to_string(), instance),
            &format!("/{field}"),
            message,
        ),
        DomainError::UserNotFound { id } => errors::USER_NOT_FOUND
            .to_response(format!("User with id {id} was not found"), instance),
        DomainError::UserHasIntervals { id } => errors::USER_HAS_INTERVALS.to_response(
            format!("User {id} still has recorded work intervals"),
            instance,
        ),
        DomainError::NoActiveInterval { .. } => {
            errors::NO_ACTIVE_INTERVAL.to_response("no active task found to stop", instance)
        }
        DomainError::DuplicateOpenInterval { user_id, task_id } => {
            errors::INTERVAL_ALREADY_OPEN.to_response(
                format!("Task {task_id} is already in progress for user {user_id}"),
                instance,
            )
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            errors::INTERNAL_DB.to_response("An internal database error occurred", instance)
        }
    }
}

/// Malformed or mistyped JSON body
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    errors::INVALID_PAYLOAD.to_response(rejection.body_text(), instance)
}

/// Missing or mistyped query parameters
pub fn map_query_rejection(rejection: &QueryRejection, instance: &str) -> ProblemResponse {
    errors::VALIDATION.to_response(rejection.body_text(), instance)
}

/// Non-numeric or out-of-range path ids
pub fn map_path_rejection(rejection: &PathRejection, instance: &str) -> ProblemResponse {
    errors::VALIDATION.to_response(rejection.body_text(), instance)
}

fn with_pointer(mut resp: ProblemResponse, pointer: &str, detail: &str) -> ProblemResponse {
    resp.0 = resp.0.with_errors(vec![ValidationError {
        detail: detail.to_owned(),
        pointer: pointer.to_owned(),
    }]);
    resp
}
