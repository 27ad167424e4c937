use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid passport number '{value}': expected 4 digits, a space and 6 digits")]
    InvalidPassport { value: String },

    #[error("User not found: {id}")]
    UserNotFound { id: i32 },

    #[error("User {id} still has recorded work intervals")]
    UserHasIntervals { id: i32 },

    #[error("no active task found to stop (user {user_id}, task {task_id})")]
    NoActiveInterval { user_id: i32, task_id: i32 },

    #[error("An interval is already open for user {user_id}, task {task_id}")]
    DuplicateOpenInterval { user_id: i32, task_id: i32 },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    pub fn invalid_passport(value: impl Into<String>) -> Self {
        Self::InvalidPassport {
            value: value.into(),
        }
    }

    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn user_has_intervals(id: i32) -> Self {
        Self::UserHasIntervals { id }
    }

    pub fn no_active_interval(user_id: i32, task_id: i32) -> Self {
        Self::NoActiveInterval { user_id, task_id }
    }

    pub fn duplicate_open_interval(user_id: i32, task_id: i32) -> Self {
        Self::DuplicateOpenInterval { user_id, task_id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Map domain error to the public contract error
impl From<DomainError> for crate::contract::error::TimeTrackerError {
    fn from(domain_error: DomainError) -> Self {
        use crate::contract::error::TimeTrackerError;
        match domain_error {
            DomainError::UserNotFound { .. } | DomainError::NoActiveInterval { .. } => {
                TimeTrackerError::not_found(domain_error.to_string())
            }
            DomainError::UserHasIntervals { .. } | DomainError::DuplicateOpenInterval { .. } => {
                TimeTrackerError::conflict(domain_error.to_string())
            }
            DomainError::InvalidPassport { .. } | DomainError::Validation { .. } => {
                TimeTrackerError::validation(domain_error.to_string())
            }
            DomainError::Database { .. } => TimeTrackerError::internal(),
        }
    }
}
