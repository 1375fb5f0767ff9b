use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes surfaced to callers. Codes, not variants, cross the
/// wire so the presentation layer can branch without recompiling.
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
pub const UNKNOWN_PRIORITY: &str = "UNKNOWN_PRIORITY";
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";

/// Single structured error shape used across all backend layers and exposed
/// over the HTTP API unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn not_found(id: i64) -> Self {
        Self::new(NOT_FOUND, format!("Incident {id} not found"))
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(INVALID_TRANSITION, message)
    }

    pub fn unknown_priority(value: &str) -> Self {
        Self::new(UNKNOWN_PRIORITY, "Unknown priority")
            .with_details(format!("value={value}; expected one of P1..P4"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(VALIDATION_FAILED, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
