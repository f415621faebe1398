// --- File: crates/slotbook_common/src/error.rs ---
use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`CalendarGateway`](crate::services::CalendarGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider answered with an error.
    #[error("Calendar provider error: {message}")]
    Provider { message: String, retryable: bool },

    /// No answer within the configured timeout.
    #[error("Calendar provider did not respond within {0:?}")]
    Timeout(Duration),

    /// The provider answered with something we cannot interpret.
    #[error("Unexpected calendar response: {0}")]
    InvalidResponse(String),

    /// An instant arrived without a usable UTC offset.
    #[error("Timezone mismatch: {0}")]
    TimezoneMismatch(String),
}

impl GatewayError {
    pub fn provider<T: std::fmt::Display>(message: T, retryable: bool) -> Self {
        GatewayError::Provider {
            message: message.to_string(),
            retryable,
        }
    }

    /// Whether repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Provider { retryable, .. } => *retryable,
            GatewayError::Timeout(_) => true,
            GatewayError::InvalidResponse(_) | GatewayError::TimezoneMismatch(_) => false,
        }
    }
}

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by error types that reach the HTTP surface so handlers map them
/// consistently.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for GatewayError {
    fn status_code(&self) -> u16 {
        match self {
            GatewayError::Timeout(_) => 504,
            _ => 502,
        }
    }
}
