//! Submission outcomes and the messages shown for them.

use crate::error::ValidationError;

/// Message shown once registration and payment both succeeded.
pub const SUCCESS_MESSAGE: &str = "Registration and payment successful!";

/// Shown when the payment provider reports an error without a message.
pub const PAYMENT_ERROR_FALLBACK: &str = "An error occurred.";

/// Shown when the backend rejects the registration without a message.
pub const REGISTRATION_ERROR_FALLBACK: &str = "Registration failed.";

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// Payment confirmed and registration finalized.
    Success,
    /// The form was rejected or the payment provider refused the setup.
    ValidationOrPaymentError(String),
    /// The backend did not finalize the registration.
    BackendError(String),
}

impl SubmissionResult {
    /// Payment error with the provider's message, or the generic fallback.
    #[must_use]
    pub fn payment_error(message: Option<String>) -> Self {
        Self::ValidationOrPaymentError(
            message.unwrap_or_else(|| PAYMENT_ERROR_FALLBACK.to_string()),
        )
    }

    /// Backend error with the reported message, or the generic fallback.
    #[must_use]
    pub fn backend_error(message: Option<String>) -> Self {
        Self::BackendError(
            message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| REGISTRATION_ERROR_FALLBACK.to_string()),
        )
    }

    /// Whether the submission succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The message to display for this outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success => SUCCESS_MESSAGE,
            Self::ValidationOrPaymentError(msg) | Self::BackendError(msg) => msg,
        }
    }
}

impl From<ValidationError> for SubmissionResult {
    fn from(err: ValidationError) -> Self {
        Self::ValidationOrPaymentError(err.to_string())
    }
}
