//! Error types for the registration domain.

use crate::form::FormField;

/// A form rule violation that blocks submission before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("Please fill out the {} field.", .field.label())]
    Missing {
        /// The empty field.
        field: FormField,
    },

    /// The email field does not look like an address.
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// A numeric field does not hold a non-negative integer.
    #[error("Please enter a number in the {} field.", .field.label())]
    InvalidNumber {
        /// The offending field.
        field: FormField,
    },

    /// The field name is not part of the registration form.
    #[error("unknown form field: {0}")]
    UnknownField(String),
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier is empty.
    #[error("identifier must not be empty")]
    Empty,
}
