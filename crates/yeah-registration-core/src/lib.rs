//! Core types for the YEAH continue-registration flow.
//!
//! This crate provides the foundational types shared by the backend client and
//! the registration app:
//!
//! - **Form**: `RegistrationFormData`, `FormField`, `InputKind`
//! - **Identifiers**: `SetupIntentHandle`, `PaymentMethodId`, `PriceId`
//! - **Results**: `SubmissionResult` and the user-facing messages
//!
//! # Pricing
//!
//! Every registration subscribes to a single price. Its identifier is fixed at
//! build time, see [`DEFAULT_PRICE_ID`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod form;
pub mod ids;
pub mod submission;

pub use error::{IdError, ValidationError};
pub use form::{FormField, InputKind, RegistrationFormData};
pub use ids::{PaymentMethodId, PriceId, SetupIntentHandle, DEFAULT_PRICE_ID};
pub use submission::{
    SubmissionResult, PAYMENT_ERROR_FALLBACK, REGISTRATION_ERROR_FALLBACK, SUCCESS_MESSAGE,
};
