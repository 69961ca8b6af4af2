//! YEAH continue-registration flow.
//!
//! This crate drives a registration from form entry to a finalized
//! subscription:
//!
//! - **Intent Initializer** - fetches the setup intent handle once
//! - **Registration Orchestrator** - owns the form and runs the submission
//!   sequence (payment confirmation, then backend finalization)
//! - **Payment** - the payment SDK capability and its Stripe implementation
//!
//! # Payment provider
//!
//! Card capture and setup confirmation belong to the payment provider. This
//! crate only hands it the setup intent and reads back the verified payment
//! method.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod initializer;
pub mod orchestrator;
pub mod payment;

pub use config::{ConfigError, RegistrationConfig};
pub use initializer::{IntentInitializer, IntentReceiver};
pub use orchestrator::{FormView, Phase, RegistrationOrchestrator, RegistrationView};
pub use payment::{PaymentDetails, PaymentSdk, SdkError, StripeSdk};
