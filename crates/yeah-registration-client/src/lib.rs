//! YEAH registration backend client.
//!
//! This crate wraps the two backend endpoints used by the continue-registration
//! flow: issuing a setup intent and finalizing the registration.
//!
//! # Example
//!
//! ```no_run
//! use yeah_registration_client::{ContinueRegistrationRequest, RegistrationClient};
//! use yeah_registration_core::{PaymentMethodId, PriceId, RegistrationFormData};
//!
//! # async fn example() -> Result<(), yeah_registration_client::ClientError> {
//! let client = RegistrationClient::new("http://localhost:8080")?;
//!
//! // Obtain the client secret used to mount the payment widget
//! let handle = client.create_setup_intent().await?;
//!
//! // ...confirm the setup with the payment provider, then:
//! let response = client
//!     .continue_registration(&ContinueRegistrationRequest {
//!         form: RegistrationFormData::new(),
//!         payment_method_id: PaymentMethodId::new("pm_123").unwrap(),
//!         price_id: PriceId::default(),
//!     })
//!     .await?;
//!
//! println!("{:?}", response.message);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, RegistrationClient};
pub use error::ClientError;
pub use types::*;
