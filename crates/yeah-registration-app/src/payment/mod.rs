//! Payment provider integration.
//!
//! The payment provider handles:
//! - Capturing payment details in its hosted widget
//! - Confirming setup intents
//! - Producing the verified payment method used for the subscription

pub mod sdk;
pub mod shared;
pub mod stripe;

pub use sdk::*;
pub use shared::shared_stripe_sdk;
pub use stripe::StripeSdk;
