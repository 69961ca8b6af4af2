//! Payment SDK capability.
//!
//! The hosted payment widget captures payment details and confirms the setup
//! intent with the provider. The orchestrator only sees this trait, so the
//! provider can be swapped for a double in tests.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use yeah_registration_core::{PaymentMethodId, SetupIntentHandle};

/// Message shown when the captured details are not enough to confirm.
const INCOMPLETE_DETAILS_MESSAGE: &str = "Your payment details are incomplete.";

/// Message shown when the provider wants a redirect we cannot follow.
const REQUIRES_ACTION_MESSAGE: &str =
    "Additional authentication is required to use this payment method.";

/// Error type for payment SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused the setup.
    #[error("payment provider error: {error_type} - {}", .message.as_deref().unwrap_or("no message"))]
    Provider {
        /// Error type (e.g. `card_error`).
        error_type: String,
        /// Error code (e.g. `card_declined`).
        code: Option<String>,
        /// Message meant for the customer.
        message: Option<String>,
    },

    /// No payment details were captured.
    #[error("payment details incomplete")]
    IncompleteDetails,

    /// The setup needs an authentication step outside this flow.
    #[error("setup requires additional action")]
    RequiresAction,

    /// The setup ended in a status other than succeeded.
    #[error("unexpected setup status: {0}")]
    UnexpectedStatus(String),

    /// The setup completed without a payment method.
    #[error("setup completed without a payment method")]
    MissingPaymentMethod,

    /// The client secret does not identify a setup intent.
    #[error("invalid client secret")]
    InvalidClientSecret,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SdkError {
    /// The message to show the customer, if the provider gave one.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Provider { message, .. } => message.clone(),
            Self::IncompleteDetails => Some(INCOMPLETE_DETAILS_MESSAGE.to_string()),
            Self::RequiresAction => Some(REQUIRES_ACTION_MESSAGE.to_string()),
            _ => None,
        }
    }
}

/// Theme of the hosted payment widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Provider default.
    #[default]
    Stripe,
    /// Dark.
    Night,
    /// Flat.
    Flat,
}

impl Theme {
    /// Get the theme name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Night => "night",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(Self::Stripe),
            "night" => Ok(Self::Night),
            "flat" => Ok(Self::Flat),
            other => Err(SdkError::Configuration(format!("unknown theme: {other}"))),
        }
    }
}

/// Widget appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Appearance {
    /// Theme name.
    pub theme: Theme,
}

/// Options the payment widget is mounted with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementsOptions {
    /// Setup intent the widget collects details for.
    pub client_secret: SetupIntentHandle,
    /// Widget appearance.
    pub appearance: Appearance,
}

/// Payment details captured by the hosted widget.
///
/// Only a provider-side reference is ever held here, never raw card data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    /// Payment method reference (e.g. `pm_card_visa`).
    pub payment_method: String,
}

impl PaymentDetails {
    /// Details referring to a payment method the widget tokenized.
    #[must_use]
    pub fn payment_method(reference: impl Into<String>) -> Self {
        Self {
            payment_method: reference.into(),
        }
    }
}

/// A mounted payment widget.
#[derive(Debug, Clone)]
pub struct PaymentWidget {
    options: ElementsOptions,
    captured: Option<PaymentDetails>,
}

impl PaymentWidget {
    /// Mount a widget for a setup intent.
    #[must_use]
    pub fn mount(client_secret: SetupIntentHandle, appearance: Appearance) -> Self {
        Self {
            options: ElementsOptions {
                client_secret,
                appearance,
            },
            captured: None,
        }
    }

    /// Options the widget was mounted with.
    #[must_use]
    pub fn options(&self) -> &ElementsOptions {
        &self.options
    }

    /// Record the details the customer entered.
    pub fn capture(&mut self, details: PaymentDetails) {
        self.captured = Some(details);
    }

    /// Details captured so far.
    #[must_use]
    pub fn captured(&self) -> Option<&PaymentDetails> {
        self.captured.as_ref()
    }

    /// Build the confirmation request for the current state of the widget.
    #[must_use]
    pub fn confirm_request(&self) -> ConfirmSetupRequest {
        ConfirmSetupRequest {
            client_secret: self.options.client_secret.clone(),
            details: self.captured.clone(),
        }
    }
}

/// Input to [`PaymentSdk::confirm_setup`].
///
/// Confirmation never redirects: a setup that needs a redirect fails with
/// [`SdkError::RequiresAction`].
#[derive(Debug, Clone)]
pub struct ConfirmSetupRequest {
    /// Setup intent to confirm.
    pub client_secret: SetupIntentHandle,
    /// Captured payment details, if any.
    pub details: Option<PaymentDetails>,
}

/// A setup intent the provider reported as complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSetup {
    /// Setup intent ID.
    pub id: String,
    /// Final status (`succeeded` or `processing`).
    pub status: String,
    /// The verified payment method.
    pub payment_method: PaymentMethodId,
}

/// Confirms setup intents with the payment provider.
#[async_trait]
pub trait PaymentSdk: Send + Sync {
    /// Confirm a setup intent with the captured payment details.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider refuses the setup or cannot be reached.
    async fn confirm_setup(&self, request: ConfirmSetupRequest)
        -> Result<CompletedSetup, SdkError>;
}
