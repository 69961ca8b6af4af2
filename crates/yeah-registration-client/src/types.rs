//! Request and response types for the registration backend.

use serde::{Deserialize, Serialize};
use yeah_registration_core::{PaymentMethodId, PriceId, RegistrationFormData};

/// Body of the setup intent request (always empty).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateSetupIntentRequest {}

/// Setup intent response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetupIntentResponse {
    /// Client secret of the new setup intent.
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Registration finalization request.
///
/// Serializes as the form fields flattened alongside `paymentMethodId` and `priceId`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRegistrationRequest {
    /// Customer details.
    #[serde(flatten)]
    pub form: RegistrationFormData,
    /// Payment method confirmed by the payment provider.
    pub payment_method_id: PaymentMethodId,
    /// Subscription price.
    pub price_id: PriceId,
}

/// Registration finalization response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContinueRegistrationResponse {
    /// Optional message from the backend.
    #[serde(default)]
    pub message: Option<String>,
    /// Remaining response fields, kept for logging.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Error body returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
}
