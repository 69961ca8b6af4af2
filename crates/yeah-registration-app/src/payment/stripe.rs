//! Stripe implementation of the payment SDK.
//!
//! Confirms setup intents the way the hosted Stripe widget does: a
//! publishable-key request against `/v1/setup_intents/{id}/confirm` carrying
//! the client secret and the tokenized payment method.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use yeah_registration_core::PaymentMethodId;

use super::sdk::{CompletedSetup, ConfirmSetupRequest, PaymentSdk, SdkError};

/// Stripe API base URL.
pub const DEFAULT_STRIPE_API_BASE_URL: &str = "https://api.stripe.com/v1";

/// Stripe `SetupIntent` object (the fields this flow reads).
#[derive(Debug, Clone, Deserialize)]
pub struct SetupIntent {
    /// Setup intent ID.
    pub id: String,
    /// Status (succeeded, processing, `requires_action`, ...).
    #[serde(default)]
    pub status: String,
    /// Attached payment method, as an ID or an expanded object.
    #[serde(default)]
    pub payment_method: Option<Expandable>,
    /// Error from the last failed confirmation attempt.
    #[serde(default)]
    pub last_setup_error: Option<StripeErrorDetail>,
}

/// A Stripe field that may hold an ID or the expanded object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Expandable {
    /// Just the ID.
    Id(String),
    /// Expanded object.
    Object {
        /// Object ID.
        id: String,
    },
}

impl Expandable {
    /// The referenced object's ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

impl From<StripeErrorDetail> for SdkError {
    fn from(detail: StripeErrorDetail) -> Self {
        Self::Provider {
            error_type: detail.error_type,
            code: detail.code,
            message: detail.message,
        }
    }
}

/// Stripe payment SDK client.
#[derive(Clone)]
pub struct StripeSdk {
    client: Client,
    publishable_key: String,
    base_url: String,
}

impl StripeSdk {
    /// Create a new Stripe SDK client.
    ///
    /// # Arguments
    ///
    /// * `publishable_key` - Stripe publishable key (`pk_test_...` or `pk_live_...`)
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or is a secret key, or if the HTTP
    /// client cannot be built.
    pub fn new(publishable_key: impl Into<String>) -> Result<Self, SdkError> {
        let publishable_key = publishable_key.into();

        if publishable_key.is_empty() {
            return Err(SdkError::Configuration("publishable key is empty".into()));
        }
        if publishable_key.starts_with("sk_") || publishable_key.starts_with("rk_") {
            return Err(SdkError::Configuration(
                "secret keys must not be used client-side".into(),
            ));
        }

        Ok(Self {
            client: Client::builder().build()?,
            publishable_key,
            base_url: DEFAULT_STRIPE_API_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SdkError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(stripe_error.error.into()),
            Err(_) => Err(SdkError::Provider {
                error_type: "unknown".to_string(),
                code: None,
                message: None,
            }),
        }
    }
}

#[async_trait]
impl PaymentSdk for StripeSdk {
    async fn confirm_setup(
        &self,
        request: ConfirmSetupRequest,
    ) -> Result<CompletedSetup, SdkError> {
        let intent_id = request
            .client_secret
            .setup_intent_id()
            .ok_or(SdkError::InvalidClientSecret)?;
        let details = request.details.ok_or(SdkError::IncompleteDetails)?;

        let params = [
            ("client_secret", request.client_secret.expose_secret()),
            ("payment_method", details.payment_method.as_str()),
        ];

        tracing::debug!(setup_intent = %intent_id, "Confirming Stripe setup intent");

        let response = self
            .client
            .post(format!("{}/setup_intents/{intent_id}/confirm", self.base_url))
            .basic_auth(&self.publishable_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        let intent: SetupIntent = self.handle_response(response).await?;

        match intent.status.as_str() {
            "succeeded" | "processing" => {
                let payment_method = intent
                    .payment_method
                    .as_ref()
                    .and_then(|pm| PaymentMethodId::new(pm.id()).ok())
                    .ok_or(SdkError::MissingPaymentMethod)?;

                tracing::info!(
                    setup_intent = %intent.id,
                    status = %intent.status,
                    "Stripe setup intent confirmed"
                );

                Ok(CompletedSetup {
                    id: intent.id,
                    status: intent.status,
                    payment_method,
                })
            }
            "requires_action" => Err(SdkError::RequiresAction),
            "requires_payment_method" => Err(intent
                .last_setup_error
                .map_or(SdkError::IncompleteDetails, SdkError::from)),
            other => Err(SdkError::UnexpectedStatus(other.to_string())),
        }
    }
}

impl fmt::Debug for StripeSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeSdk")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdk_creation() {
        let sdk = StripeSdk::new("pk_test_xxx").unwrap();
        assert_eq!(sdk.base_url, DEFAULT_STRIPE_API_BASE_URL);
    }

    #[test]
    fn sdk_rejects_secret_keys() {
        assert!(matches!(
            StripeSdk::new("sk_test_xxx"),
            Err(SdkError::Configuration(_))
        ));
        assert!(matches!(StripeSdk::new(""), Err(SdkError::Configuration(_))));
    }

    #[test]
    fn sdk_base_url_trims_slash() {
        let sdk = StripeSdk::new("pk_test_xxx")
            .unwrap()
            .with_base_url("http://localhost:12111/v1/");
        assert_eq!(sdk.base_url, "http://localhost:12111/v1");
    }

    #[test]
    fn debug_hides_key() {
        let sdk = StripeSdk::new("pk_test_hidden").unwrap();
        assert!(!format!("{sdk:?}").contains("pk_test_hidden"));
    }

    #[test]
    fn expandable_payment_method() {
        let intent: SetupIntent = serde_json::from_value(serde_json::json!({
            "id": "seti_1",
            "status": "succeeded",
            "payment_method": { "id": "pm_123", "object": "payment_method" }
        }))
        .unwrap();
        assert_eq!(intent.payment_method.unwrap().id(), "pm_123");

        let intent: SetupIntent = serde_json::from_value(serde_json::json!({
            "id": "seti_1",
            "status": "succeeded",
            "payment_method": "pm_456"
        }))
        .unwrap();
        assert_eq!(intent.payment_method.unwrap().id(), "pm_456");
    }
}
