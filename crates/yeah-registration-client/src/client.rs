//! Registration backend HTTP client implementation.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use yeah_registration_core::SetupIntentHandle;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, ContinueRegistrationRequest, ContinueRegistrationResponse,
    CreateSetupIntentRequest, CreateSetupIntentResponse,
};

/// Registration backend API client.
///
/// Issues setup intents and finalizes registrations.
#[derive(Clone)]
pub struct RegistrationClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl RegistrationClient {
    /// Create a new registration client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the backend (e.g., `"http://localhost:8080"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new registration client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            bearer_token: options.bearer_token,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a new setup intent and return its client secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server returns a non-success
    /// status, or the response carries no client secret.
    pub async fn create_setup_intent(&self) -> Result<SetupIntentHandle, ClientError> {
        let response = self
            .request(Method::POST, "/api/create-setup-intent")
            .json(&CreateSetupIntentRequest::default())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let parsed: CreateSetupIntentResponse = serde_json::from_str(&body)?;
        let secret = parsed.client_secret.ok_or(ClientError::MissingClientSecret)?;

        SetupIntentHandle::new(secret).map_err(|_| ClientError::MissingClientSecret)
    }

    /// Finalize a registration with a confirmed payment method.
    ///
    /// A success status is accepted whatever its body; the body is parsed on a
    /// best-effort basis for its optional `message`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with the backend's message on a non-success
    /// status, or a transport error if the request fails.
    pub async fn continue_registration(
        &self,
        request: &ContinueRegistrationRequest,
    ) -> Result<ContinueRegistrationResponse, ClientError> {
        tracing::debug!(
            payment_method_id = %request.payment_method_id,
            price_id = %request.price_id,
            "Sending registration to backend"
        );

        let response = self
            .request(Method::PUT, "/api/continue-registration")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        match serde_json::from_str::<ContinueRegistrationResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::debug!(error = %e, "Registration response body is not JSON");
                Ok(ContinueRegistrationResponse::default())
            }
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));

        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl fmt::Debug for RegistrationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.bearer_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Convert a non-success response into an API error.
fn api_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.message);

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Client options for customization.
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Request timeout (default: none).
    pub timeout: Option<Duration>,
    /// Bearer token sent with every request.
    pub bearer_token: Option<String>,
}

impl ClientOptions {
    /// Set a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("timeout", &self.timeout)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
