//! Registration app configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use yeah_registration_client::ClientOptions;

use crate::payment::stripe::DEFAULT_STRIPE_API_BASE_URL;
use crate::payment::{Appearance, Theme};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No Stripe publishable key was configured.
    #[error("Stripe publishable key not configured (set STRIPE_PUBLISHABLE_KEY or .secrets/stripe.json)")]
    MissingPublishableKey,
}

/// Configuration loaded from environment variables.
#[derive(Clone)]
pub struct RegistrationConfig {
    /// Registration backend base URL (default: `http://localhost:8080`).
    pub api_base_url: String,

    /// Bearer token sent to the backend (optional).
    pub api_bearer_token: Option<String>,

    /// Stripe publishable key.
    pub stripe_publishable_key: Option<String>,

    /// Stripe API base URL (default: `https://api.stripe.com/v1`).
    pub stripe_api_base_url: String,

    /// Payment widget theme (default: stripe).
    pub theme: Theme,

    /// Backend request timeout in seconds (default: none).
    pub request_timeout_seconds: Option<u64>,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    publishable_key: String,
}

impl RegistrationConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let theme = match std::env::var("STRIPE_APPEARANCE_THEME") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring STRIPE_APPEARANCE_THEME");
                Theme::default()
            }),
            Err(_) => Theme::default(),
        };

        Self {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            api_bearer_token: std::env::var("API_BEARER_TOKEN").ok(),
            stripe_publishable_key: load_stripe_publishable_key(),
            stripe_api_base_url: std::env::var("STRIPE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE_URL.into()),
            theme,
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// The Stripe publishable key.
    ///
    /// # Errors
    ///
    /// Returns an error if no key was configured.
    pub fn publishable_key(&self) -> Result<&str, ConfigError> {
        self.stripe_publishable_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingPublishableKey)
    }

    /// Payment widget appearance.
    #[must_use]
    pub fn appearance(&self) -> Appearance {
        Appearance { theme: self.theme }
    }

    /// Options for the backend client.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::default();
        if let Some(seconds) = self.request_timeout_seconds {
            options = options.with_timeout(Duration::from_secs(seconds));
        }
        if let Some(token) = &self.api_bearer_token {
            options = options.with_bearer_token(token);
        }
        options
    }
}

impl std::fmt::Debug for RegistrationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_bearer_token", &self.api_bearer_token.is_some())
            .field("stripe_publishable_key", &self.stripe_publishable_key.is_some())
            .field("stripe_api_base_url", &self.stripe_api_base_url)
            .field("theme", &self.theme)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

/// Load the Stripe publishable key from file or environment.
fn load_stripe_publishable_key() -> Option<String> {
    let secret_paths = [".secrets/stripe.json", "../.secrets/stripe.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(Path::new(path)) {
            tracing::info!(path = %path, "Loaded Stripe publishable key from file");
            return Some(secrets.publishable_key);
        }
    }

    // Fall back to environment variables
    tracing::debug!("Stripe secrets file not found, using environment variables");
    std::env::var("STRIPE_PUBLISHABLE_KEY").ok()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".into(),
            api_bearer_token: None,
            stripe_publishable_key: None,
            stripe_api_base_url: DEFAULT_STRIPE_API_BASE_URL.into(),
            theme: Theme::default(),
            request_timeout_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RegistrationConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.appearance().theme, Theme::Stripe);
        assert!(matches!(
            config.publishable_key(),
            Err(ConfigError::MissingPublishableKey)
        ));
        assert!(config.client_options().timeout.is_none());
    }

    #[test]
    fn client_options_from_config() {
        let config = RegistrationConfig {
            api_bearer_token: Some("jwt".into()),
            request_timeout_seconds: Some(5),
            ..RegistrationConfig::default()
        };
        let options = config.client_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.bearer_token.as_deref(), Some("jwt"));
    }

    #[test]
    fn debug_hides_secrets() {
        let config = RegistrationConfig {
            api_bearer_token: Some("jwt-secret".into()),
            stripe_publishable_key: Some("pk_test_secret".into()),
            ..RegistrationConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("jwt-secret"));
        assert!(!debug.contains("pk_test_secret"));
    }

    #[test]
    fn secrets_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripe.json");
        std::fs::write(&path, r#"{"publishable_key":"pk_test_file"}"#).unwrap();

        let secrets: StripeSecrets = load_secrets_file(&path).unwrap();
        assert_eq!(secrets.publishable_key, "pk_test_file");
    }

    #[test]
    fn secrets_file_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_secrets_file::<StripeSecrets>(&missing).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

        let invalid = dir.path().join("stripe.json");
        std::fs::write(&invalid, "{}").unwrap();
        let err = load_secrets_file::<StripeSecrets>(&invalid).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
