//! Setup intent initialization.
//!
//! On activation the initializer asks the backend for a setup intent once and
//! publishes the client secret to every subscribed orchestrator. A failure is
//! logged and nothing is published; there is no retry.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use yeah_registration_client::RegistrationClient;
use yeah_registration_core::SetupIntentHandle;

/// Receiving side of the setup intent handle.
///
/// Holds `None` until the handle is published.
pub type IntentReceiver = watch::Receiver<Option<SetupIntentHandle>>;

/// Fetches the setup intent handle on activation.
#[derive(Debug)]
pub struct IntentInitializer {
    backend: RegistrationClient,
    sender: watch::Sender<Option<SetupIntentHandle>>,
    activated: AtomicBool,
}

impl IntentInitializer {
    /// Create an initializer and the receiver its handle is published on.
    #[must_use]
    pub fn new(backend: RegistrationClient) -> (Self, IntentReceiver) {
        let (sender, receiver) = watch::channel(None);

        let initializer = Self {
            backend,
            sender,
            activated: AtomicBool::new(false),
        };

        (initializer, receiver)
    }

    /// Subscribe another receiver to the handle.
    #[must_use]
    pub fn subscribe(&self) -> IntentReceiver {
        self.sender.subscribe()
    }

    /// Request the setup intent and publish its handle.
    ///
    /// Only the first activation issues a request; later calls return whatever
    /// was published. Returns `None` if the request failed.
    pub async fn activate(&self) -> Option<SetupIntentHandle> {
        if self.activated.swap(true, Ordering::SeqCst) {
            tracing::debug!("Setup intent already requested");
            return self.published();
        }

        tracing::info!(backend = %self.backend.base_url(), "Requesting setup intent");

        match self.backend.create_setup_intent().await {
            Ok(handle) => {
                tracing::info!(
                    setup_intent = handle.setup_intent_id().unwrap_or("<opaque>"),
                    "Setup intent ready"
                );
                self.sender.send_replace(Some(handle.clone()));
                Some(handle)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching client secret");
                None
            }
        }
    }

    fn published(&self) -> Option<SetupIntentHandle> {
        self.sender.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nothing_published_before_activation() {
        let backend = RegistrationClient::new("http://127.0.0.1:1").unwrap();
        let (initializer, receiver) = IntentInitializer::new(backend);

        assert!(receiver.borrow().is_none());
        assert!(initializer.subscribe().borrow().is_none());
    }

    #[tokio::test]
    async fn failed_activation_publishes_nothing() {
        let backend = RegistrationClient::new("http://127.0.0.1:1").unwrap();
        let (initializer, receiver) = IntentInitializer::new(backend);

        assert!(initializer.activate().await.is_none());
        assert!(receiver.borrow().is_none());

        // No retry on a second activation
        assert!(initializer.activate().await.is_none());
    }
}
