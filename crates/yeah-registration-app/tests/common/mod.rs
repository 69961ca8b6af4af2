//! Common test utilities for registration flow tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{watch, Notify};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yeah_registration::payment::{CompletedSetup, ConfirmSetupRequest};
use yeah_registration::{PaymentSdk, RegistrationOrchestrator, SdkError};
use yeah_registration_client::RegistrationClient;
use yeah_registration_core::{FormField, PaymentMethodId, SetupIntentHandle};

/// Client secret handed out by the mocked backend.
pub const CLIENT_SECRET: &str = "seti_123_secret_abc";

/// What the scripted SDK answers.
#[derive(Debug, Clone)]
pub enum SdkReply {
    /// Confirm with this payment method.
    Confirm(&'static str),
    /// Refuse with this provider message.
    Decline(Option<&'static str>),
}

/// Payment SDK double that answers from a script and counts calls.
pub struct ScriptedSdk {
    reply: SdkReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<ConfirmSetupRequest>>,
    gate: Option<Gate>,
}

/// Holds a confirmation in flight until released.
pub struct Gate {
    /// Notified when a confirmation starts.
    pub started: Notify,
    /// Notify to let the confirmation finish.
    pub release: Notify,
}

impl ScriptedSdk {
    /// SDK that answers immediately.
    pub fn new(reply: SdkReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// SDK that waits for [`Gate::release`] before answering.
    pub fn gated(reply: SdkReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: Some(Gate {
                started: Notify::new(),
                release: Notify::new(),
            }),
        })
    }

    /// Number of confirmations requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ConfirmSetupRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The gate, for gated SDKs.
    pub fn gate(&self) -> &Gate {
        self.gate.as_ref().expect("SDK is not gated")
    }
}

#[async_trait]
impl PaymentSdk for ScriptedSdk {
    async fn confirm_setup(
        &self,
        request: ConfirmSetupRequest,
    ) -> Result<CompletedSetup, SdkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        match &self.reply {
            SdkReply::Confirm(payment_method) => Ok(CompletedSetup {
                id: "seti_123".to_string(),
                status: "succeeded".to_string(),
                payment_method: PaymentMethodId::new(*payment_method).unwrap(),
            }),
            SdkReply::Decline(message) => Err(SdkError::Provider {
                error_type: "card_error".to_string(),
                code: Some("card_declined".to_string()),
                message: message.map(String::from),
            }),
        }
    }
}

/// Mount the setup intent endpoint on a mock backend.
pub async fn mock_setup_intent(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/create-setup-intent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "clientSecret": CLIENT_SECRET })),
        )
        .mount(server)
        .await;
}

/// Build an orchestrator whose setup intent handle is already published.
///
/// The returned sender keeps the intent channel open.
pub fn ready_orchestrator(
    server: &MockServer,
    sdk: Arc<ScriptedSdk>,
) -> (
    RegistrationOrchestrator,
    watch::Sender<Option<SetupIntentHandle>>,
) {
    let handle = SetupIntentHandle::new(CLIENT_SECRET).unwrap();
    let (sender, receiver) = watch::channel(Some(handle));
    let backend = RegistrationClient::new(server.uri()).unwrap();

    (RegistrationOrchestrator::new(sdk, backend, receiver), sender)
}

/// Fill in the form with the sample customer.
pub fn fill_form(orchestrator: &RegistrationOrchestrator) {
    for (field, value) in sample_fields() {
        orchestrator.set_field(field, value);
    }
}

/// Sample customer used across tests.
pub fn sample_fields() -> [(FormField, &'static str); 8] {
    [
        (FormField::Email, "a@b.com"),
        (FormField::CompanyName, "Acme"),
        (FormField::FirstName, "A"),
        (FormField::LastName, "B"),
        (FormField::Phone, "555"),
        (FormField::Activity, "x"),
        (FormField::Industry, "y"),
        (FormField::NumberOfClients, "3"),
    ]
}
