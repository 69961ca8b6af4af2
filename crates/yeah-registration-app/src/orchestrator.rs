//! Registration orchestration.
//!
//! The orchestrator owns the form, mounts the payment widget once the setup
//! intent handle is published, and runs the submission sequence:
//!
//! ```text
//! Idle ──submit──▶ ConfirmingPayment ──sdk error──▶ Idle (error shown)
//!                        │
//!                   sdk success
//!                        ▼
//!              FinalizingRegistration ──backend error──▶ Idle (error shown)
//!                        │
//!                   backend ok
//!                        ▼
//!                 Done (success shown)
//! ```
//!
//! The processing flag turns any `submit` issued while another is in flight
//! into a no-op. The backend is never called before the payment provider has
//! confirmed the setup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use yeah_registration_client::{ContinueRegistrationRequest, RegistrationClient};
use yeah_registration_core::{
    FormField, PaymentMethodId, PriceId, RegistrationFormData, SetupIntentHandle,
    SubmissionResult, ValidationError,
};

use crate::initializer::IntentReceiver;
use crate::payment::{Appearance, ElementsOptions, PaymentDetails, PaymentSdk, PaymentWidget};

/// Text shown while the setup intent handle is not available.
pub const LOADING_TEXT: &str = "Loading...";

/// Submit button label when idle.
pub const SUBMIT_LABEL: &str = "Purchase";

/// Submit button label while a submission is in flight.
pub const PROCESSING_LABEL: &str = "Processing...";

/// Where the orchestrator is in the submission sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Editable; submission allowed once the widget is mounted.
    Idle,
    /// Waiting for the payment provider.
    ConfirmingPayment,
    /// Waiting for the backend.
    FinalizingRegistration,
    /// Registration complete.
    Done,
}

/// What the registration page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationView {
    /// The setup intent handle is not available yet.
    Loading,
    /// The form and payment widget.
    Form(FormView),
}

/// The form as currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Field values.
    pub fields: RegistrationFormData,
    /// Options the payment widget is mounted with.
    pub widget: ElementsOptions,
    /// Whether the submit button is enabled.
    pub submit_enabled: bool,
    /// Submit button label.
    pub submit_label: &'static str,
    /// Error message, empty if none.
    pub error_message: String,
    /// Success message, empty if none.
    pub success_message: String,
    /// Current phase.
    pub phase: Phase,
}

#[derive(Debug)]
struct FormState {
    form: RegistrationFormData,
    widget: Option<PaymentWidget>,
    error_message: String,
    success_message: String,
    phase: Phase,
    confirmed: Option<PaymentMethodId>,
    /// Details captured after the setup was confirmed; never sent.
    ignored_capture: bool,
}

/// Clears the processing flag when the submission ends, however it ends.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one registration from form entry to finalization.
pub struct RegistrationOrchestrator {
    sdk: Arc<dyn PaymentSdk>,
    backend: RegistrationClient,
    intent: IntentReceiver,
    appearance: Appearance,
    price_id: PriceId,
    processing: AtomicBool,
    state: Mutex<FormState>,
}

impl RegistrationOrchestrator {
    /// Create an orchestrator with an empty form.
    ///
    /// # Arguments
    ///
    /// * `sdk` - The shared payment SDK
    /// * `backend` - Registration backend client
    /// * `intent` - Receiver the setup intent handle is published on
    #[must_use]
    pub fn new(
        sdk: Arc<dyn PaymentSdk>,
        backend: RegistrationClient,
        intent: IntentReceiver,
    ) -> Self {
        Self {
            sdk,
            backend,
            intent,
            appearance: Appearance::default(),
            price_id: PriceId::default(),
            processing: AtomicBool::new(false),
            state: Mutex::new(FormState {
                form: RegistrationFormData::new(),
                widget: None,
                error_message: String::new(),
                success_message: String::new(),
                phase: Phase::Idle,
                confirmed: None,
                ignored_capture: false,
            }),
        }
    }

    /// Set the payment widget appearance.
    #[must_use]
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Set the subscription price.
    #[must_use]
    pub fn with_price_id(mut self, price_id: PriceId) -> Self {
        self.price_id = price_id;
        self
    }

    /// Update one field by its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownField`] if `name` is not a form field.
    pub fn update_field(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let field: FormField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Update one field.
    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.state().form.set(field, value);
    }

    /// Current form values.
    #[must_use]
    pub fn form(&self) -> RegistrationFormData {
        self.state().form.clone()
    }

    /// Record payment details captured by the widget.
    ///
    /// Returns `false` if the widget is not mounted yet. Once the setup intent
    /// is confirmed its payment method is final, so details captured after
    /// that are recorded but not used.
    pub fn capture_payment(&self, details: PaymentDetails) -> bool {
        let mut state = self.state();
        if let Some(payment_method_id) = &state.confirmed {
            tracing::warn!(
                payment_method_id = %payment_method_id,
                "Setup already confirmed, new payment details will be ignored"
            );
            state.ignored_capture = true;
        }
        match self.mounted_widget(&mut state) {
            Some(widget) => {
                widget.capture(details);
                true
            }
            None => {
                tracing::warn!("Payment details captured before the widget was mounted");
                false
            }
        }
    }

    /// Wait until the setup intent handle is published.
    ///
    /// Returns `None` if the initializer went away without publishing one.
    pub async fn wait_until_ready(&self) -> Option<SetupIntentHandle> {
        let mut intent = self.intent.clone();
        let handle = intent.wait_for(Option::is_some).await.ok()?.clone();
        handle
    }

    /// Current view of the page.
    #[must_use]
    pub fn view(&self) -> RegistrationView {
        let mut state = self.state();
        let Some(widget) = self.mounted_widget(&mut state).map(|w| w.options().clone()) else {
            return RegistrationView::Loading;
        };

        let processing = self.is_processing();
        RegistrationView::Form(FormView {
            fields: state.form.clone(),
            widget,
            submit_enabled: !processing && state.phase != Phase::Done,
            submit_label: if processing { PROCESSING_LABEL } else { SUBMIT_LABEL },
            error_message: state.error_message.clone(),
            success_message: state.success_message.clone(),
            phase: state.phase,
        })
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    /// Current error message, empty if none.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.state().error_message.clone()
    }

    /// Current success message, empty if none.
    #[must_use]
    pub fn success_message(&self) -> String {
        self.state().success_message.clone()
    }

    /// Submit the registration.
    ///
    /// Returns `None` without doing anything if the widget is not mounted, a
    /// submission is already in flight, or the registration is complete.
    pub async fn submit(&self) -> Option<SubmissionResult> {
        let Some(_processing) = ProcessingGuard::acquire(&self.processing) else {
            tracing::debug!("Submission already in flight");
            return None;
        };

        let (form, request, confirmed) = {
            let mut state = self.state();
            if state.phase == Phase::Done {
                tracing::debug!("Registration already complete");
                return None;
            }
            let Some(request) = self
                .mounted_widget(&mut state)
                .map(|widget| widget.confirm_request())
            else {
                tracing::debug!("Payment widget not mounted, ignoring submit");
                return None;
            };

            if let Err(e) = state.form.validate() {
                tracing::debug!(error = %e, "Form rejected");
                let result = SubmissionResult::from(e);
                state.error_message = result.message().to_string();
                return Some(result);
            }

            state.phase = Phase::ConfirmingPayment;
            let confirmed = state.confirmed.clone().map(|id| (id, state.ignored_capture));
            (state.form.clone(), request, confirmed)
        };

        let payment_method_id = match confirmed {
            Some((payment_method_id, ignored_capture)) => {
                tracing::warn!(
                    payment_method_id = %payment_method_id,
                    ignored_capture,
                    "Reusing payment method confirmed by an earlier attempt"
                );
                payment_method_id
            }
            None => match self.sdk.confirm_setup(request).await {
                Ok(setup) => {
                    tracing::info!(
                        setup_intent = %setup.id,
                        payment_method_id = %setup.payment_method,
                        "Payment setup confirmed"
                    );
                    self.state().confirmed = Some(setup.payment_method.clone());
                    setup.payment_method
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Payment setup confirmation failed");
                    let result = SubmissionResult::payment_error(e.user_message());
                    let mut state = self.state();
                    state.error_message = result.message().to_string();
                    state.phase = Phase::Idle;
                    return Some(result);
                }
            },
        };

        self.state().phase = Phase::FinalizingRegistration;

        let request = ContinueRegistrationRequest {
            form,
            payment_method_id,
            price_id: self.price_id.clone(),
        };
        let outcome = self.backend.continue_registration(&request).await;

        let mut state = self.state();
        match outcome {
            Ok(response) => {
                tracing::info!(
                    payment_method_id = %request.payment_method_id,
                    backend_message = ?response.message,
                    "Registration and payment successful"
                );
                state.error_message.clear();
                state.success_message = SubmissionResult::Success.message().to_string();
                state.phase = Phase::Done;
                state.form = RegistrationFormData::new();
                Some(SubmissionResult::Success)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    payment_method_id = %request.payment_method_id,
                    "Registration failed after payment setup was confirmed"
                );
                let result =
                    SubmissionResult::backend_error(e.backend_message().map(String::from));
                state.error_message = result.message().to_string();
                state.phase = Phase::Idle;
                Some(result)
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mount the widget if the handle has arrived, and return it.
    fn mounted_widget<'s>(&self, state: &'s mut FormState) -> Option<&'s mut PaymentWidget> {
        if state.widget.is_none() {
            let handle = self.intent.borrow().clone()?;
            tracing::info!(theme = %self.appearance.theme, "Mounting payment widget");
            state.widget = Some(PaymentWidget::mount(handle, self.appearance.clone()));
        }
        state.widget.as_mut()
    }
}
