//! YEAH continue-registration - command-line front end.
//!
//! Collects the customer details from the command line, confirms the payment
//! method captured by the hosted widget and finalizes the registration.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yeah_registration::orchestrator::LOADING_TEXT;
use yeah_registration::payment::shared_stripe_sdk;
use yeah_registration::{
    IntentInitializer, PaymentDetails, RegistrationConfig, RegistrationOrchestrator,
};
use yeah_registration_client::RegistrationClient;
use yeah_registration_core::FormField;

/// Continue a YEAH registration with a payment method.
#[derive(Debug, Parser)]
#[command(name = "yeah-register", version)]
struct Args {
    /// Contact email.
    #[arg(long, default_value = "")]
    email: String,
    /// Company name.
    #[arg(long, default_value = "")]
    company_name: String,
    /// Contact first name.
    #[arg(long, default_value = "")]
    first_name: String,
    /// Contact last name.
    #[arg(long, default_value = "")]
    last_name: String,
    /// Contact phone number.
    #[arg(long, default_value = "")]
    phone: String,
    /// Business activity.
    #[arg(long, default_value = "")]
    activity: String,
    /// Industry.
    #[arg(long, default_value = "")]
    industry: String,
    /// Number of clients.
    #[arg(long, default_value = "")]
    number_of_clients: String,
    /// Payment method captured by the hosted payment widget (e.g. `pm_card_visa`).
    #[arg(long, env = "YEAH_PAYMENT_METHOD")]
    payment_method: String,
}

impl Args {
    fn fields(&self) -> [(FormField, &str); 8] {
        [
            (FormField::Email, self.email.as_str()),
            (FormField::CompanyName, self.company_name.as_str()),
            (FormField::FirstName, self.first_name.as_str()),
            (FormField::LastName, self.last_name.as_str()),
            (FormField::Phone, self.phone.as_str()),
            (FormField::Activity, self.activity.as_str()),
            (FormField::Industry, self.industry.as_str()),
            (FormField::NumberOfClients, self.number_of_clients.as_str()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,yeah_registration=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration from environment
    let config = RegistrationConfig::from_env();

    tracing::info!(
        api_base_url = %config.api_base_url,
        stripe_api_base_url = %config.stripe_api_base_url,
        theme = %config.theme,
        stripe_configured = %config.stripe_publishable_key.is_some(),
        "Registration configuration loaded"
    );

    let backend = RegistrationClient::with_options(&config.api_base_url, config.client_options())?;
    let sdk = shared_stripe_sdk(config.publishable_key()?, &config.stripe_api_base_url).await?;

    let (initializer, intent) = IntentInitializer::new(backend.clone());
    let orchestrator =
        RegistrationOrchestrator::new(sdk, backend, intent).with_appearance(config.appearance());

    for (field, value) in args.fields() {
        orchestrator.set_field(field, value);
    }

    println!("{LOADING_TEXT}");
    tokio::spawn(async move {
        initializer.activate().await;
    });

    if orchestrator.wait_until_ready().await.is_none() {
        return Err("setup intent unavailable; reload to try again".into());
    }

    orchestrator.capture_payment(PaymentDetails::payment_method(args.payment_method));

    match orchestrator.submit().await {
        Some(result) if result.is_success() => {
            println!("{}", result.message());
            Ok(())
        }
        Some(result) => Err(result.message().to_string().into()),
        None => Err("submission was not started".into()),
    }
}
