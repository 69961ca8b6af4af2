//! Process-wide payment SDK handle.
//!
//! The SDK client is created on first use and lives for the rest of the
//! process. Every orchestrator built afterwards receives the same instance.

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::sdk::SdkError;
use super::stripe::StripeSdk;

static STRIPE_SDK: OnceCell<Arc<StripeSdk>> = OnceCell::const_new();

/// Get the shared Stripe SDK, creating it on the first call.
///
/// Arguments are only read by the call that creates the client; later calls
/// return the existing instance unchanged.
///
/// # Errors
///
/// Returns an error if the client cannot be created. A failed creation is not
/// cached, so a later call may try again.
pub async fn shared_stripe_sdk(
    publishable_key: &str,
    api_base_url: &str,
) -> Result<Arc<StripeSdk>, SdkError> {
    STRIPE_SDK
        .get_or_try_init(|| async {
            let sdk = StripeSdk::new(publishable_key)?.with_base_url(api_base_url);
            tracing::info!(api_base_url = %api_base_url, "Stripe SDK loaded");
            Ok::<_, SdkError>(Arc::new(sdk))
        })
        .await
        .cloned()
}
