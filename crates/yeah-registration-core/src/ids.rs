//! Identifier types for the registration flow.
//!
//! # Macro-based ID Types
//!
//! The `string_id_type!` macro generates the opaque, provider-issued string
//! identifiers with consistent serialization, parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IdError;

/// Price identifier every registration subscribes to.
///
/// Fixed at build time; set `YEAH_PRICE_ID` when compiling to override it.
pub const DEFAULT_PRICE_ID: &str = match option_env!("YEAH_PRICE_ID") {
    Some(id) => id,
    None => "price_1Q4m4a2E0iO3DqVnjYwke4HA",
};

/// Macro to define a non-empty string identifier with standard trait implementations.
///
/// Generates:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as string)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`
macro_rules! string_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, rejecting empty input.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::Empty`] if `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(value))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id_type!(PaymentMethodId, "A verified payment method token (e.g. `pm_...`).\n\nProduced by the payment provider after a setup intent is confirmed.");
string_id_type!(PriceId, "A subscription price identifier (e.g. `price_...`).");

impl Default for PriceId {
    fn default() -> Self {
        Self(DEFAULT_PRICE_ID.to_string())
    }
}

/// The client secret of a server-issued setup intent.
///
/// Required to mount the payment widget and to confirm the setup. The value is
/// a secret: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SetupIntentHandle(String);

impl SetupIntentHandle {
    /// Marker separating the intent ID from the secret part.
    const SECRET_MARKER: &'static str = "_secret_";

    /// Wrap a client secret.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] if `secret` is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, IdError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(secret))
    }

    /// Return the raw client secret.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// The setup intent ID embedded in the secret (`seti_..._secret_...`).
    #[must_use]
    pub fn setup_intent_id(&self) -> Option<&str> {
        self.0
            .split_once(Self::SECRET_MARKER)
            .map(|(id, _)| id)
            .filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for SetupIntentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SetupIntentHandle(<redacted>)")
    }
}

impl TryFrom<String> for SetupIntentHandle {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SetupIntentHandle> for String {
    fn from(handle: SetupIntentHandle) -> Self {
        handle.0
    }
}
