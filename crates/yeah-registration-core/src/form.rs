//! Registration form state.
//!
//! The form holds the customer details collected alongside the payment method.
//! Values are kept as entered; the only checks are the declarative input rules
//! (required, email, number) applied by [`RegistrationFormData::validate`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Declarative input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Free text.
    Text,
    /// Email address.
    Email,
    /// Non-negative integer.
    Number,
}

/// A field of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    /// Contact email.
    Email,
    /// Company name.
    CompanyName,
    /// Contact first name.
    FirstName,
    /// Contact last name.
    LastName,
    /// Contact phone number.
    Phone,
    /// Business activity.
    Activity,
    /// Industry.
    Industry,
    /// Number of clients the business serves.
    NumberOfClients,
}

impl FormField {
    /// All fields, in display order.
    pub const ALL: [Self; 8] = [
        Self::Email,
        Self::CompanyName,
        Self::FirstName,
        Self::LastName,
        Self::Phone,
        Self::Activity,
        Self::Industry,
        Self::NumberOfClients,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::CompanyName => "companyName",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::Activity => "activity",
            Self::Industry => "industry",
            Self::NumberOfClients => "numberOfClients",
        }
    }

    /// Human label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::CompanyName => "Company Name",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Phone => "Phone",
            Self::Activity => "Activity",
            Self::Industry => "Industry",
            Self::NumberOfClients => "Number Of Clients",
        }
    }

    /// Declarative input kind.
    #[must_use]
    pub const fn input_kind(self) -> InputKind {
        match self {
            Self::Email => InputKind::Email,
            Self::NumberOfClients => InputKind::Number,
            _ => InputKind::Text,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// Customer details entered on the registration form.
///
/// Serializes with the camelCase field names the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFormData {
    /// Contact email.
    pub email: String,
    /// Company name.
    pub company_name: String,
    /// Contact first name.
    pub first_name: String,
    /// Contact last name.
    pub last_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Business activity.
    pub activity: String,
    /// Industry.
    pub industry: String,
    /// Number of clients, as entered.
    pub number_of_clients: String,
}

impl RegistrationFormData {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current value of a field.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::CompanyName => &self.company_name,
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Phone => &self.phone,
            FormField::Activity => &self.activity,
            FormField::Industry => &self.industry,
            FormField::NumberOfClients => &self.number_of_clients,
        }
    }

    /// Replace the value of one field, leaving the others untouched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Email => &mut self.email,
            FormField::CompanyName => &mut self.company_name,
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Phone => &mut self.phone,
            FormField::Activity => &mut self.activity,
            FormField::Industry => &mut self.industry,
            FormField::NumberOfClients => &mut self.number_of_clients,
        };
        *slot = value.into();
    }

    /// Check the declarative input rules, in field order.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in FormField::ALL {
            let value = self.get(field);
            if value.is_empty() {
                return Err(ValidationError::Missing { field });
            }

            match field.input_kind() {
                InputKind::Email if !looks_like_email(value.trim()) => {
                    return Err(ValidationError::InvalidEmail);
                }
                InputKind::Number if !is_whole_number(value) => {
                    return Err(ValidationError::InvalidNumber { field });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// A number input with the default step of 1: any finite whole number,
/// negative and exponent forms included.
fn is_whole_number(value: &str) -> bool {
    if value.starts_with('+') {
        return false;
    }
    value
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n.fract() == 0.0)
}
