//! Contact form fields and validation rules

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Field name -> first validation message
pub type FieldErrors = BTreeMap<ContactField, String>;

/// Values of a contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Addressable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
    Company,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Message => "message",
            ContactField::Company => "company",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(ContactField::Name),
            "email" => Some(ContactField::Email),
            "phone" => Some(ContactField::Phone),
            "message" => Some(ContactField::Message),
            "company" => Some(ContactField::Company),
            _ => None,
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContactForm {
    /// Run every rule and collect one message per failing field
    pub fn check(&self) -> Result<(), FieldErrors> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let mut fields = FieldErrors::new();
        for (name, failures) in errors.field_errors() {
            let Some(field) = ContactField::parse(&name) else {
                continue;
            };
            let message = failures
                .first()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .unwrap_or_else(|| "Invalid value".to_string());
            fields.insert(field, message);
        }
        Err(fields)
    }

    /// Set a field from user input. Empty optional fields become `None`.
    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = (!value.is_empty()).then_some(value),
            ContactField::Message => self.message = value,
            ContactField::Company => self.company = (!value.is_empty()).then_some(value),
        }
    }

    /// Non-empty `(field, value)` pairs in declaration order
    pub fn filled_fields(&self) -> Vec<(&'static str, String)> {
        let fields = [
            (ContactField::Name, Some(&self.name)),
            (ContactField::Email, Some(&self.email)),
            (ContactField::Phone, self.phone.as_ref()),
            (ContactField::Message, Some(&self.message)),
            (ContactField::Company, self.company.as_ref()),
        ];
        fields
            .into_iter()
            .filter_map(|(field, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (field.as_str(), v.clone()))
            })
            .collect()
    }
}
