use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use validator::Validate;

use crate::model::quote::QuoteSubmission;
use crate::quote::catalog::{self, ServiceCode, CONTACT_FIELDS, SERVICE_FIELD};
use crate::quote::FieldValues;

/// A single validation failure. `path` holds the field name as its first segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Issue { path: vec![field.to_string()], message: message.into() }
    }

    /// Field the issue should be attached to.
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// Which services have their detail rules enforced when a quote is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Every service's detail fields are checked.
    #[default]
    Strict,
    /// Only life and visitor insurance carry detail rules; the other services
    /// rely on the wizard's step gating.
    Legacy,
}

impl ValidationMode {
    pub fn enforces(self, service: ServiceCode) -> bool {
        match self {
            ValidationMode::Strict => true,
            ValidationMode::Legacy => matches!(service, ServiceCode::LifeInsurance | ServiceCode::VisitorInsurance),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "legacy" => Ok(ValidationMode::Legacy),
            other => Err(format!("Unknown validation mode: {}", other)),
        }
    }
}

#[derive(Debug, Validate)]
struct ContactDetails {
    #[validate(length(min = 1, message = "Full name is required."))]
    full_name: String,
    #[validate(length(min = 1, message = "Date of birth is required."))]
    dob: String,
    #[validate(email(message = "Invalid email address."))]
    email: String,
    #[validate(length(min = 1, message = "Phone number is required."))]
    phone: String,
    #[validate(length(min = 1, message = "City/Province is required."))]
    city_province: String,
}

impl ContactDetails {
    fn from_values(values: &FieldValues) -> Self {
        let take = |name: &str| values.get(name).map(|v| v.trim().to_string()).unwrap_or_default();
        ContactDetails {
            full_name: take("full_name"),
            dob: take("dob"),
            email: take("email"),
            phone: take("phone"),
            city_province: take("city_province"),
        }
    }
}

fn is_blank(values: &FieldValues, name: &str) -> bool {
    values.get(name).map_or(true, |v| v.trim().is_empty())
}

fn contact_issues(values: &FieldValues, names: &[&str]) -> Vec<Issue> {
    let errors = match ContactDetails::from_values(values).validate() {
        Ok(()) => return Vec::new(),
        Err(errors) => errors,
    };
    let field_errors = errors.field_errors();
    // Report in form order, not hash order.
    CONTACT_FIELDS
        .iter()
        .filter(|f| names.contains(&f.name))
        .filter_map(|f| {
            let first = field_errors.get(f.name)?.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| f.required_message.to_string());
            Some(Issue::new(f.name, message))
        })
        .collect()
}

/// Validates the named fields against `values`.
///
/// Detail fields are looked up in the selected service's table; a follow-up
/// whose gate does not hold is hidden and never reported.
pub fn validate_fields(values: &FieldValues, names: &[&str]) -> Vec<Issue> {
    let service = values.get(SERVICE_FIELD).and_then(|s| s.parse::<ServiceCode>().ok());
    let mut issues = Vec::new();

    for name in names {
        if *name == SERVICE_FIELD {
            if service.is_none() {
                issues.push(Issue::new(SERVICE_FIELD, "Please select a service."));
            }
            continue;
        }
        if catalog::is_contact_field(name) {
            continue;
        }
        let Some(descriptor) = service.and_then(|code| code.detail_field(name)) else {
            debug!(field = %name, "Field not part of the selected service, skipping");
            continue;
        };
        if descriptor.is_visible(values) && is_blank(values, name) {
            issues.push(Issue::new(name, descriptor.required_message));
        }
    }

    issues.extend(contact_issues(values, names));
    issues
}

/// Full check of a submission before it is stored.
pub fn validate_submission(submission: &QuoteSubmission, mode: ValidationMode) -> Vec<Issue> {
    let values = submission.to_values();
    let mut names = vec![SERVICE_FIELD];
    if let Some(service) = submission.service_code() {
        if mode.enforces(service) {
            names.extend(service.detail_field_names());
        }
    }
    names.extend(catalog::contact_field_names());
    validate_fields(&values, &names)
}
