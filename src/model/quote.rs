use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::quote::catalog::{self, ServiceCode, SERVICE_FIELD};
use crate::quote::FieldValues;

/// A stored quote request.
///
/// The record is flat: contact fields are explicit, and the answers to the
/// service-specific questions are flattened next to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSubmission {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub service: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city_province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, String>,
}

impl QuoteSubmission {
    /// Builds a record from wizard answers. Empty fields and fields that do
    /// not belong to the selected service are dropped.
    pub fn from_values(values: &FieldValues) -> Self {
        let take = |name: &str| values.get(name).map(|v| v.trim().to_string()).unwrap_or_default();
        let service = values.get(SERVICE_FIELD).and_then(|s| s.parse::<ServiceCode>().ok());
        let belongs = |name: &str| match service {
            Some(code) => code.detail_field(name).is_some(),
            None => catalog::known_field(name) && name != SERVICE_FIELD && !catalog::is_contact_field(name),
        };
        let details = values
            .iter()
            .filter(|(name, value)| !value.trim().is_empty() && belongs(name))
            .map(|(name, value)| (name.clone(), value.trim().to_string()))
            .collect();

        QuoteSubmission {
            id: None,
            service: take(SERVICE_FIELD),
            full_name: take("full_name"),
            dob: take("dob"),
            email: take("email"),
            phone: take("phone"),
            city_province: take("city_province"),
            created_at: None,
            details,
        }
    }

    pub fn to_values(&self) -> FieldValues {
        let mut values = self.details.clone();
        let fixed = [
            (SERVICE_FIELD, &self.service),
            ("full_name", &self.full_name),
            ("dob", &self.dob),
            ("email", &self.email),
            ("phone", &self.phone),
            ("city_province", &self.city_province),
        ];
        for (name, value) in fixed {
            if !value.is_empty() {
                values.insert(name.to_string(), value.clone());
            }
        }
        values
    }

    pub fn service_code(&self) -> Option<ServiceCode> {
        self.service.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_drops_unknown_and_empty() {
        let values: FieldValues = [
            ("service", "tfsa"),
            ("full_name", " Jane Doe "),
            ("tfsa_investment_style", "Growth"),
            ("tfsa_existing_amount", ""),
            ("favourite_colour", "green"),
            ("smoker", "No"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let submission = QuoteSubmission::from_values(&values);
        assert_eq!(submission.service, "tfsa");
        assert_eq!(submission.full_name, "Jane Doe");
        assert_eq!(submission.details.len(), 1);
        assert_eq!(submission.details.get("tfsa_investment_style").map(String::as_str), Some("Growth"));
        assert_eq!(submission.service_code(), Some(ServiceCode::Tfsa));
    }

    #[test]
    fn test_serializes_flat() {
        let mut submission = QuoteSubmission::from_values(&FieldValues::new());
        submission.service = "resp".to_string();
        submission.details.insert("resp_has_savings".to_string(), "No".to_string());
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["service"], "resp");
        assert_eq!(json["resp_has_savings"], "No");
        assert!(json.get("_id").is_none());
        assert!(json.get("details").is_none());
    }
}
