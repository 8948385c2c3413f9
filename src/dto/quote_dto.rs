use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::model::quote::QuoteSubmission;
use crate::quote::catalog::{self, FieldDescriptor, ServiceCode, CONTACT_FIELDS};
use crate::quote::validation::Issue;
use crate::quote::FieldValues;
use crate::util::text::humanize_key;

/// Converts a posted JSON object into wizard answers.
///
/// Strings are kept as-is, numbers and booleans are stringified, nulls and
/// nested values are ignored.
pub fn field_values_from_json(body: &Map<String, Value>) -> FieldValues {
    body.iter()
        .filter_map(|(name, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((name.clone(), text))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceSummary {
    pub code: ServiceCode,
    pub label: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl From<ServiceCode> for ServiceSummary {
    fn from(code: ServiceCode) -> Self {
        ServiceSummary { code, label: code.label(), fields: code.detail_fields() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub services: Vec<ServiceSummary>,
    pub contact_fields: &'static [FieldDescriptor],
    pub defaults: FieldValues,
}

impl CatalogResponse {
    pub fn build() -> Self {
        CatalogResponse {
            services: ServiceCode::ALL.into_iter().map(ServiceSummary::from).collect(),
            contact_fields: CONTACT_FIELDS,
            defaults: catalog::default_values(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepValidationRequest {
    #[serde(default)]
    pub values: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepValidationResponse {
    pub valid: bool,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListQuotesQuery {
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub id: Option<String>,
    pub service: String,
    pub service_label: Option<&'static str>,
    pub full_name: String,
    pub email: String,
    pub created_at: Option<String>,
}

impl From<&QuoteSubmission> for QuoteSummary {
    fn from(submission: &QuoteSubmission) -> Self {
        QuoteSummary {
            id: submission.id.map(|id| id.to_hex()),
            service: submission.service.clone(),
            service_label: submission.service_code().map(ServiceCode::label),
            full_name: submission.full_name.clone(),
            email: submission.email.clone(),
            created_at: submission.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteListResponse {
    pub items: Vec<QuoteSummary>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledAnswer {
    pub name: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerGroup {
    pub title: &'static str,
    pub answers: Vec<LabelledAnswer>,
}

/// Admin view of one submission, split into personal and service answers.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteDetailView {
    pub id: Option<String>,
    pub service: String,
    pub service_label: Option<&'static str>,
    pub created_at: Option<String>,
    pub groups: Vec<AnswerGroup>,
}

fn labelled(fields: &[FieldDescriptor], values: &FieldValues) -> Vec<LabelledAnswer> {
    fields
        .iter()
        .filter_map(|f| {
            let value = values.get(f.name).filter(|v| !v.is_empty())?;
            Some(LabelledAnswer { name: f.name.to_string(), label: f.label.to_string(), value: value.clone() })
        })
        .collect()
}

impl From<&QuoteSubmission> for QuoteDetailView {
    fn from(submission: &QuoteSubmission) -> Self {
        let values = submission.to_values();
        let service = submission.service_code();

        let mut details = match service {
            Some(code) => labelled(code.detail_fields(), &values),
            None => Vec::new(),
        };
        // Stored answers outside the service's table are still shown.
        let shown = |name: &str| name == catalog::SERVICE_FIELD || catalog::is_contact_field(name) || details.iter().any(|a| a.name == name);
        let extra: Vec<LabelledAnswer> = submission
            .details
            .iter()
            .filter(|(name, value)| !value.is_empty() && !shown(name))
            .map(|(name, value)| LabelledAnswer { name: name.clone(), label: humanize_key(name), value: value.clone() })
            .collect();
        details.extend(extra);

        QuoteDetailView {
            id: submission.id.map(|id| id.to_hex()),
            service: submission.service.clone(),
            service_label: service.map(ServiceCode::label),
            created_at: submission.created_at.clone(),
            groups: vec![
                AnswerGroup { title: "Personal Information", answers: labelled(CONTACT_FIELDS, &values) },
                AnswerGroup { title: "Service-Specific Details", answers: details },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_values_from_json() {
        let Value::Object(body) = json!({ "service": "rrsp", "rrsp_retirement_age": 65, "note": null, "nested": {} }) else {
            unreachable!()
        };
        let values = field_values_from_json(&body);
        assert_eq!(values.len(), 2);
        assert_eq!(values["rrsp_retirement_age"], "65");
    }

    #[test]
    fn test_detail_view_groups() {
        let values: FieldValues = [
            ("service", "life-insurance"),
            ("full_name", "Jane Doe"),
            ("email", "jane@example.com"),
            ("smoker", "No"),
            ("term_length", "20 years"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let view = QuoteDetailView::from(&QuoteSubmission::from_values(&values));

        assert_eq!(view.service_label, Some("Life Insurance"));
        let personal: Vec<_> = view.groups[0].answers.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(personal, vec!["Full Name", "Email Address"]);
        let details: Vec<_> = view.groups[1].answers.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(details, vec!["smoker", "term_length"]);
    }
}
