//! Four-step quote wizard: service -> details -> contact -> review.
//!
//! The wizard only validates the fields of the step being left. The full
//! check happens once, in the submission collaborator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::model::quote::QuoteSubmission;
use crate::quote::catalog::{self, FieldDescriptor, ServiceCode, SERVICE_FIELD};
use crate::quote::submission::{QuoteSubmitter, SubmissionOutcome};
use crate::quote::validation::{self, Issue};
use crate::quote::FieldValues;
use crate::util::text::humanize_key;

pub const INCOMPLETE_STEP_MESSAGE: &str = "Please fill out all required fields before continuing.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Please check the form fields.";
pub const DEFAULT_CONFIRMATION_PATH: &str = "/quote-submitted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Service,
    ServiceDetails,
    ContactInfo,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] =
        [WizardStep::Service, WizardStep::ServiceDetails, WizardStep::ContactInfo, WizardStep::Review];

    pub fn index(self) -> usize {
        match self {
            WizardStep::Service => 0,
            WizardStep::ServiceDetails => 1,
            WizardStep::ContactInfo => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        WizardStep::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Service => "Service",
            WizardStep::ServiceDetails => "Details",
            WizardStep::ContactInfo => "About You",
            WizardStep::Review => "Submit",
        }
    }

    fn next(self) -> Option<Self> {
        WizardStep::from_index(self.index() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(WizardStep::from_index)
    }
}

/// Fields that must be valid before leaving `step`.
pub fn required_fields(step: WizardStep, service: Option<ServiceCode>) -> Vec<&'static str> {
    match step {
        WizardStep::Service => vec![SERVICE_FIELD],
        WizardStep::ServiceDetails => service.map(ServiceCode::detail_field_names).unwrap_or_default(),
        WizardStep::ContactInfo => catalog::contact_field_names(),
        WizardStep::Review => Vec::new(),
    }
}

/// Validates the fields of one step against a client-held value map.
pub fn validate_step(step: WizardStep, values: &FieldValues) -> Vec<Issue> {
    let service = values.get(SERVICE_FIELD).and_then(|s| s.parse().ok());
    validation::validate_fields(values, &required_fields(step, service))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("Incomplete Step: {}", INCOMPLETE_STEP_MESSAGE)]
    Incomplete { issues: Vec<Issue> },
    #[error("Already at the review step")]
    AtLastStep,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Quotes can only be submitted from the review step")]
    NotAtReview,
    #[error("Submission Failed: {message}")]
    Rejected { message: String, issues: Vec<Issue> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub redirect_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub name: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct QuoteWizard {
    current_step: WizardStep,
    values: FieldValues,
    errors: BTreeMap<String, String>,
}

impl Default for QuoteWizard {
    fn default() -> Self {
        QuoteWizard::new()
    }
}

impl QuoteWizard {
    pub fn new() -> Self {
        QuoteWizard {
            current_step: WizardStep::Service,
            values: catalog::default_values(),
            errors: BTreeMap::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn selected_service(&self) -> Option<ServiceCode> {
        self.value(SERVICE_FIELD).and_then(|s| s.parse().ok())
    }

    /// Percentage shown by the progress bar.
    pub fn progress(&self) -> f32 {
        (self.current_step.index() + 1) as f32 / WizardStep::ALL.len() as f32 * 100.0
    }

    /// Stores an answer and returns the details fields visible afterwards,
    /// since changing a gating answer shows or hides its follow-up.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Vec<&'static FieldDescriptor> {
        self.values.insert(name.to_string(), value.into());
        self.errors.remove(name);
        self.visible_fields()
    }

    /// Details-step fields of the selected service that are currently shown.
    pub fn visible_fields(&self) -> Vec<&'static FieldDescriptor> {
        match self.selected_service() {
            Some(service) => service.detail_fields().iter().filter(|f| f.is_visible(&self.values)).collect(),
            None => Vec::new(),
        }
    }

    pub fn required_fields(&self) -> Vec<&'static str> {
        required_fields(self.current_step, self.selected_service())
    }

    /// Validates the current step and moves forward when it is complete.
    pub fn next_step(&mut self) -> Result<WizardStep, StepError> {
        let next = self.current_step.next().ok_or(StepError::AtLastStep)?;
        let fields = self.required_fields();
        for name in &fields {
            self.errors.remove(*name);
        }

        let issues = validation::validate_fields(&self.values, &fields);
        if !issues.is_empty() {
            debug!(step = ?self.current_step, count = issues.len(), "Step incomplete");
            self.attach_issues(&issues);
            return Err(StepError::Incomplete { issues });
        }

        self.current_step = next;
        Ok(next)
    }

    /// Goes back one step without revalidating or clearing anything.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self.current_step
    }

    /// Non-empty answers as label/value pairs: the service and its details
    /// first, then contact fields, then anything else held in the form.
    pub fn review_entries(&self) -> Vec<ReviewEntry> {
        let mut ordered: Vec<&str> = vec![SERVICE_FIELD];
        if let Some(service) = self.selected_service() {
            ordered.extend(service.detail_field_names());
        }
        ordered.extend(catalog::contact_field_names());
        let rest = self.values.keys().map(String::as_str).filter(|k| !ordered.contains(k)).collect::<Vec<_>>();
        ordered.extend(rest);

        ordered
            .into_iter()
            .filter_map(|name| {
                let value = self.values.get(name)?;
                if value.trim().is_empty() {
                    return None;
                }
                Some(ReviewEntry { name: name.to_string(), label: humanize_key(name), value: value.clone() })
            })
            .collect()
    }

    pub fn to_submission(&self) -> QuoteSubmission {
        QuoteSubmission::from_values(&self.values)
    }

    /// Sends the collected answers to `submitter`.
    ///
    /// The wizard stays mutably borrowed while the call is pending, so a second
    /// submit cannot overlap it. Dropping the future leaves the wizard as it was.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<Confirmation, SubmitError>
    where
        S: QuoteSubmitter + ?Sized,
    {
        if self.current_step != WizardStep::Review {
            return Err(SubmitError::NotAtReview);
        }
        info!(service = ?self.selected_service(), "Submitting quote");
        let outcome = submitter.submit(self.to_submission()).await;
        self.apply_outcome(outcome)
    }

    /// Interprets the collaborator's reply, attaching field issues on failure.
    pub fn apply_outcome(&mut self, outcome: SubmissionOutcome) -> Result<Confirmation, SubmitError> {
        if outcome.success {
            let redirect_to = outcome.redirect_to.unwrap_or_else(|| DEFAULT_CONFIRMATION_PATH.to_string());
            info!(redirect_to = %redirect_to, "Quote accepted");
            return Ok(Confirmation { redirect_to });
        }

        let message = outcome.message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        let issues = outcome.issues.unwrap_or_default();
        warn!(message = %message, issues = issues.len(), "Quote rejected");
        self.attach_issues(&issues);
        Err(SubmitError::Rejected { message, issues })
    }

    fn attach_issues(&mut self, issues: &[Issue]) {
        for issue in issues {
            if let Some(field) = issue.field() {
                self.errors.insert(field.to_string(), issue.message.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingSubmitter {
        outcome: SubmissionOutcome,
        received: Mutex<Vec<QuoteSubmission>>,
    }

    #[async_trait]
    impl QuoteSubmitter for RecordingSubmitter {
        async fn submit(&self, submission: QuoteSubmission) -> SubmissionOutcome {
            self.received.lock().unwrap().push(submission);
            self.outcome.clone()
        }
    }

    struct StalledSubmitter;

    #[async_trait]
    impl QuoteSubmitter for StalledSubmitter {
        async fn submit(&self, _submission: QuoteSubmission) -> SubmissionOutcome {
            std::future::pending().await
        }
    }

    fn wizard_at_review() -> QuoteWizard {
        let mut wizard = QuoteWizard::new();
        wizard.set_value("service", "life-insurance");
        wizard.next_step().unwrap();
        for (name, value) in [
            ("gender", "Female"),
            ("coverage_amount_life", "$500,000"),
            ("term_length", "20 years"),
        ] {
            wizard.set_value(name, value);
        }
        wizard.next_step().unwrap();
        for (name, value) in [
            ("full_name", "Jane Doe"),
            ("dob", "1990-01-01"),
            ("email", "jane@example.com"),
            ("phone", "5551234567"),
            ("city_province", "Toronto, ON"),
        ] {
            wizard.set_value(name, value);
        }
        wizard.next_step().unwrap();
        wizard
    }

    #[test]
    fn test_required_fields_per_step() {
        assert_eq!(required_fields(WizardStep::Service, None), vec!["service"]);
        assert!(required_fields(WizardStep::ServiceDetails, None).is_empty());
        assert_eq!(
            required_fields(WizardStep::ContactInfo, Some(ServiceCode::Resp)),
            vec!["full_name", "dob", "email", "phone", "city_province"]
        );
        assert!(required_fields(WizardStep::Review, Some(ServiceCode::Resp)).is_empty());
    }

    #[test]
    fn test_service_detail_fields_for_every_service() {
        let expected: [(ServiceCode, &[&str]); 9] = [
            (
                ServiceCode::LifeInsurance,
                &[
                    "gender",
                    "smoker",
                    "coverage_amount_life",
                    "term_length",
                    "pre_existing_conditions",
                    "smoker_details",
                    "conditions_details_life",
                ],
            ),
            (
                ServiceCode::VisitorInsurance,
                &[
                    "coverage_start_date_visitor",
                    "coverage_end_date_visitor",
                    "coverage_amount_visitor",
                    "pre_existing_conditions",
                    "conditions_details_visitor",
                    "purpose_of_visit",
                ],
            ),
            (
                ServiceCode::SuperVisaInsurance,
                &[
                    "coverage_amount_super_visa",
                    "pre_existing_conditions",
                    "conditions_details_super_visa",
                    "coverage_duration_super_visa",
                    "relationship_to_applicant",
                ],
            ),
            (
                ServiceCode::Resp,
                &["resp_contribution_goal", "resp_investment_horizon", "resp_has_savings", "resp_savings_amount"],
            ),
            (
                ServiceCode::Tfsa,
                &[
                    "tfsa_annual_contribution",
                    "tfsa_investment_style",
                    "tfsa_has_existing",
                    "tfsa_existing_amount",
                    "tfsa_start_contribution",
                ],
            ),
            (
                ServiceCode::Rrsp,
                &[
                    "rrsp_retirement_age",
                    "rrsp_annual_contribution",
                    "rrsp_investment_style",
                    "rrsp_has_existing",
                    "rrsp_existing_balance",
                    "rrsp_start_advice",
                ],
            ),
            (
                ServiceCode::HealthDental,
                &[
                    "health_has_existing_plan",
                    "health_existing_coverage_details",
                    "health_coverage_need",
                    "health_who_needs_coverage",
                ],
            ),
            (
                ServiceCode::TravelInsuranceCanadians,
                &[
                    "travel_destination",
                    "travel_start_date",
                    "travel_end_date",
                    "travel_coverage_amount",
                    "travel_pre_existing_conditions",
                    "travel_conditions_details",
                ],
            ),
            (
                ServiceCode::InternationalStudentsPlan,
                &[
                    "international_school_name",
                    "international_coverage_start_date",
                    "international_coverage_end_date",
                    "international_coverage_amount",
                    "international_pre_existing_conditions",
                    "international_conditions_details",
                ],
            ),
        ];

        for (code, fields) in expected {
            assert_eq!(required_fields(WizardStep::ServiceDetails, Some(code)), fields.to_vec(), "{code}");
        }
    }

    #[test]
    fn test_cannot_leave_service_step_without_service() {
        let mut wizard = QuoteWizard::new();
        let err = wizard.next_step().unwrap_err();
        assert!(matches!(err, StepError::Incomplete { .. }));
        assert_eq!(wizard.current_step(), WizardStep::Service);
        assert_eq!(wizard.error("service"), Some("Please select a service."));
    }

    #[test]
    fn test_details_step_rejects_missing_field() {
        let mut wizard = QuoteWizard::new();
        wizard.set_value("service", "life-insurance");
        wizard.next_step().unwrap();
        wizard.set_value("gender", "Male");
        wizard.set_value("coverage_amount_life", "$100,000");

        assert!(wizard.next_step().is_err());
        assert_eq!(wizard.current_step(), WizardStep::ServiceDetails);
        assert_eq!(wizard.error("term_length"), Some("Term length is required."));
        assert!(wizard.error("gender").is_none());
    }

    #[test]
    fn test_gate_change_updates_visible_fields() {
        let mut wizard = QuoteWizard::new();
        wizard.set_value("service", "tfsa");
        let names = |fields: Vec<&FieldDescriptor>| fields.iter().map(|f| f.name).collect::<Vec<_>>();

        let visible = names(wizard.visible_fields());
        assert!(visible.contains(&"tfsa_start_contribution"));
        assert!(!visible.contains(&"tfsa_existing_amount"));

        let visible = names(wizard.set_value("tfsa_has_existing", "Yes"));
        assert!(visible.contains(&"tfsa_existing_amount"));
        assert!(!visible.contains(&"tfsa_start_contribution"));
    }

    #[test]
    fn test_back_keeps_values() {
        let mut wizard = QuoteWizard::new();
        wizard.set_value("service", "resp");
        wizard.next_step().unwrap();
        assert_eq!(wizard.back(), WizardStep::Service);
        assert_eq!(wizard.back(), WizardStep::Service);
        assert_eq!(wizard.value("service"), Some("resp"));
    }

    #[test]
    fn test_review_entries() {
        let wizard = wizard_at_review();
        let entries = wizard.review_entries();
        assert_eq!(entries[0].label, "Service");
        assert_eq!(entries[0].value, "life-insurance");
        let city = entries.iter().find(|e| e.name == "city_province").unwrap();
        assert_eq!(city.label, "City Province");
        assert!(entries.iter().all(|e| !e.value.is_empty()));
        assert!(entries.iter().all(|e| e.name != "smoker_details"));
    }

    #[test]
    fn test_progress() {
        let mut wizard = QuoteWizard::new();
        assert_eq!(wizard.progress(), 25.0);
        wizard.set_value("service", "rrsp");
        wizard.next_step().unwrap();
        assert_eq!(wizard.progress(), 50.0);
    }

    #[tokio::test]
    async fn test_submit_success_redirects() {
        let mut wizard = wizard_at_review();
        let submitter = RecordingSubmitter {
            outcome: SubmissionOutcome::accepted("/quote-submitted"),
            received: Mutex::new(Vec::new()),
        };
        let confirmation = wizard.submit(&submitter).await.unwrap();
        assert_eq!(confirmation.redirect_to, "/quote-submitted");

        let received = submitter.received.lock().unwrap();
        assert_eq!(received[0].service, "life-insurance");
        assert_eq!(received[0].details.get("smoker").map(String::as_str), Some("No"));
    }

    #[tokio::test]
    async fn test_abandoned_submit_does_not_block_retry() {
        use futures::FutureExt;

        let mut wizard = wizard_at_review();
        assert!(wizard.submit(&StalledSubmitter).now_or_never().is_none());
        assert_eq!(wizard.current_step(), WizardStep::Review);

        let submitter = RecordingSubmitter {
            outcome: SubmissionOutcome::accepted("/quote-submitted"),
            received: Mutex::new(Vec::new()),
        };
        let confirmation = wizard.submit(&submitter).await.unwrap();
        assert_eq!(confirmation.redirect_to, "/quote-submitted");
        assert_eq!(submitter.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_attaches_issues() {
        let mut wizard = wizard_at_review();
        let submitter = RecordingSubmitter {
            outcome: SubmissionOutcome {
                success: false,
                message: None,
                issues: Some(vec![Issue::new("email", "Invalid email address.")]),
                redirect_to: None,
            },
            received: Mutex::new(Vec::new()),
        };
        let err = wizard.submit(&submitter).await.unwrap_err();
        match err {
            SubmitError::Rejected { message, issues } => {
                assert_eq!(message, DEFAULT_FAILURE_MESSAGE);
                assert_eq!(issues.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(wizard.error("email"), Some("Invalid email address."));
        assert_eq!(wizard.current_step(), WizardStep::Review);
    }

    #[tokio::test]
    async fn test_submit_requires_review_step() {
        let mut wizard = QuoteWizard::new();
        let submitter = RecordingSubmitter {
            outcome: SubmissionOutcome::accepted("/done"),
            received: Mutex::new(Vec::new()),
        };
        assert_eq!(wizard.submit(&submitter).await, Err(SubmitError::NotAtReview));
    }
}
