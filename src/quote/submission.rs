use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::quote::QuoteSubmission;
use crate::quote::validation::Issue;

/// Reply of the submission collaborator.
///
/// `{ "success": true }` on success; on failure an optional form-level
/// `message` and optional field-level `issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
    /// Confirmation page the client should navigate to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl SubmissionOutcome {
    pub fn accepted(redirect_to: impl Into<String>) -> Self {
        SubmissionOutcome { success: true, message: None, issues: None, redirect_to: Some(redirect_to.into()) }
    }

    pub fn rejected(message: impl Into<String>, issues: Vec<Issue>) -> Self {
        SubmissionOutcome {
            success: false,
            message: Some(message.into()),
            issues: if issues.is_empty() { None } else { Some(issues) },
            redirect_to: None,
        }
    }

    /// Failure with no field-level detail, e.g. a storage error.
    pub fn failed(message: impl Into<String>) -> Self {
        SubmissionOutcome::rejected(message, Vec::new())
    }
}

/// Validates and persists a finished quote.
#[async_trait]
pub trait QuoteSubmitter: Send + Sync {
    async fn submit(&self, submission: QuoteSubmission) -> SubmissionOutcome;
}
