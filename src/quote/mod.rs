//! Quote request domain: the service catalogue, its validation rules and the
//! four-step wizard that collects a submission.

pub mod catalog;
pub mod validation;
pub mod wizard;
pub mod submission;

use std::collections::BTreeMap;

/// Flat field name -> answer map held while a quote is being filled in.
pub type FieldValues = BTreeMap<String, String>;

pub use catalog::{FieldDescriptor, FieldKind, ServiceCode, Visibility};
pub use submission::{QuoteSubmitter, SubmissionOutcome};
pub use validation::{Issue, ValidationMode};
pub use wizard::{QuoteWizard, WizardStep};
