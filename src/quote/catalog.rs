//! Static description of the quote services and the fields each one collects.
//!
//! Every service is data: an ordered list of [`FieldDescriptor`]s. Adding a
//! service means adding a table, not a new branch in the wizard or validator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::quote::FieldValues;

/// Sentinel answers of the boolean-like gating fields.
pub const YES: &str = "Yes";
pub const NO: &str = "No";

const YES_NO: &[&str] = &[YES, NO];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCode {
    LifeInsurance,
    VisitorInsurance,
    SuperVisaInsurance,
    Resp,
    Tfsa,
    Rrsp,
    HealthDental,
    TravelInsuranceCanadians,
    InternationalStudentsPlan,
}

impl ServiceCode {
    pub const ALL: [ServiceCode; 9] = [
        ServiceCode::LifeInsurance,
        ServiceCode::VisitorInsurance,
        ServiceCode::SuperVisaInsurance,
        ServiceCode::Resp,
        ServiceCode::Tfsa,
        ServiceCode::Rrsp,
        ServiceCode::HealthDental,
        ServiceCode::TravelInsuranceCanadians,
        ServiceCode::InternationalStudentsPlan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCode::LifeInsurance => "life-insurance",
            ServiceCode::VisitorInsurance => "visitor-insurance",
            ServiceCode::SuperVisaInsurance => "super-visa-insurance",
            ServiceCode::Resp => "resp",
            ServiceCode::Tfsa => "tfsa",
            ServiceCode::Rrsp => "rrsp",
            ServiceCode::HealthDental => "health-dental",
            ServiceCode::TravelInsuranceCanadians => "travel-insurance-canadians",
            ServiceCode::InternationalStudentsPlan => "international-students-plan",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceCode::LifeInsurance => "Life Insurance",
            ServiceCode::VisitorInsurance => "Visitor Insurance",
            ServiceCode::SuperVisaInsurance => "Supervisa Insurance",
            ServiceCode::Resp => "RESP (Registered Education Savings Plan)",
            ServiceCode::Tfsa => "TFSA (Tax-Free Savings Account)",
            ServiceCode::Rrsp => "RRSP (Registered Retirement Savings Plan)",
            ServiceCode::HealthDental => "Extended Health and Dental Plan",
            ServiceCode::TravelInsuranceCanadians => "Travel Insurance for Canadians",
            ServiceCode::InternationalStudentsPlan => "International Students Plan",
        }
    }

    /// Ordered service-specific fields collected on the details step.
    pub fn detail_fields(self) -> &'static [FieldDescriptor] {
        match self {
            ServiceCode::LifeInsurance => LIFE_INSURANCE,
            ServiceCode::VisitorInsurance => VISITOR_INSURANCE,
            ServiceCode::SuperVisaInsurance => SUPER_VISA_INSURANCE,
            ServiceCode::Resp => RESP,
            ServiceCode::Tfsa => TFSA,
            ServiceCode::Rrsp => RRSP,
            ServiceCode::HealthDental => HEALTH_DENTAL,
            ServiceCode::TravelInsuranceCanadians => TRAVEL_INSURANCE_CANADIANS,
            ServiceCode::InternationalStudentsPlan => INTERNATIONAL_STUDENTS_PLAN,
        }
    }

    pub fn detail_field_names(self) -> Vec<&'static str> {
        self.detail_fields().iter().map(|f| f.name).collect()
    }

    pub fn detail_field(self, name: &str) -> Option<&'static FieldDescriptor> {
        self.detail_fields().iter().find(|f| f.name == name)
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("Unknown service code: {}", s))
    }
}

/// Input control used to collect a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Date,
    Number,
    LongText,
    Select(&'static [&'static str]),
    Radio(&'static [&'static str]),
}

/// When a field is shown, and therefore required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Visibility {
    Always,
    Equals { gate: &'static str, value: &'static str },
}

impl Visibility {
    pub fn holds(&self, values: &FieldValues) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::Equals { gate, value } => values.get(*gate).map(String::as_str) == Some(*value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub visibility: Visibility,
    pub required_message: &'static str,
}

impl FieldDescriptor {
    pub fn is_visible(&self, values: &FieldValues) -> bool {
        self.visibility.holds(values)
    }

    /// Name of the field this one depends on, if any.
    pub fn gate(&self) -> Option<&'static str> {
        match self.visibility {
            Visibility::Always => None,
            Visibility::Equals { gate, .. } => Some(gate),
        }
    }
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required_message: &'static str) -> FieldDescriptor {
    FieldDescriptor { name, label, kind, visibility: Visibility::Always, required_message }
}

const fn follow_up(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    gate: &'static str,
    value: &'static str,
    required_message: &'static str,
) -> FieldDescriptor {
    FieldDescriptor { name, label, kind, visibility: Visibility::Equals { gate, value }, required_message }
}

const PRE_EXISTING: &str = "pre_existing_conditions";

static LIFE_INSURANCE: &[FieldDescriptor] = &[
    field("gender", "Gender", FieldKind::Radio(&["Male", "Female", "Other"]), "Gender is required."),
    field("smoker", "Smoker?", FieldKind::Radio(YES_NO), "Smoker status is required."),
    field(
        "coverage_amount_life",
        "Coverage Amount",
        FieldKind::Select(&["$100,000", "$250,000", "$500,000", "$1,000,000", "Other"]),
        "Coverage amount is required.",
    ),
    field(
        "term_length",
        "Term Length",
        FieldKind::Select(&["10 years", "20 years", "Whole Life", "Other"]),
        "Term length is required.",
    ),
    field(PRE_EXISTING, "Pre-existing health conditions?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up("smoker_details", "How many per day?", FieldKind::Text, "smoker", YES, "Please specify how many per day."),
    follow_up(
        "conditions_details_life",
        "Please list conditions",
        FieldKind::LongText,
        PRE_EXISTING,
        YES,
        "Please list your conditions.",
    ),
];

static VISITOR_INSURANCE: &[FieldDescriptor] = &[
    field("coverage_start_date_visitor", "Coverage Start Date", FieldKind::Date, "Start date is required."),
    field("coverage_end_date_visitor", "Coverage End Date", FieldKind::Date, "End date is required."),
    field(
        "coverage_amount_visitor",
        "Coverage Amount",
        FieldKind::Select(&["$25,000", "$50,000", "$100,000"]),
        "Coverage amount is required.",
    ),
    field(PRE_EXISTING, "Pre-existing Conditions?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up(
        "conditions_details_visitor",
        "Provide details",
        FieldKind::LongText,
        PRE_EXISTING,
        YES,
        "Please provide details.",
    ),
    field("purpose_of_visit", "Purpose of Visit", FieldKind::Text, "Purpose of visit is required."),
];

static SUPER_VISA_INSURANCE: &[FieldDescriptor] = &[
    field(
        "coverage_amount_super_visa",
        "Coverage Amount",
        FieldKind::Select(&["$100,000", "$150,000", "$200,000", "Other"]),
        "Coverage amount is required.",
    ),
    field(PRE_EXISTING, "Pre-existing Conditions?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up(
        "conditions_details_super_visa",
        "Provide details",
        FieldKind::LongText,
        PRE_EXISTING,
        YES,
        "Please provide details.",
    ),
    field(
        "coverage_duration_super_visa",
        "Coverage Duration",
        FieldKind::Select(&["1 year", "2 years", "Other"]),
        "Coverage duration is required.",
    ),
    field(
        "relationship_to_applicant",
        "Relationship to Applicant",
        FieldKind::Radio(&["Parent", "Grandparent"]),
        "Relationship to applicant is required.",
    ),
];

static RESP: &[FieldDescriptor] = &[
    field(
        "resp_contribution_goal",
        "Contribution Goal",
        FieldKind::Radio(&["Monthly", "One-time"]),
        "Contribution goal is required.",
    ),
    field(
        "resp_investment_horizon",
        "Investment Horizon",
        FieldKind::Radio(&["5 years", "10 years", "15+ years"]),
        "Investment horizon is required.",
    ),
    field("resp_has_savings", "Current Savings?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up(
        "resp_savings_amount",
        "How much saved so far?",
        FieldKind::Text,
        "resp_has_savings",
        YES,
        "Please enter your current savings.",
    ),
];

static TFSA: &[FieldDescriptor] = &[
    field("tfsa_annual_contribution", "Annual Contribution Goal", FieldKind::Text, "Annual contribution goal is required."),
    field(
        "tfsa_investment_style",
        "Investment Style",
        FieldKind::Radio(&["Conservative", "Balanced", "Growth"]),
        "Investment style is required.",
    ),
    field("tfsa_has_existing", "Existing TFSA?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up(
        "tfsa_existing_amount",
        "How much already contributed?",
        FieldKind::Text,
        "tfsa_has_existing",
        YES,
        "Please enter the amount already contributed.",
    ),
    follow_up(
        "tfsa_start_contribution",
        "Would you like to start with a minimum contribution?",
        FieldKind::Radio(YES_NO),
        "tfsa_has_existing",
        NO,
        "This field is required.",
    ),
];

static RRSP: &[FieldDescriptor] = &[
    field("rrsp_retirement_age", "Retirement Goal Age", FieldKind::Number, "Retirement goal age is required."),
    field("rrsp_annual_contribution", "Annual Contribution Amount", FieldKind::Text, "Annual contribution is required."),
    field(
        "rrsp_investment_style",
        "Investment Style",
        FieldKind::Radio(&["Safe", "Moderate", "Aggressive"]),
        "Investment style is required.",
    ),
    field("rrsp_has_existing", "Existing RRSP?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up(
        "rrsp_existing_balance",
        "Approximate balance?",
        FieldKind::Text,
        "rrsp_has_existing",
        YES,
        "Please enter the approximate balance.",
    ),
    follow_up(
        "rrsp_start_advice",
        "Would you like advice on starting one?",
        FieldKind::Radio(YES_NO),
        "rrsp_has_existing",
        NO,
        "This field is required.",
    ),
];

static HEALTH_DENTAL: &[FieldDescriptor] = &[
    field("health_has_existing_plan", "Do you have an existing plan?", FieldKind::Radio(YES_NO), "This field is required."),
    follow_up(
        "health_existing_coverage_details",
        "What coverage do you already have?",
        FieldKind::LongText,
        "health_has_existing_plan",
        YES,
        "Please describe your existing coverage.",
    ),
    follow_up(
        "health_coverage_need",
        "Which type of coverage do you need?",
        FieldKind::Select(&["Prescription", "Dental", "Vision", "Full Package"]),
        "health_has_existing_plan",
        NO,
        "Coverage type is required.",
    ),
    field(
        "health_who_needs_coverage",
        "Who needs coverage?",
        FieldKind::Radio(&["Individual", "Couple", "Family"]),
        "This field is required.",
    ),
];

static TRAVEL_INSURANCE_CANADIANS: &[FieldDescriptor] = &[
    field("travel_destination", "Travel Destination(s)", FieldKind::Text, "Destination is required."),
    field("travel_start_date", "Travel Start Date", FieldKind::Date, "Start date is required."),
    field("travel_end_date", "Travel End Date", FieldKind::Date, "End date is required."),
    field(
        "travel_coverage_amount",
        "Coverage Amount",
        FieldKind::Select(&["$100,000", "$500,000", "$1,000,000"]),
        "Coverage amount is required.",
    ),
    field(
        "travel_pre_existing_conditions",
        "Pre-existing medical conditions?",
        FieldKind::Radio(YES_NO),
        "This field is required.",
    ),
    follow_up(
        "travel_conditions_details",
        "Please list",
        FieldKind::LongText,
        "travel_pre_existing_conditions",
        YES,
        "Please list your conditions.",
    ),
];

static INTERNATIONAL_STUDENTS_PLAN: &[FieldDescriptor] = &[
    field("international_school_name", "School/College Name", FieldKind::Text, "School name is required."),
    field("international_coverage_start_date", "Coverage Start Date", FieldKind::Date, "Start date is required."),
    field("international_coverage_end_date", "Coverage End Date", FieldKind::Date, "End date is required."),
    field(
        "international_coverage_amount",
        "Coverage Amount",
        FieldKind::Select(&["$50,000", "$100,000", "$200,000"]),
        "Coverage amount is required.",
    ),
    field(
        "international_pre_existing_conditions",
        "Pre-existing Conditions?",
        FieldKind::Radio(YES_NO),
        "This field is required.",
    ),
    follow_up(
        "international_conditions_details",
        "Please list",
        FieldKind::LongText,
        "international_pre_existing_conditions",
        YES,
        "Please list your conditions.",
    ),
];

/// Contact fields, required for every service.
pub static CONTACT_FIELDS: &[FieldDescriptor] = &[
    field("full_name", "Full Name", FieldKind::Text, "Full name is required."),
    field("dob", "Date of Birth", FieldKind::Date, "Date of birth is required."),
    field("email", "Email Address", FieldKind::Text, "Invalid email address."),
    field("phone", "Phone Number", FieldKind::Text, "Phone number is required."),
    field("city_province", "City/Province", FieldKind::Text, "City/Province is required."),
];

pub const SERVICE_FIELD: &str = "service";

pub fn contact_field_names() -> Vec<&'static str> {
    CONTACT_FIELDS.iter().map(|f| f.name).collect()
}

pub fn is_contact_field(name: &str) -> bool {
    CONTACT_FIELDS.iter().any(|f| f.name == name)
}

/// True for every field of the flat quote record.
pub fn known_field(name: &str) -> bool {
    name == SERVICE_FIELD
        || is_contact_field(name)
        || ServiceCode::ALL.iter().any(|code| code.detail_field(name).is_some())
}

/// Initial answers of the gating questions.
pub fn default_values() -> FieldValues {
    [
        "smoker",
        PRE_EXISTING,
        "resp_has_savings",
        "tfsa_has_existing",
        "rrsp_has_existing",
        "health_has_existing_plan",
        "travel_pre_existing_conditions",
        "international_pre_existing_conditions",
    ]
    .into_iter()
    .map(|name| (name.to_string(), NO.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for code in ServiceCode::ALL {
            assert_eq!(code.as_str().parse::<ServiceCode>(), Ok(code));
        }
        assert!("car-insurance".parse::<ServiceCode>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for code in ServiceCode::ALL {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn test_follow_up_visibility() {
        let smoker_details = ServiceCode::LifeInsurance.detail_field("smoker_details").unwrap();
        let mut values = default_values();
        assert!(!smoker_details.is_visible(&values));
        values.insert("smoker".to_string(), YES.to_string());
        assert!(smoker_details.is_visible(&values));
    }

    #[test]
    fn test_no_gated_follow_up() {
        let advice = ServiceCode::Rrsp.detail_field("rrsp_start_advice").unwrap();
        let mut values = default_values();
        assert!(advice.is_visible(&values));
        values.insert("rrsp_has_existing".to_string(), YES.to_string());
        assert!(!advice.is_visible(&values));
    }

    #[test]
    fn test_every_gate_is_a_field_of_the_same_service() {
        for code in ServiceCode::ALL {
            for f in code.detail_fields() {
                if let Some(gate) = f.gate() {
                    assert!(code.detail_field(gate).is_some(), "{} gate {} missing", f.name, gate);
                }
            }
        }
    }

    #[test]
    fn test_known_field() {
        assert!(known_field("service"));
        assert!(known_field("email"));
        assert!(known_field("travel_destination"));
        assert!(!known_field("favourite_colour"));
    }
}
