//! Loan application model.
//!
//! An application is a borrower's request against one loan product. Its
//! review status is moved by managers and admins; its fee status is moved by
//! the payment collaborator once the processing fee clears.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Email, LoanId};

/// Validation errors raised by applicant input and application records.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationValidationError {
    EmptyId,
    MissingField { field: &'static str },
    InvalidAmount { field: &'static str, value: f64 },
    UnknownStatus { value: String },
    UnknownFeeStatus { value: String },
}

impl fmt::Display for ApplicationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "application id must not be empty"),
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::InvalidAmount { field, value } => {
                write!(f, "{field} must be a positive amount (got {value})")
            }
            Self::UnknownStatus { value } => write!(f, "unknown application status {value:?}"),
            Self::UnknownFeeStatus { value } => write!(f, "unknown fee status {value:?}"),
        }
    }
}

impl std::error::Error for ApplicationValidationError {}

/// Opaque application identifier assigned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Validate and construct an [`ApplicationId`].
    pub fn new(id: impl Into<String>) -> Result<Self, ApplicationValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ApplicationValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ApplicationId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ApplicationId> for String {
    fn from(value: ApplicationId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = ApplicationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Awaiting review.
    #[default]
    #[serde(alias = "pending")]
    Pending,
    /// Approved by a manager or admin.
    #[serde(alias = "approved")]
    Approved,
    /// Rejected by a manager or admin.
    #[serde(alias = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Lowercase form used in listing paths such as `/status/pending`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = ApplicationValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ApplicationValidationError::UnknownStatus {
                value: value.to_owned(),
            })
    }
}

/// Whether the application-processing fee has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeeStatus {
    /// Fee outstanding.
    #[default]
    #[serde(alias = "unpaid")]
    Unpaid,
    /// Fee settled through the hosted checkout.
    #[serde(alias = "paid")]
    Paid,
}

impl FeeStatus {
    /// Wire name of the fee status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = ApplicationValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [Self::Unpaid, Self::Paid]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ApplicationValidationError::UnknownFeeStatus {
                value: value.to_owned(),
            })
    }
}

/// Fields the applicant types into the application form.
///
/// Amounts arrive from form posts as either JSON numbers or numeric strings,
/// so decoding accepts both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    /// Applicant's given name.
    #[serde(default)]
    pub first_name: String,
    /// Applicant's family name.
    #[serde(default)]
    pub last_name: String,
    /// Phone number.
    #[serde(default)]
    pub contact_number: String,
    /// National ID or passport number.
    #[serde(default)]
    pub national_id: String,
    /// Amount the applicant asks for.
    #[serde(
        rename = "loanAmount",
        alias = "requestedAmount",
        default,
        deserialize_with = "number_or_string"
    )]
    pub requested_amount: f64,
    /// Declared monthly income.
    #[serde(default, deserialize_with = "number_or_string")]
    pub monthly_income: f64,
    /// Where the income comes from.
    #[serde(default)]
    pub income_source: String,
    /// Why the loan is needed.
    #[serde(default)]
    pub reason: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Optional extra notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApplicantDetails {
    /// Required-field validation run before any network call.
    ///
    /// Reports the first missing or invalid field in form order.
    pub fn validate(&self) -> Result<(), ApplicationValidationError> {
        if !self.requested_amount.is_finite() || self.requested_amount <= 0.0 {
            return Err(ApplicationValidationError::InvalidAmount {
                field: "loan amount",
                value: self.requested_amount,
            });
        }
        if !self.monthly_income.is_finite() || self.monthly_income <= 0.0 {
            return Err(ApplicationValidationError::InvalidAmount {
                field: "monthly income",
                value: self.monthly_income,
            });
        }
        let required = [
            ("income source", &self.income_source),
            ("reason", &self.reason),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("contact number", &self.contact_number),
            ("national ID", &self.national_id),
            ("address", &self.address),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some(&(field, _)) => Err(ApplicationValidationError::MissingField { field }),
            None => Ok(()),
        }
    }

    /// Applicant's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|error| serde::de::Error::custom(format!("invalid amount {text:?}: {error}"))),
    }
}

/// Payload posted to create an application.
///
/// Combines what the applicant typed with read-only fields copied from the
/// loan product and the submitting user's identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    /// Loan product applied for.
    pub loan_id: LoanId,
    /// Loan title at submission time.
    pub loan_title: String,
    /// Loan interest rate at submission time, in percent.
    pub interest_rate: f64,
    /// Submitting user.
    pub user_email: Email,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Applicant-supplied fields.
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
}

/// Loan application as stored by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoanApplicationDto", into = "LoanApplicationDto")]
pub struct LoanApplication {
    id: ApplicationId,
    loan_id: LoanId,
    loan_title: String,
    interest_rate: Option<f64>,
    user_email: Email,
    applicant: ApplicantDetails,
    status: ApplicationStatus,
    fee_status: FeeStatus,
    submitted_at: Option<DateTime<Utc>>,
}

impl LoanApplication {
    /// Build an application record from its parts; status starts at
    /// [`ApplicationStatus::Pending`] and the fee at [`FeeStatus::Unpaid`].
    pub fn new(id: ApplicationId, payload: ApplicationPayload) -> Self {
        let ApplicationPayload {
            loan_id,
            loan_title,
            interest_rate,
            user_email,
            submitted_at,
            applicant,
        } = payload;
        Self {
            id,
            loan_id,
            loan_title,
            interest_rate: Some(interest_rate),
            user_email,
            applicant,
            status: ApplicationStatus::Pending,
            fee_status: FeeStatus::Unpaid,
            submitted_at: Some(submitted_at),
        }
    }

    /// Return a copy with a different review status.
    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }

    /// Return a copy with a different fee status.
    pub fn with_fee_status(mut self, fee_status: FeeStatus) -> Self {
        self.fee_status = fee_status;
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &ApplicationId {
        &self.id
    }

    /// Loan product the application references.
    pub fn loan_id(&self) -> &LoanId {
        &self.loan_id
    }

    /// Loan title copied at submission.
    pub fn loan_title(&self) -> &str {
        self.loan_title.as_str()
    }

    /// Interest rate copied at submission, in percent.
    pub fn interest_rate(&self) -> Option<f64> {
        self.interest_rate
    }

    /// Applicant's email.
    pub fn user_email(&self) -> &Email {
        &self.user_email
    }

    /// Applicant-supplied fields.
    pub fn applicant(&self) -> &ApplicantDetails {
        &self.applicant
    }

    /// Review status.
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Fee status.
    pub fn fee_status(&self) -> FeeStatus {
        self.fee_status
    }

    /// Submission timestamp, when the record carries one.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoanApplicationDto {
    #[serde(alias = "_id")]
    id: String,
    loan_id: String,
    #[serde(default)]
    loan_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interest_rate: Option<f64>,
    user_email: String,
    #[serde(flatten)]
    applicant: ApplicantDetails,
    #[serde(default)]
    status: ApplicationStatus,
    #[serde(default, rename = "applicationFeeStatus", alias = "feeStatus")]
    fee_status: FeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submitted_at: Option<DateTime<Utc>>,
}

impl From<LoanApplication> for LoanApplicationDto {
    fn from(value: LoanApplication) -> Self {
        Self {
            id: value.id.into(),
            loan_id: value.loan_id.into(),
            loan_title: value.loan_title,
            interest_rate: value.interest_rate,
            user_email: value.user_email.into(),
            applicant: value.applicant,
            status: value.status,
            fee_status: value.fee_status,
            submitted_at: value.submitted_at,
        }
    }
}

impl TryFrom<LoanApplicationDto> for LoanApplication {
    type Error = String;

    fn try_from(value: LoanApplicationDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ApplicationId::new(value.id).map_err(|err| err.to_string())?,
            loan_id: LoanId::new(value.loan_id).map_err(|err| err.to_string())?,
            loan_title: value.loan_title,
            interest_rate: value.interest_rate,
            user_email: Email::new(value.user_email).map_err(|err| err.to_string())?,
            applicant: value.applicant,
            status: value.status,
            fee_status: value.fee_status,
            submitted_at: value.submitted_at,
        })
    }
}
