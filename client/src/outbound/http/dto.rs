//! Wire-level request and reply shapes that have no domain counterpart.
//!
//! Loan products, applications and accounts decode straight into their
//! domain types; what lives here are the small envelopes around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ApplicationStatus, LoanDraft, Role};

/// Error body the API returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// Identifier of a newly created record.
///
/// Older endpoints reply with a driver-style `insertedId`; newer ones echo
/// the stored document, which may carry both `_id` and a client-made `id`.
#[derive(Debug, Deserialize)]
pub(super) struct InsertedIdDto {
    #[serde(rename = "insertedId")]
    inserted_id: Option<RawIdDto>,
    #[serde(rename = "_id")]
    document_id: Option<RawIdDto>,
    id: Option<RawIdDto>,
}

impl InsertedIdDto {
    /// Preferred identifier: `insertedId`, then `_id`, then `id`.
    pub(super) fn into_id(self) -> Option<String> {
        self.inserted_id
            .or(self.document_id)
            .or(self.id)
            .map(String::from)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIdDto {
    Text(String),
    Number(serde_json::Number),
    Oid {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl From<RawIdDto> for String {
    fn from(value: RawIdDto) -> Self {
        match value {
            RawIdDto::Text(text) => text,
            RawIdDto::Number(number) => number.to_string(),
            RawIdDto::Oid { oid } => oid,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewLoanDto<'a> {
    #[serde(flatten)]
    pub(super) draft: &'a LoanDraft,
    pub(super) created_by: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ShowOnHomeDto {
    pub(super) show_home: bool,
}

/// Review decision body; the timestamp key follows the decision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusChangeDto {
    pub(super) status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) rejected_at: Option<DateTime<Utc>>,
}

impl StatusChangeDto {
    pub(super) fn new(status: ApplicationStatus, decided_at: DateTime<Utc>) -> Self {
        let (approved_at, rejected_at) = match status {
            ApplicationStatus::Approved => (Some(decided_at), None),
            ApplicationStatus::Rejected => (None, Some(decided_at)),
            ApplicationStatus::Pending => (None, None),
        };
        Self {
            status,
            approved_at,
            rejected_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RoleDto {
    pub(super) role: Role,
}

#[derive(Debug, Serialize)]
pub(super) struct SuspendDto<'a> {
    pub(super) reason: &'a str,
    pub(super) feedback: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckoutRequestDto<'a> {
    pub(super) application_id: &'a str,
    pub(super) loan_title: &'a str,
    pub(super) user_email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutSessionDto {
    pub(super) url: String,
    #[serde(default, rename = "sessionId", alias = "id")]
    pub(super) session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConfirmPaymentDto<'a> {
    pub(super) session_id: &'a str,
}
