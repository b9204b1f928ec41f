//! Driven port for loan applications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ApplicationId, ApplicationPayload, ApplicationStatus, Email, LoanApplication};

use super::RemoteApiError;

/// Review outcome sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// New status; never [`ApplicationStatus::Pending`].
    pub status: ApplicationStatus,
    /// When the reviewer decided.
    pub decided_at: DateTime<Utc>,
}

/// Port for the remote application store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanApplications: Send + Sync {
    /// Applications submitted by `email` (`GET /loan-applications/user/:email`).
    async fn list_for_user(&self, email: &Email) -> Result<Vec<LoanApplication>, RemoteApiError>;

    /// Applications in one status (`GET /loan-applications/status/:status`).
    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, RemoteApiError>;

    /// Every application, optionally narrowed to one status
    /// (`GET /loan-applications?status=`).
    async fn list_all(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<LoanApplication>, RemoteApiError>;

    /// Create an application (`POST /loan-applications`).
    async fn submit(&self, payload: &ApplicationPayload) -> Result<ApplicationId, RemoteApiError>;

    /// Record a review decision (`PATCH /loan-applications/:id`).
    async fn update_status(
        &self,
        id: &ApplicationId,
        change: StatusChange,
    ) -> Result<(), RemoteApiError>;
}
