//! Driven port for loan product reads and writes.

use async_trait::async_trait;

use crate::domain::{Email, LoanDraft, LoanId, LoanProduct};

use super::RemoteApiError;

/// Port for the remote loan catalogue.
///
/// Every call hits the API; adapters keep no cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanCatalogue: Send + Sync {
    /// Fetch every loan product (`GET /loans`).
    async fn list_loans(&self) -> Result<Vec<LoanProduct>, RemoteApiError>;

    /// Fetch products the API associates with `email` (`GET /loans?createdBy=`).
    ///
    /// The API may ignore the query; callers re-check ownership.
    async fn list_loans_by_creator(&self, email: &Email)
    -> Result<Vec<LoanProduct>, RemoteApiError>;

    /// Fetch one product (`GET /loans/:id`).
    async fn get_loan(&self, id: &LoanId) -> Result<LoanProduct, RemoteApiError>;

    /// Create a product (`POST /loans`) and return its identifier.
    async fn create_loan(
        &self,
        draft: &LoanDraft,
        created_by: &Email,
    ) -> Result<LoanId, RemoteApiError>;

    /// Replace a product's editable fields (`PATCH /loans/:id`).
    async fn update_loan(&self, id: &LoanId, draft: &LoanDraft) -> Result<(), RemoteApiError>;

    /// Delete a product (`DELETE /loans/:id`).
    async fn delete_loan(&self, id: &LoanId) -> Result<(), RemoteApiError>;

    /// Toggle home-page placement (`PATCH /loans/home/:id`).
    async fn set_show_on_home(&self, id: &LoanId, show: bool) -> Result<(), RemoteApiError>;
}
