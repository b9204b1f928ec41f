//! Driven port for the hosted checkout used to collect application fees.

use async_trait::async_trait;

use crate::domain::{ApplicationId, Email};

use super::RemoteApiError;

/// Checkout request for one application fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub application_id: ApplicationId,
    pub loan_title: String,
    pub user_email: Email,
}

/// Hosted checkout the borrower is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Page hosting the payment form.
    pub url: String,
    /// Provider session identifier, when the API returns it.
    pub session_id: Option<String>,
}

/// Port for fee payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session (`POST /payments/create-checkout-session`).
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, RemoteApiError>;

    /// Confirm a completed checkout (`POST /payments/confirm`).
    async fn confirm(&self, session_id: &str) -> Result<(), RemoteApiError>;
}
