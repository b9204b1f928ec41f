//! [`PaymentGateway`] over `/payments`.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use super::dto::{CheckoutRequestDto, CheckoutSessionDto, ConfirmPaymentDto};
use crate::domain::ports::{CheckoutRequest, CheckoutSession, PaymentGateway, RemoteApiError};

#[async_trait]
impl PaymentGateway for ApiClient {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, RemoteApiError> {
        let body = CheckoutRequestDto {
            application_id: request.application_id.as_ref(),
            loan_title: request.loan_title.as_str(),
            user_email: request.user_email.as_ref(),
        };
        let url = self.endpoint(&["payments", "create-checkout-session"])?;
        let reply: CheckoutSessionDto = self.send_json(Method::POST, url, &body).await?;
        if reply.url.trim().is_empty() {
            return Err(RemoteApiError::decode("checkout reply carried no URL"));
        }
        Ok(CheckoutSession {
            url: reply.url,
            session_id: reply.session_id,
        })
    }

    async fn confirm(&self, session_id: &str) -> Result<(), RemoteApiError> {
        let url = self.endpoint(&["payments", "confirm"])?;
        self.send_json_discard(Method::POST, url, &ConfirmPaymentDto { session_id }).await
    }
}
