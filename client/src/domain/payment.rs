//! Application fee payment through the hosted checkout.

use std::sync::Arc;

use tracing::info;

use super::navigation::Destination;
use super::ports::{CheckoutRequest, CheckoutSession, LoanApplications, PaymentGateway};
use super::service_support::{map_remote_error, require_role};
use super::{ApplicationId, Error, FeeStatus, Role, Session};

const CHECKOUT_FAILED: &str = "Failed to start payment";
const VERIFY_FAILED: &str = "Payment verification failed";

/// Fee payment operations.
#[derive(Clone)]
pub struct PaymentService<P, A> {
    gateway: Arc<P>,
    applications: Arc<A>,
}

impl<P, A> PaymentService<P, A> {
    /// Create a payment service.
    pub fn new(gateway: Arc<P>, applications: Arc<A>) -> Self {
        Self {
            gateway,
            applications,
        }
    }
}

impl<P, A> PaymentService<P, A>
where
    P: PaymentGateway,
    A: LoanApplications,
{
    /// Open a checkout for the fee of one of `actor`'s own applications.
    ///
    /// Fails with `NotFound` when the application is not among the actor's
    /// and with `Conflict` when its fee is already paid.
    pub async fn start_checkout(
        &self,
        actor: &Session,
        application: &ApplicationId,
    ) -> Result<CheckoutSession, Error> {
        require_role(actor, &[Role::Borrower], "pay application fees")?;
        let email = actor.account().email();
        let own = self
            .applications
            .list_for_user(email)
            .await
            .map_err(|err| map_remote_error(err, CHECKOUT_FAILED))?;
        let target = own
            .into_iter()
            .find(|app| app.id() == application)
            .ok_or_else(|| {
                Error::not_found(format!("application {application} was not found"))
            })?;
        if target.fee_status() == FeeStatus::Paid {
            return Err(Error::conflict(format!(
                "the fee for application {application} is already paid"
            )));
        }

        let request = CheckoutRequest {
            application_id: application.clone(),
            loan_title: target.loan_title().to_owned(),
            user_email: email.clone(),
        };
        let session = self
            .gateway
            .create_checkout_session(&request)
            .await
            .map_err(|err| map_remote_error(err, CHECKOUT_FAILED))?;
        info!(application_id = %application, "checkout session opened");
        Ok(session)
    }

    /// Confirm a completed checkout and return where to go next.
    pub async fn confirm(&self, session_id: &str) -> Result<Destination, Error> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(Error::invalid_request("checkout session id is missing"));
        }
        self.gateway
            .confirm(session_id)
            .await
            .map_err(|err| map_remote_error(err, VERIFY_FAILED))?;
        info!("payment confirmed");
        Ok(Destination::MyLoans)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockLoanApplications, MockPaymentGateway, RemoteApiError};
    use crate::domain::test_support::{application, borrower};

    fn service(
        gateway: MockPaymentGateway,
        applications: MockLoanApplications,
    ) -> PaymentService<MockPaymentGateway, MockLoanApplications> {
        PaymentService::new(Arc::new(gateway), Arc::new(applications))
    }

    fn app_id(raw: &str) -> ApplicationId {
        ApplicationId::new(raw).expect("application id")
    }

    #[tokio::test]
    async fn unpaid_own_application_opens_checkout() {
        let mut applications = MockLoanApplications::new();
        applications
            .expect_list_for_user()
            .return_once(|_| Ok(vec![application("app-1", "65a0c1", 8_000.0)]));
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_checkout_session()
            .withf(|request| {
                request.application_id.as_ref() == "app-1"
                    && request.user_email.as_ref() == "nusrat@loanlink.test"
            })
            .times(1)
            .return_once(|_| {
                Ok(CheckoutSession {
                    url: "https://checkout.example/pay/cs_1".to_owned(),
                    session_id: Some("cs_1".to_owned()),
                })
            });

        let session = service(gateway, applications)
            .start_checkout(&borrower(), &app_id("app-1"))
            .await
            .expect("checkout opens");
        assert_eq!(session.session_id.as_deref(), Some("cs_1"));
    }

    #[tokio::test]
    async fn paid_fee_is_not_charged_twice() {
        let mut applications = MockLoanApplications::new();
        applications.expect_list_for_user().return_once(|_| {
            Ok(vec![
                application("app-1", "65a0c1", 8_000.0).with_fee_status(FeeStatus::Paid),
            ])
        });
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_checkout_session().times(0);

        let error = service(gateway, applications)
            .start_checkout(&borrower(), &app_id("app-1"))
            .await
            .expect_err("already paid");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn foreign_application_is_not_found() {
        let mut applications = MockLoanApplications::new();
        applications.expect_list_for_user().return_once(|_| Ok(Vec::new()));
        let gateway = MockPaymentGateway::new();

        let error = service(gateway, applications)
            .start_checkout(&borrower(), &app_id("someone-else"))
            .await
            .expect_err("not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn confirmation_returns_to_my_loans() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_confirm()
            .withf(|id| id == "cs_1")
            .times(1)
            .return_once(|_| Ok(()));

        let next = service(gateway, MockLoanApplications::new())
            .confirm(" cs_1 ")
            .await
            .expect("confirmed");
        assert_eq!(next, Destination::MyLoans);
    }

    #[tokio::test]
    async fn failed_confirmation_uses_verification_notice() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_confirm()
            .return_once(|_| Err(RemoteApiError::rejected(400_u16, None::<String>)));

        let error = service(gateway, MockLoanApplications::new())
            .confirm("cs_1")
            .await
            .expect_err("verification fails");
        assert_eq!(error.message(), "Payment verification failed");
    }
}
