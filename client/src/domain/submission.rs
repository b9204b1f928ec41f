//! Loan application submission flow.
//!
//! A borrower's form is validated locally, checked against their existing
//! applications, stamped with the current time and posted once. The
//! duplicate check is advisory: two concurrent submissions can both pass it
//! and the API does not enforce uniqueness.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::navigation::Destination;
use super::ports::LoanApplications;
use super::service_support::{map_remote_error, require_role};
use super::{
    ApplicantDetails, ApplicationPayload, Error, LoanApplication, LoanProduct, Role, Session,
};

/// Notice shown when the borrower already has an application for the loan.
pub const ALREADY_APPLIED: &str = "You have already applied for this loan.";
const SUBMIT_FAILED: &str = "Application failed";

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// Application as stored by the API, starting Pending and Unpaid.
    pub application: LoanApplication,
    /// Where the borrower goes next.
    pub next: Destination,
}

/// Submission service over a [`LoanApplications`] port.
#[derive(Clone)]
pub struct ApplicationSubmissionService<A> {
    applications: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A> ApplicationSubmissionService<A> {
    /// Create a submission service.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use loanlink::domain::ApplicationSubmissionService;
    /// # use loanlink::outbound::http::ApiClient;
    /// # use mockable::DefaultClock;
    /// # fn example(client: ApiClient) {
    /// let service = ApplicationSubmissionService::new(Arc::new(client), Arc::new(DefaultClock));
    /// # let _ = service;
    /// # }
    /// ```
    pub fn new(applications: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            clock,
        }
    }
}

impl<A> ApplicationSubmissionService<A>
where
    A: LoanApplications,
{
    /// Whether `actor` already has an application for `loan`.
    ///
    /// A failed lookup is logged and treated as "not applied".
    pub async fn has_applied(&self, actor: &Session, loan: &LoanProduct) -> bool {
        match self
            .applications
            .list_for_user(actor.account().email())
            .await
        {
            Ok(existing) => existing.iter().any(|app| app.loan_id() == loan.id()),
            Err(err) => {
                warn!(error = %err, "duplicate application check failed; continuing");
                false
            }
        }
    }

    /// Submit `applicant` for `loan` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` when `actor` is not a borrower.
    /// - `InvalidRequest` when a required field is blank or an amount is not
    ///   positive; nothing is sent.
    /// - `Conflict` with [`ALREADY_APPLIED`] when an application for the same
    ///   loan exists.
    /// - The API's own message, verbatim, when it rejects the submission.
    pub async fn submit(
        &self,
        actor: &Session,
        loan: &LoanProduct,
        applicant: ApplicantDetails,
    ) -> Result<SubmissionOutcome, Error> {
        require_role(actor, &[Role::Borrower], "apply for loans")?;
        applicant
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if self.has_applied(actor, loan).await {
            debug!(loan_id = %loan.id(), "blocked duplicate application");
            return Err(Error::conflict(ALREADY_APPLIED));
        }

        let payload = ApplicationPayload {
            loan_id: loan.id().clone(),
            loan_title: loan.title().to_owned(),
            interest_rate: loan.interest_rate().percent(),
            user_email: actor.account().email().clone(),
            submitted_at: self.clock.utc(),
            applicant,
        };
        let id = self
            .applications
            .submit(&payload)
            .await
            .map_err(|err| map_remote_error(err, SUBMIT_FAILED))?;
        info!(application_id = %id, loan_id = %payload.loan_id, "loan application submitted");

        Ok(SubmissionOutcome {
            application: LoanApplication::new(id, payload),
            next: Destination::MyLoans,
        })
    }
}
