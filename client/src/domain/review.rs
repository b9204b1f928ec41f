//! Application review: listings for reviewers and borrowers, and the
//! approve/reject decision.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::ports::{LoanApplications, StatusChange};
use super::service_support::{map_remote_error, require_role};
use super::{ApplicationId, ApplicationStatus, Error, LoanApplication, Role, Session};

const LOAD_FAILED: &str = "Failed to load loan applications";

/// Review decision a manager or admin can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Move to [`ApplicationStatus::Approved`].
    Approve,
    /// Move to [`ApplicationStatus::Rejected`].
    Reject,
}

impl ReviewDecision {
    /// Status the application moves to.
    pub fn target_status(self) -> ApplicationStatus {
        match self {
            Self::Approve => ApplicationStatus::Approved,
            Self::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Review operations over a [`LoanApplications`] port.
#[derive(Clone)]
pub struct ReviewService<A> {
    applications: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A> ReviewService<A> {
    /// Create a review service.
    pub fn new(applications: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            clock,
        }
    }
}

impl<A> ReviewService<A>
where
    A: LoanApplications,
{
    /// Applications submitted by `actor`.
    pub async fn my_applications(&self, actor: &Session) -> Result<Vec<LoanApplication>, Error> {
        self.applications
            .list_for_user(actor.account().email())
            .await
            .map_err(|err| map_remote_error(err, LOAD_FAILED))
    }

    /// Applications in `status`, for managers and admins.
    pub async fn list_by_status(
        &self,
        actor: &Session,
        status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, Error> {
        require_role(actor, &[Role::Manager, Role::Admin], "review applications")?;
        self.applications
            .list_by_status(status)
            .await
            .map_err(|err| map_remote_error(err, LOAD_FAILED))
    }

    /// Every application, optionally narrowed to one status; admins only.
    pub async fn list_all(
        &self,
        actor: &Session,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<LoanApplication>, Error> {
        require_role(actor, &[Role::Admin], "list every application")?;
        self.applications
            .list_all(status)
            .await
            .map_err(|err| map_remote_error(err, LOAD_FAILED))
    }

    /// Approve or reject a pending application.
    ///
    /// The current status is read from the pending listing; an application
    /// that is not pending is left untouched and reported as a conflict.
    pub async fn decide(
        &self,
        actor: &Session,
        id: &ApplicationId,
        decision: ReviewDecision,
    ) -> Result<StatusChange, Error> {
        require_role(actor, &[Role::Manager, Role::Admin], "review applications")?;
        let pending = self.list_by_status(actor, ApplicationStatus::Pending).await?;
        if !pending.iter().any(|app| app.id() == id) {
            return Err(Error::conflict(format!(
                "application {id} is not pending review"
            )));
        }

        let change = StatusChange {
            status: decision.target_status(),
            decided_at: self.clock.utc(),
        };
        let fallback = match decision {
            ReviewDecision::Approve => "Failed to approve application",
            ReviewDecision::Reject => "Failed to reject application",
        };
        self.applications
            .update_status(id, change)
            .await
            .map_err(|err| map_remote_error(err, fallback))?;
        info!(application_id = %id, status = %change.status, "application reviewed");
        Ok(change)
    }
}
