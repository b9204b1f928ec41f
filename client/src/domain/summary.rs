//! Portfolio summary for the admin dashboard.
//!
//! Aggregates are computed locally from freshly fetched lists; nothing is
//! stored between calls.

use std::sync::Arc;

use tracing::debug;

use super::ports::{LoanApplications, LoanCatalogue};
use super::service_support::{map_remote_error, require_role};
use super::{
    ApplicationStatus, Error, FeeStatus, LoanApplication, LoanProduct, Role, Session,
    catalogue_filter,
};

/// Application counts per review status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Application counts per fee status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeCounts {
    pub unpaid: usize,
    pub paid: usize,
}

/// Aggregate view over applications and loan products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSummary {
    /// Number of applications considered.
    pub applications: usize,
    pub by_status: StatusCounts,
    pub by_fee: FeeCounts,
    /// Sum of requested amounts.
    pub total_requested: f64,
    /// Mean requested amount; `None` without applications.
    pub average_requested: Option<f64>,
    /// Loan products per category, in first-seen order.
    pub products_per_category: Vec<(String, usize)>,
}

impl PortfolioSummary {
    /// Summarise `applications` and `loans`.
    pub fn compute(applications: &[LoanApplication], loans: &[LoanProduct]) -> Self {
        let mut by_status = StatusCounts::default();
        let mut by_fee = FeeCounts::default();
        for application in applications {
            match application.status() {
                ApplicationStatus::Pending => by_status.pending += 1,
                ApplicationStatus::Approved => by_status.approved += 1,
                ApplicationStatus::Rejected => by_status.rejected += 1,
            }
            match application.fee_status() {
                FeeStatus::Unpaid => by_fee.unpaid += 1,
                FeeStatus::Paid => by_fee.paid += 1,
            }
        }

        let total_requested = applications
            .iter()
            .map(|application| application.applicant().requested_amount)
            .sum();
        let average_requested = mean(total_requested, applications.len());
        let products_per_category = catalogue_filter::categories(loans)
            .into_iter()
            .map(|category| {
                let count = loans.iter().filter(|loan| loan.category() == category).count();
                (category.to_owned(), count)
            })
            .collect();

        Self {
            applications: applications.len(),
            by_status,
            by_fee,
            total_requested,
            average_requested,
            products_per_category,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "amounts are decimal currency and counts stay far below 2^52"
)]
fn mean(total: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| total / count as f64)
}

/// Fetches what the summary needs and computes it.
#[derive(Clone)]
pub struct SummaryService<A, C> {
    applications: Arc<A>,
    catalogue: Arc<C>,
}

impl<A, C> SummaryService<A, C> {
    /// Create a summary service.
    pub fn new(applications: Arc<A>, catalogue: Arc<C>) -> Self {
        Self {
            applications,
            catalogue,
        }
    }
}

impl<A, C> SummaryService<A, C>
where
    A: LoanApplications,
    C: LoanCatalogue,
{
    /// Summary over every application and loan product; admins only.
    pub async fn summarise(&self, actor: &Session) -> Result<PortfolioSummary, Error> {
        require_role(actor, &[Role::Admin], "view the portfolio summary")?;
        let applications = self
            .applications
            .list_all(None)
            .await
            .map_err(|err| map_remote_error(err, "Failed to load loan applications"))?;
        let loans = self
            .catalogue
            .list_loans()
            .await
            .map_err(|err| map_remote_error(err, "Failed to load loans"))?;
        debug!(
            applications = applications.len(),
            loans = loans.len(),
            "computing portfolio summary"
        );
        Ok(PortfolioSummary::compute(&applications, &loans))
    }
}
