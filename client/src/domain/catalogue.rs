//! Loan catalogue service.
//!
//! Reads are open to everyone. Writes are authorised here before any request
//! leaves the process: managers create products, a product's creator or an
//! admin edits or deletes it, and only admins choose what the home page
//! features.

use std::sync::Arc;

use tracing::{debug, info};

use super::catalogue_filter::{self, LoanFilter, LoanSearch};
use super::ports::LoanCatalogue;
use super::service_support::{map_remote_error, require_role};
use super::{Error, LoanDraft, LoanId, LoanProduct, Role, Session};

const LOAD_FAILED: &str = "Failed to load loans";
const ADD_FAILED: &str = "Failed to add loan. Please try again.";
const UPDATE_FAILED: &str = "Failed to update loan";
const DELETE_FAILED: &str = "Failed to delete loan";
const HOME_FAILED: &str = "Failed to update home page placement";

/// Catalogue operations over a [`LoanCatalogue`] port.
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    /// Create a service over the catalogue port.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

impl<C> CatalogueService<C>
where
    C: LoanCatalogue,
{
    /// Every loan product, freshly fetched.
    pub async fn list_loans(&self) -> Result<Vec<LoanProduct>, Error> {
        let loans = self
            .catalogue
            .list_loans()
            .await
            .map_err(|err| map_remote_error(err, LOAD_FAILED))?;
        debug!(count = loans.len(), "fetched loan catalogue");
        Ok(loans)
    }

    /// Products matching `filter`, in catalogue order.
    pub async fn search(&self, filter: &LoanFilter) -> Result<Vec<LoanProduct>, Error> {
        let loans = self.list_loans().await?;
        Ok(filter.apply(&loans).into_iter().cloned().collect())
    }

    /// Products featured on the home page.
    pub async fn home_loans(&self) -> Result<Vec<LoanProduct>, Error> {
        let loans = self.list_loans().await?;
        Ok(loans.into_iter().filter(LoanProduct::show_on_home).collect())
    }

    /// Distinct categories across the catalogue.
    pub async fn categories(&self) -> Result<Vec<String>, Error> {
        let loans = self.list_loans().await?;
        Ok(catalogue_filter::categories(&loans)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    /// One product by identifier.
    pub async fn get_loan(&self, id: &LoanId) -> Result<LoanProduct, Error> {
        self.catalogue
            .get_loan(id)
            .await
            .map_err(|err| map_remote_error(err, &format!("Loan {id} could not be loaded")))
    }

    /// Products created by `actor`, narrowed by `search`.
    ///
    /// The API's `createdBy` query is not trusted; ownership is re-checked
    /// locally.
    pub async fn list_own_loans(
        &self,
        actor: &Session,
        search: &LoanSearch,
    ) -> Result<Vec<LoanProduct>, Error> {
        require_role(actor, &[Role::Manager], "manage loan products")?;
        let email = actor.account().email();
        let loans = self
            .catalogue
            .list_loans_by_creator(email)
            .await
            .map_err(|err| map_remote_error(err, LOAD_FAILED))?;
        let own: Vec<LoanProduct> = loans
            .into_iter()
            .filter(|loan| loan.is_created_by(email.as_ref()))
            .collect();
        Ok(search.apply(&own).into_iter().cloned().collect())
    }

    /// Create a product authored by `actor`.
    pub async fn create_loan(&self, actor: &Session, draft: &LoanDraft) -> Result<LoanId, Error> {
        require_role(actor, &[Role::Manager], "add loan products")?;
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let id = self
            .catalogue
            .create_loan(draft, actor.account().email())
            .await
            .map_err(|err| map_remote_error(err, ADD_FAILED))?;
        info!(loan_id = %id, "loan product created");
        Ok(id)
    }

    /// Replace the editable fields of a product.
    pub async fn update_loan(
        &self,
        actor: &Session,
        id: &LoanId,
        draft: &LoanDraft,
    ) -> Result<(), Error> {
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.authorise_owner(actor, id, "edit").await?;
        self.catalogue
            .update_loan(id, draft)
            .await
            .map_err(|err| map_remote_error(err, UPDATE_FAILED))?;
        info!(loan_id = %id, "loan product updated");
        Ok(())
    }

    /// Delete a product.
    pub async fn delete_loan(&self, actor: &Session, id: &LoanId) -> Result<(), Error> {
        self.authorise_owner(actor, id, "delete").await?;
        self.catalogue
            .delete_loan(id)
            .await
            .map_err(|err| map_remote_error(err, DELETE_FAILED))?;
        info!(loan_id = %id, "loan product deleted");
        Ok(())
    }

    /// Feature a product on, or remove it from, the home page.
    pub async fn set_show_on_home(
        &self,
        actor: &Session,
        id: &LoanId,
        show: bool,
    ) -> Result<(), Error> {
        require_role(actor, &[Role::Admin], "choose home page loans")?;
        self.catalogue
            .set_show_on_home(id, show)
            .await
            .map_err(|err| map_remote_error(err, HOME_FAILED))?;
        info!(loan_id = %id, show, "home page placement changed");
        Ok(())
    }

    async fn authorise_owner(&self, actor: &Session, id: &LoanId, verb: &str) -> Result<(), Error> {
        if actor.role() == Role::Admin {
            return Ok(());
        }
        let loan = self.get_loan(id).await?;
        if loan.is_created_by(actor.account().email().as_ref()) {
            return Ok(());
        }
        Err(Error::forbidden(format!(
            "only the creator of loan {id} or an admin may {verb} it"
        )))
    }
}
