//! [`LoanCatalogue`] over `/loans`.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use super::dto::{InsertedIdDto, NewLoanDto, ShowOnHomeDto};
use crate::domain::ports::{LoanCatalogue, RemoteApiError};
use crate::domain::{Email, LoanDraft, LoanId, LoanProduct};

#[async_trait]
impl LoanCatalogue for ApiClient {
    async fn list_loans(&self) -> Result<Vec<LoanProduct>, RemoteApiError> {
        self.get_json(self.endpoint(&["loans"])?).await
    }

    async fn list_loans_by_creator(
        &self,
        email: &Email,
    ) -> Result<Vec<LoanProduct>, RemoteApiError> {
        let mut url = self.endpoint(&["loans"])?;
        url.query_pairs_mut().append_pair("createdBy", email.as_ref());
        self.get_json(url).await
    }

    async fn get_loan(&self, id: &LoanId) -> Result<LoanProduct, RemoteApiError> {
        self.get_json(self.endpoint(&["loans", id.as_ref()])?).await
    }

    async fn create_loan(
        &self,
        draft: &LoanDraft,
        created_by: &Email,
    ) -> Result<LoanId, RemoteApiError> {
        let body = NewLoanDto {
            draft,
            created_by: created_by.as_ref(),
        };
        let created: InsertedIdDto = self
            .send_json(Method::POST, self.endpoint(&["loans"])?, &body)
            .await?;
        let id = created
            .into_id()
            .ok_or_else(|| RemoteApiError::decode("create reply carried no loan id"))?;
        LoanId::new(id).map_err(|err| RemoteApiError::decode(err.to_string()))
    }

    async fn update_loan(&self, id: &LoanId, draft: &LoanDraft) -> Result<(), RemoteApiError> {
        let url = self.endpoint(&["loans", id.as_ref()])?;
        self.send_json_discard(Method::PATCH, url, draft).await
    }

    async fn delete_loan(&self, id: &LoanId) -> Result<(), RemoteApiError> {
        let url = self.endpoint(&["loans", id.as_ref()])?;
        self.send_empty(Method::DELETE, url).await
    }

    async fn set_show_on_home(&self, id: &LoanId, show: bool) -> Result<(), RemoteApiError> {
        let url = self.endpoint(&["loans", "home", id.as_ref()])?;
        self.send_json_discard(Method::PATCH, url, &ShowOnHomeDto { show_home: show }).await
    }
}
