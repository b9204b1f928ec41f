//! [`LoanApplications`] over `/loan-applications`.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use super::dto::{InsertedIdDto, StatusChangeDto};
use crate::domain::ports::{LoanApplications, RemoteApiError, StatusChange};
use crate::domain::{ApplicationId, ApplicationPayload, ApplicationStatus, Email, LoanApplication};

const ROOT: &str = "loan-applications";

#[async_trait]
impl LoanApplications for ApiClient {
    async fn list_for_user(&self, email: &Email) -> Result<Vec<LoanApplication>, RemoteApiError> {
        self.get_json(self.endpoint(&[ROOT, "user", email.as_ref()])?).await
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<LoanApplication>, RemoteApiError> {
        self.get_json(self.endpoint(&[ROOT, "status", status.path_segment()])?).await
    }

    async fn list_all(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<LoanApplication>, RemoteApiError> {
        let mut url = self.endpoint(&[ROOT])?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        self.get_json(url).await
    }

    async fn submit(&self, payload: &ApplicationPayload) -> Result<ApplicationId, RemoteApiError> {
        let created: InsertedIdDto = self
            .send_json(Method::POST, self.endpoint(&[ROOT])?, payload)
            .await?;
        let id = created
            .into_id()
            .ok_or_else(|| RemoteApiError::decode("create reply carried no application id"))?;
        ApplicationId::new(id).map_err(|err| RemoteApiError::decode(err.to_string()))
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        change: StatusChange,
    ) -> Result<(), RemoteApiError> {
        let body = StatusChangeDto::new(change.status, change.decided_at);
        let url = self.endpoint(&[ROOT, id.as_ref()])?;
        self.send_json_discard(Method::PATCH, url, &body).await
    }
}
