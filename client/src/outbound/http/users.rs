//! [`UserDirectory`] over `/users`.

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use super::dto::{RoleDto, SuspendDto};
use crate::domain::ports::{RemoteApiError, UserDirectory};
use crate::domain::{Email, Role, Suspension, UserAccount, UserId};

#[async_trait]
impl UserDirectory for ApiClient {
    async fn list_users(&self) -> Result<Vec<UserAccount>, RemoteApiError> {
        self.get_json(self.endpoint(&["users"])?).await
    }

    async fn get_user(&self, email: &Email) -> Result<UserAccount, RemoteApiError> {
        self.get_json(self.endpoint(&["users", email.as_ref()])?).await
    }

    async fn update_role(&self, email: &Email, role: Role) -> Result<(), RemoteApiError> {
        let url = self.endpoint(&["users", "role", email.as_ref()])?;
        self.send_json_discard(Method::PATCH, url, &RoleDto { role }).await
    }

    async fn suspend(&self, id: &UserId, suspension: &Suspension) -> Result<(), RemoteApiError> {
        let url = self.endpoint(&["users", id.as_ref(), "suspend"])?;
        let body = SuspendDto {
            reason: suspension.reason(),
            feedback: suspension.feedback(),
        };
        self.send_json_discard(Method::DELETE, url, &body).await
    }
}
