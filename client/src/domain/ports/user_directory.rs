//! Driven port for user records.

use async_trait::async_trait;

use crate::domain::{Email, Role, Suspension, UserAccount, UserId};

use super::RemoteApiError;

/// Port for the remote user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every registered user (`GET /users`).
    async fn list_users(&self) -> Result<Vec<UserAccount>, RemoteApiError>;

    /// One user by email (`GET /users/:email`).
    async fn get_user(&self, email: &Email) -> Result<UserAccount, RemoteApiError>;

    /// Change a user's role (`PATCH /users/role/:email`).
    async fn update_role(&self, email: &Email, role: Role) -> Result<(), RemoteApiError>;

    /// Suspend a user (`DELETE /users/:id/suspend`).
    async fn suspend(&self, id: &UserId, suspension: &Suspension) -> Result<(), RemoteApiError>;
}
