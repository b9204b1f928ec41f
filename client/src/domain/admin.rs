//! User administration for admins.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::ports::UserDirectory;
use super::service_support::{map_remote_error, require_role};
use super::{Email, Error, Role, Session, UserAccount, UserId};

/// Validation errors for [`Suspension`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspensionValidationError {
    MissingReason,
    MissingFeedback,
}

impl fmt::Display for SuspensionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReason => write!(f, "a suspension reason is required"),
            Self::MissingFeedback => write!(f, "suspension feedback is required"),
        }
    }
}

impl std::error::Error for SuspensionValidationError {}

/// Why a user is being suspended.
///
/// Both fields are trimmed and must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspension {
    reason: String,
    feedback: String,
}

impl Suspension {
    /// Validate and build a suspension notice.
    pub fn new(
        reason: impl AsRef<str>,
        feedback: impl AsRef<str>,
    ) -> Result<Self, SuspensionValidationError> {
        let reason = reason.as_ref().trim();
        if reason.is_empty() {
            return Err(SuspensionValidationError::MissingReason);
        }
        let feedback = feedback.as_ref().trim();
        if feedback.is_empty() {
            return Err(SuspensionValidationError::MissingFeedback);
        }
        Ok(Self {
            reason: reason.to_owned(),
            feedback: feedback.to_owned(),
        })
    }

    /// Short reason shown to the user.
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    /// Longer explanation shown to the user.
    pub fn feedback(&self) -> &str {
        self.feedback.as_str()
    }
}

/// What a role change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// The API recorded the new role.
    Updated,
    /// The user already held the role; nothing was sent.
    Unchanged,
}

/// Admin user operations over a [`UserDirectory`] port.
#[derive(Clone)]
pub struct AdminService<U> {
    users: Arc<U>,
}

impl<U> AdminService<U> {
    /// Create an admin service.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> AdminService<U>
where
    U: UserDirectory,
{
    /// Every registered user.
    pub async fn list_users(&self, actor: &Session) -> Result<Vec<UserAccount>, Error> {
        require_role(actor, &[Role::Admin], "manage users")?;
        self.users
            .list_users()
            .await
            .map_err(|err| map_remote_error(err, "Failed to load users"))
    }

    /// One user by email. Any signed-in user may look themselves up.
    pub async fn get_user(&self, actor: &Session, email: &Email) -> Result<UserAccount, Error> {
        if actor.account().email() != email {
            require_role(actor, &[Role::Admin], "view other users")?;
        }
        self.users
            .get_user(email)
            .await
            .map_err(|err| map_remote_error(err, &format!("User {email} could not be loaded")))
    }

    /// Give `user` the role `role`, skipping the call when nothing changes.
    pub async fn change_role(
        &self,
        actor: &Session,
        user: &UserAccount,
        role: Role,
    ) -> Result<RoleChange, Error> {
        require_role(actor, &[Role::Admin], "change roles")?;
        if user.role() == role {
            return Ok(RoleChange::Unchanged);
        }
        self.users
            .update_role(user.email(), role)
            .await
            .map_err(|err| map_remote_error(err, "Failed to update role"))?;
        info!(user = %user.email(), from = %user.role(), to = %role, "role changed");
        Ok(RoleChange::Updated)
    }

    /// Suspend `user` with the given notice.
    pub async fn suspend(
        &self,
        actor: &Session,
        user: &UserId,
        suspension: &Suspension,
    ) -> Result<(), Error> {
        require_role(actor, &[Role::Admin], "suspend users")?;
        self.users
            .suspend(user, suspension)
            .await
            .map_err(|err| map_remote_error(err, "Failed to suspend user"))?;
        info!(user_id = %user, "user suspended");
        Ok(())
    }
}
