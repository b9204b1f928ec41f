//! Resolves a signed-in user's account and role.

use std::sync::Arc;

use tracing::{info, warn};

use super::navigation::Destination;
use super::ports::UserDirectory;
use super::session::{BearerToken, Session, SessionContext};
use super::{Email, Error, Role, UserAccount, UserId};

/// Completes sign-in against a [`UserDirectory`].
#[derive(Clone)]
pub struct SignInService<U> {
    users: Arc<U>,
}

impl<U> SignInService<U> {
    /// Create a sign-in service.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> SignInService<U>
where
    U: UserDirectory,
{
    /// Look up `email`'s account and install the session on `context`.
    ///
    /// When the record cannot be fetched the user is signed in as a
    /// borrower. Returns the destination remembered before login, or the
    /// dashboard.
    pub async fn sign_in(
        &self,
        context: &mut SessionContext,
        email: Email,
        token: BearerToken,
    ) -> Result<Destination, Error> {
        let account = match self.users.get_user(&email).await {
            Ok(account) if account.email() == &email => account,
            Ok(account) => {
                warn!(
                    expected = %email,
                    got = %account.email(),
                    "user lookup returned another account"
                );
                fallback_account(&email)?
            }
            Err(err) => {
                warn!(error = %err, "role lookup failed; signing in as borrower");
                fallback_account(&email)?
            }
        };
        info!(user = %account.email(), role = %account.role(), "signed in");
        Ok(context.complete_login(Session::new(account, token)))
    }
}

fn fallback_account(email: &Email) -> Result<UserAccount, Error> {
    let id = UserId::new(email.as_ref())
        .map_err(|err| Error::internal(format!("cannot derive a user id: {err}")))?;
    Ok(UserAccount::new(id, email.clone(), Role::Borrower))
}
