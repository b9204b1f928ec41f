//! Signed-in session state.
//!
//! A [`SessionContext`] is created once at process start and handed to
//! whatever needs the current user. It replaces ambient UI state: callers
//! pass it explicitly and tear it down with [`SessionContext::sign_out`].

use std::fmt;

use zeroize::Zeroizing;

use super::navigation::Destination;
use super::{Role, UserAccount};

/// Validation error for identity-provider tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    /// Token was blank once trimmed.
    Empty,
}

impl fmt::Display for TokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "bearer token must not be empty"),
        }
    }
}

impl std::error::Error for TokenValidationError {}

/// Identity-provider token attached to outgoing requests.
///
/// The secret is zeroized on drop and never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Validate and wrap a raw token.
    pub fn new(token: impl AsRef<str>) -> Result<Self, TokenValidationError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TokenValidationError::Empty);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Raw token value, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Authenticated user plus the token that proves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account: UserAccount,
    token: BearerToken,
}

impl Session {
    /// Pair an account with its token.
    pub fn new(account: UserAccount, token: BearerToken) -> Self {
        Self { account, token }
    }

    /// Signed-in account.
    pub fn account(&self) -> &UserAccount {
        &self.account
    }

    /// Role claim of the signed-in account.
    pub fn role(&self) -> Role {
        self.account.role()
    }

    /// Token attached to outgoing requests.
    pub fn token(&self) -> &BearerToken {
        &self.token
    }
}

/// Resolution state of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Session or role lookup still in flight.
    #[default]
    Resolving,
    /// No signed-in user.
    SignedOut,
    /// Signed-in user with a resolved role.
    SignedIn(Session),
}

impl SessionState {
    /// The session, when signed in.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::Resolving | Self::SignedOut => None,
        }
    }
}

/// Explicitly passed session holder.
///
/// Also remembers where an unauthenticated user was heading so that a
/// successful login can send them back there.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: SessionState,
    return_to: Option<Destination>,
}

impl SessionContext {
    /// Fresh context whose session is still resolving.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context resolved to a signed-out state.
    pub fn signed_out() -> Self {
        Self {
            state: SessionState::SignedOut,
            return_to: None,
        }
    }

    /// Context resolved to `session`.
    pub fn signed_in(session: Session) -> Self {
        Self {
            state: SessionState::SignedIn(session),
            return_to: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current session, when signed in.
    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    /// Remember a destination to return to after login.
    pub fn remember_return_to(&mut self, destination: Destination) {
        self.return_to = Some(destination);
    }

    /// Install a freshly authenticated session.
    ///
    /// Returns the remembered destination, or the dashboard home when none
    /// was recorded, and forgets it.
    pub fn complete_login(&mut self, session: Session) -> Destination {
        self.state = SessionState::SignedIn(session);
        self.return_to.take().unwrap_or(Destination::DashboardHome)
    }

    /// Drop the session and any remembered destination.
    pub fn sign_out(&mut self) {
        self.state = SessionState::SignedOut;
        self.return_to = None;
    }
}
