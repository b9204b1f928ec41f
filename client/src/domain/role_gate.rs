//! Role-based route guard.
//!
//! The gate is evaluated on every route entry and never caches a decision.
//! While the session is still resolving it answers [`GateDecision::Loading`]
//! so that protected content is never shown before the role is known.

use super::navigation::{Access, Destination};
use super::session::{SessionContext, SessionState};
use super::Role;

/// Outcome of evaluating a gate for one route entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session or role still resolving; show a placeholder.
    Loading,
    /// No session; send the user to login and come back afterwards.
    RedirectToLogin {
        /// Location the user originally asked for.
        return_to: Destination,
    },
    /// Signed in with a role outside the allow-list.
    RedirectToAccessDenied,
    /// Signed in and allowed.
    Render,
}

impl GateDecision {
    /// Destination the caller should move to, if any.
    pub fn redirect(&self) -> Option<Destination> {
        match self {
            Self::RedirectToLogin { .. } => Some(Destination::Login),
            Self::RedirectToAccessDenied => Some(Destination::AccessDenied),
            Self::Loading | Self::Render => None,
        }
    }
}

/// Guard over an allow-list of roles.
///
/// # Examples
/// ```
/// use loanlink::domain::{Destination, GateDecision, Role, RoleGate, SessionState};
///
/// let gate = RoleGate::new(&[Role::Manager]);
/// let decision = gate.evaluate(&SessionState::SignedOut, &Destination::AddLoan);
/// assert_eq!(
///     decision,
///     GateDecision::RedirectToLogin { return_to: Destination::AddLoan }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    access: Access,
}

impl RoleGate {
    /// Gate admitting the listed roles.
    pub fn new(allowed: &'static [Role]) -> Self {
        Self {
            access: Access::Roles(allowed),
        }
    }

    /// Gate guarding `destination` according to the route table.
    pub fn for_destination(destination: &Destination) -> Self {
        Self {
            access: destination.access(),
        }
    }

    /// Decide what to do with a request for `requested`.
    pub fn evaluate(&self, state: &SessionState, requested: &Destination) -> GateDecision {
        let Access::Roles(_) = self.access else {
            return GateDecision::Render;
        };
        match state {
            SessionState::Resolving => GateDecision::Loading,
            SessionState::SignedOut => GateDecision::RedirectToLogin {
                return_to: requested.clone(),
            },
            SessionState::SignedIn(session) if self.access.permits(session.role()) => {
                GateDecision::Render
            }
            SessionState::SignedIn(_) => GateDecision::RedirectToAccessDenied,
        }
    }
}

/// Evaluate the route-table gate for `destination` against `context`.
///
/// A login redirect is remembered on the context so that
/// [`SessionContext::complete_login`] can return to it.
pub fn enter(context: &mut SessionContext, destination: &Destination) -> GateDecision {
    let decision = RoleGate::for_destination(destination).evaluate(context.state(), destination);
    if let GateDecision::RedirectToLogin { return_to } = &decision {
        context.remember_return_to(return_to.clone());
    }
    decision
}
