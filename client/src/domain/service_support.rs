//! Helpers shared by the domain services.

use tracing::warn;

use super::ports::RemoteApiError;
use super::{Error, ErrorCode, Role, Session};

/// Map a remote API failure onto a domain error.
///
/// Rejections keep the server's `message` verbatim and use `fallback` when
/// the envelope carries none.
pub(crate) fn map_remote_error(error: RemoteApiError, fallback: &str) -> Error {
    warn!(error = %error, "remote API call failed");
    match error {
        RemoteApiError::Rejected { status, message } => {
            Error::from_remote(code_for_status(status), message, fallback)
        }
        RemoteApiError::Transport { message } => {
            Error::service_unavailable(format!("{fallback}: could not reach the API ({message})"))
        }
        RemoteApiError::Timeout { message } => {
            Error::service_unavailable(format!("{fallback}: the API timed out ({message})"))
        }
        RemoteApiError::Decode { message } => {
            Error::internal(format!("{fallback}: unexpected API response ({message})"))
        }
    }
}

fn code_for_status(status: u16) -> ErrorCode {
    match status {
        401 => ErrorCode::Unauthorized,
        403 => ErrorCode::Forbidden,
        404 => ErrorCode::NotFound,
        409 => ErrorCode::Conflict,
        500..=599 => ErrorCode::ServiceUnavailable,
        _ => ErrorCode::InvalidRequest,
    }
}

/// Fail with [`ErrorCode::Forbidden`] unless `actor` holds one of `allowed`.
pub(crate) fn require_role(actor: &Session, allowed: &[Role], action: &str) -> Result<(), Error> {
    let role = actor.role();
    if allowed.contains(&role) {
        return Ok(());
    }
    Err(Error::forbidden(format!(
        "{role} accounts are not allowed to {action}"
    )))
}
