//! Error shared by every port backed by the remote LoanLink API.

use super::define_port_error;

define_port_error! {
    /// Failures raised by remote API adapters.
    pub enum RemoteApiError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "remote API transport failed: {message}",
        /// Request exceeded the configured timeout.
        Timeout { message: String } =>
            "remote API timed out: {message}",
        /// API answered with a non-success status.
        ///
        /// `message` carries the optional `message` field of the error
        /// envelope, untouched.
        Rejected { status: u16, message: Option<String> } =>
            "remote API rejected the request with status {status}",
        /// Response body could not be decoded.
        Decode { message: String } =>
            "remote API response decode failed: {message}",
    }
}

impl RemoteApiError {
    /// HTTP status for rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode { .. } => None,
        }
    }
}
