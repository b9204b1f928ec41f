//! Tests for the domain error type.

use super::*;
use rstest::rstest;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("sign in"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(ErrorCode::Forbidden, "not permitted")]
#[case(ErrorCode::ServiceUnavailable, "the LoanLink API is unavailable")]
fn blank_messages_fall_back_to_the_code(#[case] code: ErrorCode, #[case] expected: &str) {
    let error = Error::new(code, "   ");
    assert_eq!(error.message(), expected);
}

#[rstest]
#[case(Some("Loan limit exceeded".to_owned()), "Loan limit exceeded")]
#[case(Some("   ".to_owned()), "Application failed")]
#[case(None, "Application failed")]
fn from_remote_keeps_server_message_verbatim(
    #[case] message: Option<String>,
    #[case] expected: &str,
) {
    let error = Error::from_remote(ErrorCode::InvalidRequest, message, "Application failed");
    assert_eq!(error.message(), expected);
    assert_eq!(error.to_string(), expected);
}
