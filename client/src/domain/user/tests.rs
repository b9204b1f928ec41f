//! Tests for the user account model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "6571b2f0c9e77c0012a3f1d4";
const VALID_EMAIL: &str = "rahim@loanlink.test";

#[fixture]
fn account() -> UserAccount {
    UserAccount::try_from_parts(VALID_ID, VALID_EMAIL, Role::Manager).expect("valid account")
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("rahim", UserValidationError::InvalidEmail)]
#[case("rahim@localhost", UserValidationError::InvalidEmail)]
#[case("ra him@loanlink.test", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_is_trimmed() {
    let email = Email::new("  rahim@loanlink.test ").expect("valid email");
    assert_eq!(email.as_ref(), VALID_EMAIL);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("abc def", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_values(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn display_name_rejects_blank_and_overlong_values() {
    assert_eq!(
        DisplayName::new("  ").expect_err("blank"),
        UserValidationError::EmptyDisplayName
    );
    assert_eq!(
        DisplayName::new("a".repeat(DISPLAY_NAME_MAX + 1)).expect_err("too long"),
        UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        }
    );
}

#[rstest]
#[case("borrower", Role::Borrower)]
#[case("Manager", Role::Manager)]
#[case(" admin ", Role::Admin)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>().expect("known role"), expected);
}

#[rstest]
fn role_rejects_unknown_names() {
    let err = "owner".parse::<Role>().expect_err("unknown role");
    assert!(matches!(err, UserValidationError::UnknownRole { value } if value == "owner"));
}

#[rstest]
fn only_managers_and_admins_review_applications() {
    assert!(!Role::Borrower.can_review_applications());
    assert!(Role::Manager.can_review_applications());
    assert!(Role::Admin.can_review_applications());
}

#[rstest]
fn decodes_api_record_with_aliases() {
    let value = json!({
        "_id": VALID_ID,
        "email": VALID_EMAIL,
        "name": "Rahim Uddin",
        "photoURL": "https://img.test/rahim.png",
        "role": "admin",
        "createdAt": "2025-01-03T10:00:00Z"
    });
    let decoded: Result<UserAccount, _> = serde_json::from_value(value);
    let account = decoded.expect("decode account");

    assert_eq!(account.id().as_ref(), VALID_ID);
    assert_eq!(account.role(), Role::Admin);
    assert_eq!(
        account.display_name().map(AsRef::as_ref),
        Some("Rahim Uddin")
    );
    assert_eq!(account.photo_url(), Some("https://img.test/rahim.png"));
}

#[rstest]
fn missing_role_falls_back_to_borrower() {
    let value = json!({ "_id": VALID_ID, "email": VALID_EMAIL });
    let account: UserAccount = serde_json::from_value(value).expect("decode account");
    assert_eq!(account.role(), Role::Borrower);
    assert!(account.display_name().is_none());
}

#[rstest]
fn unknown_role_fails_decoding() {
    let value = json!({ "_id": VALID_ID, "email": VALID_EMAIL, "role": "owner" });
    let result: Result<UserAccount, _> = serde_json::from_value(value);
    assert!(result.is_err());
}

#[rstest]
fn serialises_camel_case(account: UserAccount) {
    let value = serde_json::to_value(account).expect("serialise account");
    assert_eq!(
        value,
        json!({ "id": VALID_ID, "email": VALID_EMAIL, "role": "manager" })
    );
}

#[rstest]
fn with_role_replaces_role_only(account: UserAccount) {
    let promoted = account.clone().with_role(Role::Admin);
    assert_eq!(promoted.role(), Role::Admin);
    assert_eq!(promoted.email(), account.email());
}
