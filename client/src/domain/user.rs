//! User account model and roles.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserAccount::try_from_parts`] and the
/// value types it is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain whitespace"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::UnknownRole { value } => {
                write!(f, "role must be borrower, manager, or admin (got {value:?})")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier assigned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address identifying a user towards the remote API.
///
/// The API keys users, applications and loan ownership by email, so this is
/// the identity most operations carry around. Stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 80;

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Marketplace role deciding which routes and actions a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses loans and applies for them. Assigned when nothing else is known.
    #[default]
    Borrower,
    /// Authors loan products and reviews applications.
    Manager,
    /// Manages users and sees aggregate data.
    Admin,
}

impl Role {
    /// Every role, in privilege order.
    pub const ALL: [Self; 3] = [Self::Borrower, Self::Manager, Self::Admin];

    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Borrower => "borrower",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    /// Whether the role may review loan applications.
    pub fn can_review_applications(self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "borrower" => Ok(Self::Borrower),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole {
                value: value.to_owned(),
            }),
        }
    }
}

/// Marketplace user account.
///
/// ## Invariants
/// - `email` is a syntactically valid address.
/// - `role` defaults to [`Role::Borrower`] when the record carries none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserAccountDto", into = "UserAccountDto")]
pub struct UserAccount {
    id: UserId,
    email: Email,
    display_name: Option<DisplayName>,
    photo_url: Option<String>,
    role: Role,
}

impl UserAccount {
    /// Build a new [`UserAccount`] from validated components.
    pub fn new(id: UserId, email: Email, role: Role) -> Self {
        Self {
            id,
            email,
            display_name: None,
            photo_url: None,
            role,
        }
    }

    /// Fallible constructor from raw strings.
    pub fn try_from_parts(
        id: impl Into<String>,
        email: impl AsRef<str>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(UserId::new(id)?, Email::new(email)?, role))
    }

    /// Attach a display name.
    pub fn with_display_name(mut self, display_name: DisplayName) -> Self {
        self.display_name = Some(display_name);
        self
    }

    /// Attach a profile photo URL.
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Email the API keys the user by.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name, when the user has set one.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Profile photo URL, when present.
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Current role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Return a copy carrying a different role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserAccountDto {
    #[serde(alias = "_id")]
    id: String,
    email: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(
        default,
        alias = "photoURL",
        alias = "photo",
        skip_serializing_if = "Option::is_none"
    )]
    photo_url: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl From<UserAccount> for UserAccountDto {
    fn from(value: UserAccount) -> Self {
        let UserAccount {
            id,
            email,
            display_name,
            photo_url,
            role,
        } = value;
        Self {
            id: id.into(),
            email: email.into(),
            display_name: display_name.map(Into::into),
            photo_url,
            role: Some(role.as_str().to_owned()),
        }
    }
}

impl TryFrom<UserAccountDto> for UserAccount {
    type Error = UserValidationError;

    fn try_from(value: UserAccountDto) -> Result<Self, Self::Error> {
        let role = match value.role.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Role::default(),
        };
        let display_name = value
            .display_name
            .filter(|name| !name.trim().is_empty())
            .map(DisplayName::new)
            .transpose()?;
        let photo_url = value.photo_url.filter(|url| !url.trim().is_empty());

        Ok(Self {
            id: UserId::new(value.id)?,
            email: Email::new(value.email)?,
            display_name,
            photo_url,
            role,
        })
    }
}

#[cfg(test)]
mod tests;
