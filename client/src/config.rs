//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `LOANLINK_*` environment variables and configuration
//! files; the binary's global flags override them.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{BearerToken, Email};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Problems found while interpreting [`ClientSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("api_url {value:?} is not a valid URL: {source}")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request_timeout_secs must be at least 1")]
    ZeroTimeout,
    #[error("token and email must be configured together")]
    IncompleteCredentials,
    #[error("configured email is invalid: {0}")]
    InvalidEmail(String),
    #[error("configured token is invalid: {0}")]
    InvalidToken(String),
}

/// Configuration for talking to the LoanLink API.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOANLINK")]
pub struct ClientSettings {
    /// Base URL of the REST API.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Emit logs as JSON lines.
    #[ortho_config(default = false)]
    pub json_logs: bool,
    /// Identity-provider ID token sent as the bearer credential.
    pub token: Option<String>,
    /// Email of the user the token belongs to.
    pub email: Option<String>,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("json_logs", &self.json_logs)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .finish()
    }
}

impl ClientSettings {
    /// Return the API base URL, falling back to the local default.
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(raw).map_err(|source| SettingsError::InvalidApiUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Return the request timeout, falling back to thirty seconds.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the configured identity, if any.
    ///
    /// Blank values count as missing. A token without an email (or the
    /// reverse) is rejected rather than silently ignored.
    pub fn credentials(&self) -> Result<Option<(Email, BearerToken)>, SettingsError> {
        let token = self.token.as_deref().filter(|raw| !raw.trim().is_empty());
        let email = self.email.as_deref().filter(|raw| !raw.trim().is_empty());
        match (email, token) {
            (None, None) => Ok(None),
            (Some(email), Some(token)) => {
                let email =
                    Email::new(email).map_err(|err| SettingsError::InvalidEmail(err.to_string()))?;
                let token = BearerToken::new(token)
                    .map_err(|err| SettingsError::InvalidToken(err.to_string()))?;
                Ok(Some((email, token)))
            }
            _ => Err(SettingsError::IncompleteCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "LOANLINK_API_URL",
        "LOANLINK_REQUEST_TIMEOUT_SECS",
        "LOANLINK_JSON_LOGS",
        "LOANLINK_TOKEN",
        "LOANLINK_EMAIL",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("loanlink")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_url().expect("default url").as_str(),
            "http://localhost:5000/"
        );
        assert_eq!(
            settings.request_timeout().expect("default timeout"),
            Duration::from_secs(30)
        );
        assert!(!settings.json_logs);
        assert!(settings.credentials().expect("no credentials").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("LOANLINK_API_URL", Some("https://api.loanlink.test/v1/".to_owned())),
            ("LOANLINK_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("LOANLINK_JSON_LOGS", Some("true".to_owned())),
            ("LOANLINK_TOKEN", Some("id-token".to_owned())),
            ("LOANLINK_EMAIL", Some("amina@loanlink.test".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_url().expect("url").as_str(),
            "https://api.loanlink.test/v1/"
        );
        assert_eq!(
            settings.request_timeout().expect("timeout"),
            Duration::from_secs(5)
        );
        assert!(settings.json_logs);
        let (email, token) = settings
            .credentials()
            .expect("valid credentials")
            .expect("credentials present");
        assert_eq!(email.as_ref(), "amina@loanlink.test");
        assert_eq!(token.expose(), "id-token");
    }

    fn settings(token: Option<&str>, email: Option<&str>) -> ClientSettings {
        ClientSettings {
            api_url: None,
            request_timeout_secs: None,
            json_logs: false,
            token: token.map(str::to_owned),
            email: email.map(str::to_owned),
        }
    }

    #[rstest]
    #[case::token_only(Some("id-token"), None)]
    #[case::email_only(None, Some("amina@loanlink.test"))]
    #[case::blank_email(Some("id-token"), Some("  "))]
    fn half_configured_identity_is_rejected(
        #[case] token: Option<&str>,
        #[case] email: Option<&str>,
    ) {
        assert!(matches!(
            settings(token, email).credentials(),
            Err(SettingsError::IncompleteCredentials)
        ));
    }

    #[rstest]
    fn debug_output_redacts_the_token() {
        let rendered = format!("{:?}", settings(Some("id-token"), Some("a@loanlink.test")));
        assert!(!rendered.contains("id-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let mut settings = settings(None, None);
        settings.request_timeout_secs = Some(0);
        assert!(matches!(
            settings.request_timeout(),
            Err(SettingsError::ZeroTimeout)
        ));
    }

    #[rstest]
    fn malformed_url_is_reported() {
        let mut settings = settings(None, None);
        settings.api_url = Some("not a url".to_owned());
        assert!(matches!(
            settings.api_url(),
            Err(SettingsError::InvalidApiUrl { .. })
        ));
    }
}
