//! Shared request plumbing for the API adapter.
//!
//! Owns transport details only: URL building, bearer authentication,
//! timeouts, HTTP error mapping and JSON decoding.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ErrorEnvelopeDto;
use crate::domain::BearerToken;
use crate::domain::ports::RemoteApiError;

/// Client for the LoanLink REST API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<BearerToken>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Build a client with an explicit request timeout.
    /// ```rust,no_run
    /// use std::time::Duration;
    ///
    /// use loanlink::outbound::http::ApiClient;
    /// use reqwest::Url;
    ///
    /// let base = Url::parse("http://localhost:5000")?;
    /// let client = ApiClient::new(base, Duration::from_secs(30))?;
    /// # let _ = client;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            token: None,
        })
    }

    /// Attach `token` to every subsequent request.
    pub fn with_token(mut self, token: BearerToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Resolve `segments` under the base URL, percent-encoding each one.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteApiError::transport(format!("base URL {} cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token.expose())),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>, RemoteApiError> {
        let request = builder.build().map_err(map_transport_error)?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();
        debug!(%method, %path, "calling API");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            warn!(
                %method,
                %path,
                status = status.as_u16(),
                body = %body_preview(body.as_ref()),
                "API rejected request"
            );
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    /// `GET` `url` and decode the JSON body.
    pub(super) async fn get_json<T>(&self, url: Url) -> Result<T, RemoteApiError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(self.request(Method::GET, url)).await?;
        decode(&body)
    }

    /// Send `payload` as JSON and decode the JSON reply.
    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        payload: &B,
    ) -> Result<T, RemoteApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.request(method, url).json(payload))
            .await?;
        decode(&body)
    }

    /// Send `payload` as JSON, ignoring the reply body.
    pub(super) async fn send_json_discard<B>(
        &self,
        method: Method,
        url: Url,
        payload: &B,
    ) -> Result<(), RemoteApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(method, url).json(payload))
            .await
            .map(drop)
    }

    /// Send a bodiless request, ignoring the reply body.
    pub(super) async fn send_empty(&self, method: Method, url: Url) -> Result<(), RemoteApiError> {
        self.execute(self.request(method, url)).await.map(drop)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteApiError> {
    serde_json::from_slice(body).map_err(|error| {
        RemoteApiError::decode(format!(
            "{error}; body: {preview}",
            preview = body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> RemoteApiError {
    if error.is_timeout() {
        RemoteApiError::timeout(error.to_string())
    } else {
        RemoteApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteApiError {
    let message = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty());
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RemoteApiError::timeout(format!("status {}", status.as_u16()))
        }
        _ => RemoteApiError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network request helpers.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> ApiClient {
        let base = Url::parse("http://localhost:5000/api/").expect("base url");
        ApiClient::new(base, Duration::from_secs(5)).expect("client builds")
    }

    #[rstest]
    fn endpoint_appends_encoded_segments(client: ApiClient) {
        let url = client
            .endpoint(&["users", "role", "a b@loanlink.test"])
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/users/role/a%20b@loanlink.test"
        );
    }

    #[rstest]
    fn bearer_header_is_attached_when_signed_in(client: ApiClient) {
        let client = client.with_token(BearerToken::new("id-token").expect("token"));
        let url = client.endpoint(&["loans"]).expect("endpoint");
        let request = client
            .request(Method::GET, url)
            .build()
            .expect("request builds");
        assert_eq!(
            request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer id-token")
        );
    }

    #[rstest]
    fn anonymous_requests_carry_no_credentials(client: ApiClient) {
        let url = client.endpoint(&["loans"]).expect("endpoint");
        let request = client
            .request(Method::GET, url)
            .build()
            .expect("request builds");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[rstest]
    fn debug_output_hides_the_token(client: ApiClient) {
        let client = client.with_token(BearerToken::new("id-token").expect("token"));
        assert!(!format!("{client:?}").contains("id-token"));
    }

    #[rstest]
    #[case::with_message(
        StatusCode::CONFLICT,
        br#"{"message":"Duplicate application"}"#.as_slice(),
        Some("Duplicate application")
    )]
    #[case::blank_message(StatusCode::BAD_REQUEST, br#"{"message":"  "}"#.as_slice(), None)]
    #[case::html_body(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>".as_slice(), None)]
    fn status_errors_keep_envelope_message(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: Option<&str>,
    ) {
        match map_status_error(status, body) {
            RemoteApiError::Rejected {
                status: code,
                message,
            } => {
                assert_eq!(code, status.as_u16());
                assert_eq!(message.as_deref(), expected);
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[rstest]
    fn gateway_timeouts_map_to_timeout() {
        assert!(matches!(
            map_status_error(StatusCode::GATEWAY_TIMEOUT, b""),
            RemoteApiError::Timeout { .. }
        ));
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    fn undecodable_bodies_map_to_decode_errors() {
        let result: Result<Vec<u32>, _> = decode(b"{\"not\":\"a list\"}");
        assert!(matches!(result, Err(RemoteApiError::Decode { .. })));
    }
}
