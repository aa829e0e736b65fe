//! HTTP transport core
//!
//! Turns a (method, endpoint URL, optional body) triple into response text,
//! enforcing authentication, the retry policy and two-level error
//! detection. Resource handlers never touch `reqwest` directly; they build
//! typed payloads and decode typed responses around these methods.
//!
//! # Design notes
//! - **Session in two places** - the token travels in the `Authorization`
//!   header and again as a `jwt` query parameter; the upstream API does not
//!   consistently read one location yet, so both stay until it does.
//! - **Retries are GET-only** - mutating verbs are never repeated to avoid
//!   duplicate side effects such as double resource creation.
//! - **Two failure layers** - the HTTP status is checked first, then (for
//!   enveloped endpoints) the application-level `status` field inside the
//!   body.

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::ApiEnvelope;
use crate::utils::log_sanitizer::truncate_for_log;

/// Extra attempts after the first one, GET requests only.
const MAX_GET_RETRIES: u32 = 2;

impl Client {
    pub(crate) async fn send_get(&self, url: &str) -> Result<String> {
        self.send_request::<()>(Method::GET, url, None, true).await
    }

    pub(crate) async fn send_post<B: Serialize>(&self, url: &str, body: &B) -> Result<String> {
        self.send_request(Method::POST, url, Some(body), true).await
    }

    /// POST without envelope validation, for the few legacy endpoints that
    /// answer with a bare JSON array instead of the shared envelope.
    pub(crate) async fn send_post_raw<B: Serialize>(&self, url: &str, body: &B) -> Result<String> {
        self.send_request(Method::POST, url, Some(body), false)
            .await
    }

    pub(crate) async fn send_put<B: Serialize>(&self, url: &str, body: &B) -> Result<String> {
        self.send_request(Method::PUT, url, Some(body), true).await
    }

    pub(crate) async fn send_delete<B: Serialize>(&self, url: &str, body: &B) -> Result<String> {
        self.send_request(Method::DELETE, url, Some(body), true)
            .await
    }

    /// Execute one API call and return the raw response text.
    ///
    /// Decoding the resource payload is the caller's job; when
    /// `validate_envelope` is set the shared `{status, message}` envelope is
    /// checked here first.
    pub(crate) async fn send_request<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        validate_envelope: bool,
    ) -> Result<String> {
        let payload = match body {
            Some(b) => serde_json::to_vec(b).map_err(|e| Error::Serialization {
                detail: e.to_string(),
            })?,
            None => Vec::new(),
        };

        let mut attempts_left = if method == Method::GET {
            MAX_GET_RETRIES
        } else {
            0
        };

        loop {
            log::debug!("{method} {url}");

            let response = self
                .http
                .request(method.clone(), url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .bearer_auth(&self.jwt)
                // The upstream API does not reliably read the Authorization
                // header yet; the token is duplicated as a query parameter
                // until it does.
                .query(&[("jwt", self.jwt.as_str())])
                .body(payload.clone())
                .send()
                .await
                .map_err(|e| Error::Transport {
                    detail: e.to_string(),
                })?;

            let status = response.status().as_u16();
            log::debug!("Response Status: {status}");

            // Reading the body to completion releases the connection back to
            // the pool on every exit path.
            let text = response.text().await.map_err(|e| Error::Transport {
                detail: format!("failed to read response body: {e}"),
            })?;

            if method == Method::GET && is_retryable_status(status) && attempts_left > 0 {
                attempts_left -= 1;
                log::warn!("{method} {url} returned HTTP {status}, retrying");
                continue;
            }

            if !(200..300).contains(&status) {
                return Err(Error::RequestFailed { status, body: text });
            }

            log::debug!("Response Body: {}", truncate_for_log(&text));

            if validate_envelope {
                check_envelope(status, &text)?;
            }

            return Ok(text);
        }
    }
}

/// Whether a response status makes a GET request worth repeating.
fn is_retryable_status(status: u16) -> bool {
    status == 408 || status >= 500
}

/// Check the application-level envelope of a 2xx response.
///
/// A missing `status` field counts as success; several endpoints return
/// envelope-less objects.
fn check_envelope(status: u16, text: &str) -> Result<()> {
    let envelope: ApiEnvelope = serde_json::from_str(text).map_err(|e| {
        log::error!("JSON parse failed: {e}");
        log::error!("Raw response: {}", truncate_for_log(text));
        Error::Decode {
            detail: e.to_string(),
        }
    })?;

    if envelope.status.as_deref() == Some("KO") {
        let message = envelope
            .message
            .unwrap_or_else(|| "unknown error".to_string());
        log::warn!("API error: {message}");
        return Err(Error::Api { status, message });
    }

    Ok(())
}

/// Parse response text into a typed value.
pub(crate) fn parse_json<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(|e| {
        log::error!("JSON parse failed: {e}");
        log::error!("Raw response: {}", truncate_for_log(text));
        Error::Decode {
            detail: e.to_string(),
        }
    })
}
