//! Client construction and handler access.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::error::{Error, Result};
use crate::handlers::load_balancer::LoadBalancerHandler;
use crate::handlers::project::ProjectHandler;
use crate::handlers::service::ServiceHandler;

/// Production API endpoint.
pub const BASE_URL: &str = "https://api.elest.io";

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Authenticated Elestio API client.
///
/// Construction performs a single sign-in round trip that exchanges the
/// account email and API key for a session token; the token is attached to
/// every subsequent request and is never refreshed. The client is cheap to
/// share across call sites (`&Client`) since nothing mutates after
/// construction.
pub struct Client {
    pub(crate) http: HttpClient,
    pub(crate) base_url: String,
    pub(crate) email: String,
    pub(crate) api_key: String,
    pub(crate) jwt: String,
}

impl Client {
    /// Sign in against the production API and return a ready-to-use client.
    ///
    /// Fails with [`Error::Configuration`] when either credential is empty,
    /// before any network call. Any sign-in failure is fatal; there is no
    /// partially-constructed client.
    pub async fn new(email: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(BASE_URL, email, api_key).await
    }

    /// Sign in against a custom base URL (self-hosted installs, tests).
    pub async fn with_base_url(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let (email, api_key) = (email.into(), api_key.into());

        if email.is_empty() {
            return Err(Error::Configuration {
                detail: "email is required".to_string(),
            });
        }
        if api_key.is_empty() {
            return Err(Error::Configuration {
                detail: "api key is required".to_string(),
            });
        }

        let mut client = Self {
            http: create_http_client(),
            base_url: normalize_base_url(base_url.into()),
            email,
            api_key,
            jwt: String::new(),
        };
        client.jwt = client.sign_in().await?;

        Ok(client)
    }

    /// Build a token-less client.
    ///
    /// Only the public endpoints (the template catalog) accept calls
    /// without a session.
    #[must_use]
    pub fn unsigned() -> Self {
        Self::unsigned_with_base_url(BASE_URL)
    }

    /// Token-less client against a custom base URL.
    #[must_use]
    pub fn unsigned_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: create_http_client(),
            base_url: normalize_base_url(base_url.into()),
            email: String::new(),
            api_key: String::new(),
            jwt: String::new(),
        }
    }

    /// Handler for project endpoints.
    #[must_use]
    pub fn project(&self) -> ProjectHandler<'_> {
        ProjectHandler { client: self }
    }

    /// Handler for service endpoints.
    #[must_use]
    pub fn service(&self) -> ServiceHandler<'_> {
        ServiceHandler { client: self }
    }

    /// Handler for load balancer endpoints.
    #[must_use]
    pub fn load_balancer(&self) -> LoadBalancerHandler<'_> {
        LoadBalancerHandler { client: self }
    }

    /// The account email this client signed in with.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Create the shared HTTP client with timeout configuration.
fn create_http_client() -> HttpClient {
    HttpClient::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_email_rejected_before_any_network_call() {
        // An unroutable base URL: reaching the network would fail with a
        // transport error, not a configuration error.
        let result = Client::with_base_url("http://127.0.0.1:1", "", "some-key").await;
        assert!(
            matches!(&result, Err(Error::Configuration { detail }) if detail == "email is required"),
            "unexpected result: {:?}",
            result.err()
        );
    }

    #[tokio::test]
    async fn empty_api_key_rejected_before_any_network_call() {
        let result = Client::with_base_url("http://127.0.0.1:1", "dev@example.com", "").await;
        assert!(
            matches!(&result, Err(Error::Configuration { detail }) if detail == "api key is required"),
            "unexpected result: {:?}",
            result.err()
        );
    }

    #[test]
    fn base_url_trailing_slash_stripped() {
        let c = Client::unsigned_with_base_url("https://api.example.com/");
        assert_eq!(c.base_url(), "https://api.example.com");
    }
}
