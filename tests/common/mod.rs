//! Shared test helpers.

#![allow(dead_code)]

use elestio_client::Client;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_EMAIL: &str = "dev@example.com";
pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_JWT: &str = "test-session-token";

/// Mount the sign-in endpoint answering with a fixed session token.
pub async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/checkAPIToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "jwt": TEST_JWT,
        })))
        .mount(server)
        .await;
}

/// Build a signed-in client against the mock server.
pub async fn signed_client(server: &MockServer) -> Client {
    mount_sign_in(server).await;
    Client::with_base_url(server.uri(), TEST_EMAIL, TEST_API_KEY)
        .await
        .expect("sign-in against the mock server should succeed")
}

/// The minimal all-good envelope.
pub fn ok_body() -> serde_json::Value {
    json!({"status": "OK"})
}
