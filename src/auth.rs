//! Sign-in round trip.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::http::parse_json;

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    #[serde(rename = "token")]
    api_key: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    jwt: String,
}

impl Client {
    /// Exchange the account credentials for a session token.
    ///
    /// Called exactly once, during construction. The token is never
    /// refreshed; a rejected token later in the client's life surfaces as
    /// an API error on the failing call.
    pub(crate) async fn sign_in(&self) -> Result<String> {
        let url = format!("{}/api/auth/checkAPIToken", self.base_url);
        let body = AuthRequest {
            email: &self.email,
            api_key: &self.api_key,
        };

        let text = self.send_post(&url, &body).await?;
        let res: AuthResponse = parse_json(&text)?;

        Ok(res.jwt)
    }
}
