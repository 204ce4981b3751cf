//! Login against the upstream salon API.
//!
//! Two stages: a local gate check against the configured admin password
//! (no network traffic on mismatch), then a token request using the
//! credential taken from the process environment.

use crate::config::AppConfig;
use crate::error::LoginError;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Run the full login flow and return the access token.
pub async fn login(config: &AppConfig, username: &str, typed_password: &str) -> Result<String, LoginError> {
    if typed_password != config.auth.gate_password {
        return Err(LoginError::InvalidCredentials);
    }

    let credential = std::env::var(&config.auth.credential_env)
        .map_err(|_| LoginError::MissingCredential(config.auth.credential_env.clone()))?;

    request_token(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
        username,
        &credential,
    )
    .await
}

/// Request an access token from `/login`.
///
/// 201 with an `access_token` body is the only success shape; 404 means
/// bad credentials, anything else is unexpected.
pub async fn request_token(
    base_url: &str,
    timeout: Duration,
    username: &str,
    credential: &str,
) -> Result<String, LoginError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LoginError::Connection(e.to_string()))?;

    let url = format!("{base}/login", base = base_url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .query(&[("name", username), ("password", credential)])
        .send()
        .await
        .map_err(|e| LoginError::Connection(e.to_string()))?;

    match response.status().as_u16() {
        201 => {
            let body: LoginResponse = response
                .json()
                .await
                .map_err(|e| LoginError::Decode(e.to_string()))?;
            tracing::info!("Login successful");
            Ok(body.access_token)
        }
        404 => Err(LoginError::InvalidCredentials),
        status => Err(LoginError::Unexpected(status)),
    }
}
