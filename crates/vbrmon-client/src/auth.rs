use crate::error::{ClientError, Result};
use crate::API_VERSION;
use serde::Deserialize;
use std::time::Duration;

const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchange credentials for a bearer token via the OAuth2 password grant.
///
/// The token endpoint requires the fixed `x-api-version` header like every
/// other endpoint; omitting it risks behavioral drift across server
/// versions. A single failed attempt is fatal for the poll cycle, no retry.
pub async fn obtain_token(
    http: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let url = format!("{base_url}/api/oauth2/token");
    let form = [
        ("grant_type", "password"),
        ("username", username),
        ("password", password),
    ];

    let response = http
        .post(&url)
        .header("x-api-version", API_VERSION)
        .form(&form)
        .timeout(TOKEN_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let reason = response.text().await.unwrap_or_default();
        return Err(ClientError::Auth {
            status: status.as_u16(),
            reason: truncate_reason(&reason),
        });
    }

    let token: TokenResponse = serde_json::from_slice(&response.bytes().await?)?;
    tracing::debug!(
        token_type = token.token_type.as_deref().unwrap_or("Bearer"),
        expires_in = token.expires_in,
        "token obtained"
    );
    Ok(token.access_token)
}

fn truncate_reason(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
