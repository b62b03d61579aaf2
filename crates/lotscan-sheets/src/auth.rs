//! Service-account OAuth: an RS256 JWT assertion exchanged for a bearer token.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for one hour, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Signs the JWT assertion for `key` issued at `issued_at` (Unix seconds).
///
/// # Errors
///
/// Returns [`SheetsError::Signing`] if the private key is not a valid RSA PEM.
pub fn build_assertion(
    key: &ServiceAccountKey,
    scope: &str,
    issued_at: i64,
) -> Result<String, SheetsError> {
    let claims = Claims {
        iss: key.client_email.clone(),
        scope: scope.to_owned(),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid.clone_from(&key.private_key_id);

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &signing_key)?)
}

/// Exchanges a freshly signed assertion for an access token at the key's
/// `token_uri`.
///
/// # Errors
///
/// - [`SheetsError::Signing`] if the assertion cannot be signed.
/// - [`SheetsError::TokenExchange`] if the endpoint answers non-2xx.
/// - [`SheetsError::Http`] on network failure.
pub async fn fetch_access_token(
    client: &Client,
    key: &ServiceAccountKey,
    scope: &str,
) -> Result<String, SheetsError> {
    let assertion = build_assertion(key, scope, chrono::Utc::now().timestamp())?;

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(SheetsError::TokenExchange {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: "token exchange".to_owned(),
            source: e,
        })?;
    tracing::debug!(client_email = %key.client_email, "obtained Sheets access token");
    Ok(token.access_token)
}
