use std::fmt;

use serde::Deserialize;

use crate::error::SheetsError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a Google service-account JSON key that the uploader needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

impl ServiceAccountKey {
    /// Parses the credential blob.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::InvalidCredentials`] if the blob is not JSON or
    /// lacks `client_email` / `private_key`.
    pub fn from_json(blob: &str) -> Result<Self, SheetsError> {
        serde_json::from_str(blob).map_err(SheetsError::InvalidCredentials)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
