use thiserror::Error;

/// Errors returned by the Sheets uploader.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential blob is not a usable service-account key.
    #[error("invalid service-account credentials: {0}")]
    InvalidCredentials(#[source] serde_json::Error),

    /// The private key could not sign the token assertion.
    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The OAuth token endpoint refused the assertion.
    #[error("token exchange failed with HTTP {status}: {message}")]
    TokenExchange { status: u16, message: String },

    /// The service account has no access to the spreadsheet.
    #[error("permission denied; share the spreadsheet with {service_email} as an editor")]
    PermissionDenied { service_email: String },

    /// The Sheets API answered a request with a non-2xx status.
    #[error("Sheets API error during {context} (HTTP {status}): {message}")]
    Api {
        context: String,
        status: u16,
        message: String,
    },

    /// A response body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Sheets base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The read-back after writing found fewer rows than were written.
    #[error(
        "upload verification failed: expected at least {expected} rows, found {found}; \
         check that {service_email} has editor access"
    )]
    VerificationFailed {
        expected: usize,
        found: usize,
        service_email: String,
    },
}
