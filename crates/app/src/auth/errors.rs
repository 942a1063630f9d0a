//! Auth service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The token is missing, malformed, expired or revoked.
    #[error("invalid or expired access token")]
    Unauthenticated,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from auth provider: {0}")]
    UnexpectedResponse(String),
}
