//! Error types for request signing.

/// Errors that can occur while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials could be resolved.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// A header that must be signed is absent from the request.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// A computed header value is not a valid HTTP header value.
    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),
}
