//! Error types for the publish pipeline.

use minisns_auth::AuthError;
use minisns_xml::XmlError;

/// Errors raised by an [`HttpExchange`](crate::transport::HttpExchange).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request could not be converted for the underlying client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The connection pool has been released.
    #[error("Connection pool is closed")]
    Closed,
}

/// Errors returned by [`SnsClient`](crate::SnsClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum SnsError {
    /// SNS answered with a non-success status.
    ///
    /// `message` is the `ErrorResponse/Error/Message` of the body when present,
    /// otherwise the raw body text.
    #[error("{message}")]
    Service {
        /// HTTP status code.
        status: http::StatusCode,
        /// The `ErrorResponse/Error/Code` value, if the body carried one.
        code: Option<String>,
        /// Resolved failure reason.
        message: String,
    },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be signed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A success response was not well-formed XML.
    #[error("Failed to parse response: {0}")]
    Xml(#[from] XmlError),

    /// A success response lacked an expected element.
    #[error("Malformed response: missing {0}")]
    MalformedResponse(String),

    /// The configured endpoint is not a usable URL.
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The client has been destroyed.
    #[error("Client has been destroyed")]
    Closed,
}

impl SnsError {
    /// The HTTP status of a service error.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service error code, if SNS reported one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
