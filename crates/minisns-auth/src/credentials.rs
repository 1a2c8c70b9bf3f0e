//! Credentials and credential providers.
//!
//! A [`CredentialsProvider`] resolves the key pair used to sign a request.
//! [`EnvironmentCredentialsProvider`] reads the standard `AWS_*` variables on
//! every call, so rotated credentials are picked up without a restart.
//! [`StaticCredentialsProvider`] is meant for tests and local endpoints.

use std::fmt;

use crate::error::AuthError;

/// An AWS access key pair, optionally with a session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create long-term credentials.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Resolves the credentials used to sign a request.
pub trait CredentialsProvider: Send + Sync {
    /// Return the credentials to sign with.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] if none are available.
    fn credentials(&self) -> Result<Credentials, AuthError>;
}

/// A provider that always returns the same credentials.
///
/// # Examples
///
/// ```
/// use minisns_auth::{CredentialsProvider, StaticCredentialsProvider};
///
/// let provider = StaticCredentialsProvider::new("AKID", "secret");
/// assert_eq!(provider.credentials().unwrap().access_key_id, "AKID");
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    /// Create a provider from an access key pair.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key_id, secret_access_key),
        }
    }

    /// Create a provider from prepared credentials.
    #[must_use]
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        Ok(self.credentials.clone())
    }
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentCredentialsProvider;

impl CredentialsProvider for EnvironmentCredentialsProvider {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        let access_key_id = non_empty_env("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| AuthError::MissingCredentials("AWS_ACCESS_KEY_ID is not set".to_owned()))?;
        let secret_access_key = non_empty_env("AWS_SECRET_ACCESS_KEY").ok_or_else(|| {
            AuthError::MissingCredentials("AWS_SECRET_ACCESS_KEY is not set".to_owned())
        })?;

        Ok(Credentials {
            access_key_id,
            secret_access_key,
            session_token: non_empty_env("AWS_SESSION_TOKEN"),
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
