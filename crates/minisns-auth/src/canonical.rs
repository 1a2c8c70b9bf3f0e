//! Canonical request construction for AWS Signature Version 4.
//!
//! The canonical form of a request is:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! [`CanonicalRequest`] captures the normalized pieces of an outgoing
//! request; its `Display` output is the string that gets hashed.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Characters left unescaped by SigV4 URI encoding: `A-Z a-z 0-9 - _ . ~`.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The normalized components of a request to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    /// Lowercase name and normalized value, sorted by name.
    headers: Vec<(String, String)>,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request for `signed_headers` of the given request parts.
    ///
    /// Header names in `signed_headers` must be lowercase. Repeated headers are
    /// joined with commas in the order they appear.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingHeader`] if a signed header is absent or
    /// not visible ASCII.
    pub fn new(
        method: &http::Method,
        uri: &http::Uri,
        headers: &http::HeaderMap,
        signed_headers: &[&str],
        payload_hash: &str,
    ) -> Result<Self, AuthError> {
        let mut canonical_headers = Vec::with_capacity(signed_headers.len());
        for &name in signed_headers {
            let mut values = Vec::new();
            for value in headers.get_all(name) {
                let value = value
                    .to_str()
                    .map_err(|_| AuthError::MissingHeader(name.to_owned()))?;
                values.push(collapse_whitespace(value.trim()));
            }
            if values.is_empty() {
                return Err(AuthError::MissingHeader(name.to_owned()));
            }
            canonical_headers.push((name.to_ascii_lowercase(), values.join(",")));
        }
        canonical_headers.sort_unstable();

        Ok(Self {
            method: method.as_str().to_owned(),
            uri: canonical_uri(uri.path()),
            query: canonical_query_string(uri.query().unwrap_or("")),
            headers: canonical_headers,
            payload_hash: payload_hash.to_owned(),
        })
    }

    /// The `SignedHeaders` value: sorted lowercase names joined by `;`.
    #[must_use]
    pub fn signed_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Hex-encoded SHA-256 of the canonical request string.
    #[must_use]
    pub fn hash(&self) -> String {
        hex::encode(Sha256::digest(self.to_string().as_bytes()))
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        f.write_str(&self.payload_hash)
    }
}

/// URI-encode each path segment, keeping `/` separators.
///
/// Segments are decoded first so an already-encoded path is not encoded twice.
///
/// # Examples
///
/// ```
/// use minisns_auth::canonical::canonical_uri;
///
/// assert_eq!(canonical_uri(""), "/");
/// assert_eq!(canonical_uri("/a b/c"), "/a%20b/c");
/// ```
#[must_use]
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }
    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Sort query parameters by name, then value, re-encoding both.
///
/// # Examples
///
/// ```
/// use minisns_auth::canonical::canonical_query_string;
///
/// assert_eq!(canonical_query_string("b=2&a=x y"), "a=x%20y&b=2");
/// ```
#[must_use]
pub fn canonical_query_string(query: &str) -> String {
    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (reencode(key), reencode(value))
        })
        .collect();
    params.sort_unstable();
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn reencode(component: &str) -> String {
    let decoded = percent_decode_str(component).decode_utf8_lossy();
    utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
