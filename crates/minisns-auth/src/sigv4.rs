//! AWS Signature Version 4 signing.
//!
//! Signing an outgoing request takes five steps:
//!
//! 1. Stamp the request with `x-amz-date`, `x-amz-content-sha256` and, for
//!    temporary credentials, `x-amz-security-token`.
//! 2. Build the [`CanonicalRequest`] over `host` and those headers.
//! 3. Build the string to sign from the timestamp, credential scope and the
//!    canonical request hash.
//! 4. Derive the signing key with the HMAC-SHA256 chain.
//! 5. Put the hex signature into the `Authorization` header.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::CanonicalRequest;
use crate::credentials::{CredentialsProvider, EnvironmentCredentialsProvider};
use crate::error::AuthError;
use crate::signer::RequestSigner;

/// The only algorithm this signer produces.
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";
const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

type HmacSha256 = Hmac<Sha256>;

/// Signs requests with AWS Signature Version 4.
#[derive(Clone)]
pub struct SigV4Signer {
    credentials: Arc<dyn CredentialsProvider>,
}

impl std::fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigV4Signer")
            .field("credentials", &"...")
            .finish()
    }
}

impl Default for SigV4Signer {
    fn default() -> Self {
        Self::new(Arc::new(EnvironmentCredentialsProvider))
    }
}

impl SigV4Signer {
    /// Create a signer backed by a credentials provider.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self { credentials }
    }

    /// Sign `request` as if the current time were `now`.
    ///
    /// The request must already carry a `host` header.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if credentials cannot be resolved, the `host`
    /// header is missing, or a computed header value is invalid.
    pub fn sign_at(
        &self,
        request: http::Request<Bytes>,
        service: &str,
        region: &str,
        now: DateTime<Utc>,
    ) -> Result<http::Request<Bytes>, AuthError> {
        let credentials = self.credentials.credentials()?;
        let (mut parts, body) = request.into_parts();

        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let payload_hash = hash_payload(&body);

        insert_header(&mut parts.headers, X_AMZ_DATE, &timestamp)?;
        insert_header(&mut parts.headers, X_AMZ_CONTENT_SHA256, &payload_hash)?;
        let mut signed_headers = vec!["host", X_AMZ_CONTENT_SHA256, X_AMZ_DATE];
        if let Some(token) = &credentials.session_token {
            insert_header(&mut parts.headers, X_AMZ_SECURITY_TOKEN, token)?;
            signed_headers.push(X_AMZ_SECURITY_TOKEN);
        }

        let canonical = CanonicalRequest::new(
            &parts.method,
            &parts.uri,
            &parts.headers,
            &signed_headers,
            &payload_hash,
        )?;
        debug!(canonical_request = %canonical, "built canonical request");

        let credential_scope = format!("{date}/{region}/{service}/aws4_request");
        let string_to_sign = build_string_to_sign(&timestamp, &credential_scope, &canonical.hash());
        let signing_key =
            derive_signing_key(&credentials.secret_access_key, &date, region, service);
        let signature = compute_signature(&signing_key, &string_to_sign);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={}, Signature={signature}",
            credentials.access_key_id,
            canonical.signed_headers(),
        );
        insert_header(&mut parts.headers, "authorization", &authorization)?;

        debug!(
            access_key_id = %credentials.access_key_id,
            %region,
            %service,
            "signed request"
        );
        Ok(http::Request::from_parts(parts, body))
    }
}

#[async_trait]
impl RequestSigner for SigV4Signer {
    async fn sign(
        &self,
        request: http::Request<Bytes>,
        service: &str,
        region: &str,
    ) -> Result<http::Request<Bytes>, AuthError> {
        self.sign_at(request, service, region, Utc::now())
    }
}

fn insert_header(headers: &mut http::HeaderMap, name: &'static str, value: &str) -> Result<(), AuthError> {
    let value = http::HeaderValue::from_str(value)
        .map_err(|_| AuthError::InvalidHeaderValue(name.to_owned()))?;
    headers.insert(name, value);
    Ok(())
}

/// Build the SigV4 string to sign.
///
/// # Examples
///
/// ```
/// use minisns_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the signing key for a date, region and service.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex-encoded SHA-256 of a request payload.
///
/// # Examples
///
/// ```
/// use minisns_auth::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
