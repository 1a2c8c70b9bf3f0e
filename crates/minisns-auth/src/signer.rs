//! The request signing capability consumed by the publish pipeline.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AuthError;

/// Signs outgoing requests for a service and region.
///
/// The returned request carries the original method, URI and body plus the
/// authentication headers the implementation adds or overrides. Signing may
/// perform I/O (for example to refresh credentials), hence `async`.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Sign `request` for `service` in `region`.
    async fn sign(
        &self,
        request: http::Request<Bytes>,
        service: &str,
        region: &str,
    ) -> Result<http::Request<Bytes>, AuthError>;

    /// Release any resources held by the signer.
    async fn close(&self) {}
}
