//! The SNS publish client.
//!
//! Every call runs the same pipeline: encode the form body, sign a
//! `POST /` request for the `sns` service, send it through the
//! [`HttpExchange`], then decode the XML response or error body.
//! `PublishBatch` runs the pipeline once per chunk of at most ten entries,
//! strictly one chunk after another.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use minisns_auth::{RequestSigner, SigV4Signer};
use minisns_model::{
    PublishBatchRequest, PublishBatchResponse, PublishRequest, PublishResponse, SnsAction,
};
use tracing::{debug, warn};

use crate::batch::{MAX_BATCH_ENTRIES, split_entries};
use crate::config::SnsClientConfig;
use crate::decode::{parse_publish_batch_response, parse_publish_response, service_error};
use crate::encode::{FormFields, batch_fields, publish_fields};
use crate::error::{SnsError, TransportError};
use crate::transport::{HttpExchange, ReqwestExchange};

/// The signing name of the service.
const SERVICE: &str = "sns";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A minimal SNS client supporting `Publish` and `PublishBatch`.
///
/// The client owns its transport and signer for its whole lifetime and can
/// be shared across tasks; calls do not share mutable state.
pub struct SnsClient {
    region: String,
    host: String,
    transport: Arc<dyn HttpExchange>,
    signer: Arc<dyn RequestSigner>,
    destroyed: AtomicBool,
}

impl std::fmt::Debug for SnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnsClient")
            .field("region", &self.region)
            .field("host", &self.host)
            .field("destroyed", &self.destroyed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl SnsClient {
    /// Create a client with a pooled HTTP transport and a SigV4 signer that
    /// reads credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: SnsClientConfig) -> Result<Self, SnsError> {
        let endpoint = config.resolve_endpoint()?;
        let transport = ReqwestExchange::new(endpoint.url, &config)?;
        Self::with_parts(
            &config,
            Arc::new(transport),
            Arc::new(SigV4Signer::default()),
        )
    }

    /// Create a client from an explicit transport and signer.
    ///
    /// # Errors
    ///
    /// Returns [`SnsError::InvalidEndpoint`] if the endpoint is invalid.
    pub fn with_parts(
        config: &SnsClientConfig,
        transport: Arc<dyn HttpExchange>,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, SnsError> {
        let endpoint = config.resolve_endpoint()?;
        debug!(region = %config.region, host = %endpoint.host, "created SNS client");
        Ok(Self {
            region: config.region.clone(),
            host: endpoint.host,
            transport,
            signer,
            destroyed: AtomicBool::new(false),
        })
    }

    /// The region requests are signed for.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The `Host` header sent with every request.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Publish one message.
    ///
    /// # Errors
    ///
    /// Returns [`SnsError::Service`] with the resolved message when SNS
    /// answers with a non-success status, or another variant when the request
    /// cannot be signed, sent or decoded.
    pub async fn publish_message(
        &self,
        request: &PublishRequest,
    ) -> Result<PublishResponse, SnsError> {
        let body = self.send(SnsAction::Publish, &publish_fields(request)).await?;
        parse_publish_response(&body)
    }

    /// Publish any number of messages to one topic.
    ///
    /// Entries are split into chunks of ten, each sent as its own
    /// `PublishBatch` call, and the per-chunk `Successful` and `Failed` lists
    /// are concatenated in chunk order. Entries SNS rejects are reported in
    /// `Failed`, not as an error.
    ///
    /// # Errors
    ///
    /// The first chunk that fails aborts the call: later chunks are not sent
    /// and results of earlier chunks are discarded.
    pub async fn publish_message_batch(
        &self,
        request: PublishBatchRequest,
    ) -> Result<PublishBatchResponse, SnsError> {
        let PublishBatchRequest { topic_arn, entries } = request;
        let chunks = split_entries(entries, MAX_BATCH_ENTRIES);
        let total = chunks.len();
        let mut aggregated = PublishBatchResponse::default();

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(chunk = index + 1, total, entries = chunk.len(), "publishing batch chunk");
            let body = self
                .send(SnsAction::PublishBatch, &batch_fields(&topic_arn, chunk))
                .await?;
            aggregated.merge(parse_publish_batch_response(&body)?);
        }

        debug!(
            successful = aggregated.successful_count(),
            failed = aggregated.failed_count(),
            "batch publish completed"
        );
        Ok(aggregated)
    }

    /// Release the connection pool and, if `release_signer` is set, the
    /// signer.
    ///
    /// Only the first call releases anything. Publishing afterwards fails
    /// with [`SnsError::Closed`].
    pub async fn destroy(&self, release_signer: bool) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        if release_signer {
            tokio::join!(self.transport.close(), self.signer.close());
        } else {
            self.transport.close().await;
        }
        debug!(release_signer, "destroyed SNS client");
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Encode, sign and send one action, returning the success body.
    async fn send(&self, action: SnsAction, fields: &FormFields) -> Result<String, SnsError> {
        if self.is_destroyed() {
            return Err(SnsError::Closed);
        }

        let body = Bytes::from(fields.encode(action));
        let content_length = body.len();
        let request = http::Request::builder()
            .method(http::Method::POST)
            .uri("/")
            .header(http::header::HOST, self.host.as_str())
            .body(body)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut request = self.signer.sign(request, SERVICE, &self.region).await?;
        let headers = request.headers_mut();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static(FORM_CONTENT_TYPE),
        );
        headers.insert(http::header::CONTENT_LENGTH, http::HeaderValue::from(content_length));

        debug!(%action, content_length, "sending SNS request");
        let response = self.transport.request(request).await?;
        let status = response.status();
        let text = String::from_utf8_lossy(response.body()).into_owned();

        if !status.is_success() {
            let err = service_error(status, &text);
            warn!(%action, status = status.as_u16(), code = ?err.code(), error = %err, "SNS request failed");
            return Err(err);
        }
        Ok(text)
    }
}
