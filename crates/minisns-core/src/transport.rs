//! HTTP exchange with the SNS endpoint.
//!
//! The publish pipeline talks to the network only through [`HttpExchange`].
//! [`ReqwestExchange`] is the pooled implementation used by
//! [`SnsClient::new`](crate::SnsClient::new); tests substitute their own.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::Url;
use tracing::debug;

use crate::config::SnsClientConfig;
use crate::error::TransportError;

/// Sends one request and returns the full response.
///
/// Requests carry a path-only URI; the implementation decides which endpoint
/// they go to.
#[async_trait]
pub trait HttpExchange: Send + Sync {
    /// Send `request` and read the whole response body.
    async fn request(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError>;

    /// Release pooled connections. Later requests fail.
    async fn close(&self) {}
}

/// A pooled `reqwest` client bound to one endpoint.
#[derive(Debug)]
pub struct ReqwestExchange {
    endpoint: Url,
    client: Mutex<Option<reqwest::Client>>,
}

impl ReqwestExchange {
    /// Create a client for `endpoint` with the pool settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the client cannot be built.
    pub fn new(endpoint: Url, config: &SnsClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            endpoint,
            client: Mutex::new(Some(client)),
        })
    }

    fn client(&self) -> Result<reqwest::Client, TransportError> {
        self.client.lock().clone().ok_or(TransportError::Closed)
    }

    fn url_for(&self, uri: &http::Uri) -> Result<Url, TransportError> {
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        self.endpoint
            .join(path_and_query)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl HttpExchange for ReqwestExchange {
    async fn request(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let client = self.client()?;
        let (parts, body) = request.into_parts();
        let url = self.url_for(&parts.uri)?;

        let response = client
            .request(parts.method, url)
            .headers(parts.headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut builder = http::Response::builder().status(status);
        if let Some(map) = builder.headers_mut() {
            *map = headers;
        }
        builder
            .body(body)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }

    async fn close(&self) {
        if self.client.lock().take().is_some() {
            debug!(endpoint = %self.endpoint, "released connection pool");
        }
    }
}
