//! Integration tests for the minisns publish client.
//!
//! Two kinds of tests live here:
//!
//! - loopback tests run the real client (SigV4 signing, `reqwest` transport)
//!   against an in-process hyper server and always run;
//! - LocalStack tests need a server at `localhost:4566` and are marked
//!   `#[ignore]`.
//!
//! Run the LocalStack tests with:
//! ```text
//! cargo test -p minisns-integration -- --ignored
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Once};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use minisns_auth::{SigV4Signer, StaticCredentialsProvider};
use minisns_core::{ReqwestExchange, SnsClient, SnsClientConfig};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for LocalStack.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("SNS_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create a client with test credentials pointing at `endpoint`.
///
/// # Panics
///
/// Panics if the endpoint is invalid.
#[must_use]
pub fn sns_client(endpoint: &str) -> SnsClient {
    init_tracing();

    let config = SnsClientConfig::builder()
        .region("us-east-1")
        .endpoint(endpoint)
        .build();
    let resolved = config.resolve_endpoint().expect("valid endpoint");
    let transport = ReqwestExchange::new(resolved.url, &config).expect("HTTP client");
    let signer = SigV4Signer::new(Arc::new(StaticCredentialsProvider::new("test", "test")));

    SnsClient::with_parts(&config, Arc::new(transport), Arc::new(signer)).expect("SNS client")
}

/// Generate a unique topic name for a test.
#[must_use]
pub fn test_topic_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// A request as seen by the [`LoopbackServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method.
    pub method: http::Method,
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Request body as text.
    pub body: String,
}

impl RecordedRequest {
    /// The decoded form fields of the body, in order.
    #[must_use]
    pub fn form(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }

    /// The value of a header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Handler = Arc<dyn Fn(usize, &RecordedRequest) -> (u16, String) + Send + Sync>;

/// An in-process HTTP server that records requests and answers through a
/// handler called with the request index and the request.
///
/// Redirect statuses are sent with `Location: /moved`.
#[derive(Debug)]
pub struct LoopbackServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl LoopbackServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(
        handler: impl Fn(usize, &RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(accept_loop(listener, Arc::clone(&requests), Arc::new(handler)));
        Ok(Self {
            addr,
            requests,
            task,
        })
    }

    /// The `http://` endpoint of the server.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

impl Drop for LoopbackServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn accept_loop(
    listener: TcpListener,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handler: Handler,
) {
    loop {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let requests = Arc::clone(&requests);
        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let service = service_fn(move |req: hyper::Request<Incoming>| {
                let requests = Arc::clone(&requests);
                let handler = Arc::clone(&handler);
                async move {
                    let (parts, body) = req.into_parts();
                    let body = match body.collect().await {
                        Ok(collected) => collected.to_bytes(),
                        Err(_) => Bytes::new(),
                    };
                    let recorded = RecordedRequest {
                        method: parts.method,
                        path: parts.uri.path().to_owned(),
                        headers: parts.headers,
                        body: String::from_utf8_lossy(&body).into_owned(),
                    };
                    let (status, reply) = {
                        let mut requests = requests.lock();
                        let answer = handler(requests.len(), &recorded);
                        requests.push(recorded);
                        answer
                    };

                    let mut response = hyper::Response::new(Full::new(Bytes::from(reply)));
                    *response.status_mut() = http::StatusCode::from_u16(status)
                        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
                    response.headers_mut().insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("text/xml"),
                    );
                    if response.status().is_redirection() {
                        response.headers_mut().insert(
                            http::header::LOCATION,
                            http::HeaderValue::from_static("/moved"),
                        );
                    }
                    Ok::<_, Infallible>(response)
                }
            });

            if let Err(err) = HttpConnBuilder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                tracing::debug!(error = %err, "loopback connection ended with error");
            }
        });
    }
}

/// A `PublishResponse` document carrying `message_id`.
#[must_use]
pub fn publish_response(message_id: &str) -> String {
    format!(
        r#"<PublishResponse xmlns="https://sns.amazonaws.com/doc/2010-03-31/">
    <PublishResult>
        <MessageId>{message_id}</MessageId>
    </PublishResult>
    <ResponseMetadata>
        <RequestId>d74b8436-ae13-5ab4-a9ff-ce54dfea72a0</RequestId>
    </ResponseMetadata>
</PublishResponse>"#
    )
}

/// A `PublishBatchResponse` document with one success per entry id in `request`.
#[must_use]
pub fn batch_response_for(request: &RecordedRequest) -> String {
    let members: String = request
        .form()
        .into_iter()
        .filter(|(k, _)| k.starts_with("PublishBatchRequestEntries.member.") && k.ends_with(".Id"))
        .map(|(_, id)| {
            format!("<member><Id>{id}</Id><MessageId>msg-{id}</MessageId></member>")
        })
        .collect();
    format!(
        r#"<PublishBatchResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <PublishBatchResult>
    <Failed/>
    <Successful>{members}</Successful>
  </PublishBatchResult>
</PublishBatchResponse>"#
    )
}

mod test_batch;
mod test_localstack;
mod test_publish;
