//! Publish pipeline for the minisns SNS client.
//!
//! [`SnsClient`] exposes the two supported actions, `Publish` and
//! `PublishBatch`. Each call is encoded as a form-urlencoded query request
//! ([`encode`]), signed through a [`RequestSigner`](minisns_auth::RequestSigner),
//! sent through an [`HttpExchange`] and decoded from XML ([`decode`]).
//! Batch input of any length is split into chunks of ten ([`batch`]).
//!
//! # Usage
//!
//! ```rust,no_run
//! use minisns_core::{SnsClient, SnsClientConfig};
//! use minisns_model::PublishRequest;
//!
//! # async fn run() -> Result<(), minisns_core::SnsError> {
//! let client = SnsClient::new(SnsClientConfig::from_env())?;
//! let request = PublishRequest::builder()
//!     .topic_arn("arn:aws:sns:us-east-1:000000000000:orders")
//!     .message("Hello World!")
//!     .build();
//! let response = client.publish_message(&request).await?;
//! println!("{}", response.message_id);
//! client.destroy(true).await;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod transport;

pub use client::SnsClient;
pub use config::{ResolvedEndpoint, SnsClientConfig};
pub use error::{SnsError, TransportError};
pub use transport::{HttpExchange, ReqwestExchange};
