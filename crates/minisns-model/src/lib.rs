//! Request and response types for the minisns publish client.
//!
//! The types mirror the SNS `Publish` and `PublishBatch` actions of the
//! `2010-03-31` query API. Requests are plain structs with typed builders;
//! responses serialize to `PascalCase` JSON so they can be printed or
//! forwarded as-is.

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;

pub use attribute_value::{AttributeDataType, MessageAttributeValue, MessageAttributes};
pub use error::ModelError;
pub use input::{PublishBatchRequest, PublishBatchRequestEntry, PublishRequest};
pub use operations::SnsAction;
pub use output::{
    BatchResultErrorEntry, PublishBatchResponse, PublishBatchResultEntry, PublishResponse,
};
