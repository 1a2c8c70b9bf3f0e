//! Input types for the `Publish` and `PublishBatch` actions.

use typed_builder::TypedBuilder;

use crate::attribute_value::MessageAttributes;

/// Input for the `Publish` action.
///
/// Exactly one of `topic_arn`, `target_arn` or `phone_number` should name the
/// destination. The client does not check this; SNS rejects the call if the
/// destination is missing or ambiguous.
///
/// # Examples
///
/// ```
/// use minisns_model::PublishRequest;
///
/// let request = PublishRequest::builder()
///     .message("Hello World!")
///     .topic_arn("arn:aws:sns:eu-central-1:000000000000:test")
///     .build();
/// assert_eq!(request.message, "Hello World!");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct PublishRequest {
    /// The topic to publish to.
    #[builder(default, setter(into, strip_option))]
    pub topic_arn: Option<String>,
    /// A platform endpoint to publish to.
    #[builder(default, setter(into, strip_option))]
    pub target_arn: Option<String>,
    /// An E.164 phone number to deliver an SMS to.
    #[builder(default, setter(into, strip_option))]
    pub phone_number: Option<String>,
    /// The message body.
    #[builder(setter(into))]
    pub message: String,
    /// Subject line for email endpoints.
    #[builder(default, setter(into, strip_option))]
    pub subject: Option<String>,
    /// Set to `json` to send a different message per protocol.
    #[builder(default, setter(into, strip_option))]
    pub message_structure: Option<String>,
    /// Typed message attributes.
    #[builder(default, setter(into, strip_option))]
    pub message_attributes: Option<MessageAttributes>,
    /// Deduplication token for FIFO topics.
    #[builder(default, setter(into, strip_option))]
    pub message_deduplication_id: Option<String>,
    /// Message group for FIFO topics.
    #[builder(default, setter(into, strip_option))]
    pub message_group_id: Option<String>,
}

/// One message inside a `PublishBatch` request.
///
/// `id` must be unique within the batch. Entries without an id get a
/// generated one before they are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct PublishBatchRequestEntry {
    /// Identifier of the entry within the batch.
    #[builder(default, setter(into, strip_option))]
    pub id: Option<String>,
    /// The message body.
    #[builder(setter(into))]
    pub message: String,
    /// Subject line for email endpoints.
    #[builder(default, setter(into, strip_option))]
    pub subject: Option<String>,
    /// Set to `json` to send a different message per protocol.
    #[builder(default, setter(into, strip_option))]
    pub message_structure: Option<String>,
    /// Typed message attributes.
    #[builder(default, setter(into, strip_option))]
    pub message_attributes: Option<MessageAttributes>,
    /// Deduplication token for FIFO topics.
    #[builder(default, setter(into, strip_option))]
    pub message_deduplication_id: Option<String>,
    /// Message group for FIFO topics.
    #[builder(default, setter(into, strip_option))]
    pub message_group_id: Option<String>,
}

/// Input for the `PublishBatch` action.
///
/// The entry list is unbounded; the client splits it into chunks of at most
/// ten entries, one remote call per chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishBatchRequest {
    /// The topic every entry is published to.
    pub topic_arn: String,
    /// Entries in publish order.
    pub entries: Vec<PublishBatchRequestEntry>,
}

impl PublishBatchRequest {
    /// Create a batch request for a topic.
    #[must_use]
    pub fn new(topic_arn: impl Into<String>, entries: Vec<PublishBatchRequestEntry>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            entries,
        }
    }
}
