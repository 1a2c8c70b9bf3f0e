//! Output types for the `Publish` and `PublishBatch` actions.
//!
//! Outputs serialize with `PascalCase` field names, matching the element
//! names in the SNS XML responses. Absent optionals are omitted.

use serde::Serialize;

/// Result of a successful `Publish` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishResponse {
    /// Identifier SNS assigned to the message.
    pub message_id: String,
    /// Sequence number, FIFO topics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// A successfully published batch entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishBatchResultEntry {
    /// The entry id from the request.
    pub id: String,
    /// Identifier SNS assigned to the message.
    pub message_id: String,
    /// Sequence number, FIFO topics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// A batch entry SNS refused to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchResultErrorEntry {
    /// The entry id from the request.
    pub id: String,
    /// Error code for this entry.
    pub code: String,
    /// Human-readable reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the caller caused the failure.
    pub sender_fault: bool,
}

/// Result of a `PublishBatch` call, possibly spanning several chunks.
///
/// A partially failed batch is not an error: inspect both lists. A list is
/// `None` when no chunk reported any entry for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishBatchResponse {
    /// Entries that were published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successful: Option<Vec<PublishBatchResultEntry>>,
    /// Entries that were rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<BatchResultErrorEntry>>,
}

impl PublishBatchResponse {
    /// Append the results of one chunk, keeping chunk order.
    pub fn merge(&mut self, chunk: PublishBatchResponse) {
        if let Some(failed) = chunk.failed {
            self.failed.get_or_insert_with(Vec::new).extend(failed);
        }
        if let Some(successful) = chunk.successful {
            self.successful.get_or_insert_with(Vec::new).extend(successful);
        }
    }

    /// Number of published entries.
    #[must_use]
    pub fn successful_count(&self) -> usize {
        self.successful.as_ref().map_or(0, Vec::len)
    }

    /// Number of rejected entries.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.as_ref().map_or(0, Vec::len)
    }
}
