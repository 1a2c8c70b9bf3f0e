//! Decoding SNS XML responses.
//!
//! Success bodies are parsed with [`minisns_xml::parse_simplified`] and read by
//! path. Error bodies are inspected on a best-effort basis: anything that is
//! not an `ErrorResponse` document falls back to the raw body text.

use minisns_model::{
    BatchResultErrorEntry, PublishBatchResponse, PublishBatchResultEntry, PublishResponse,
};
use minisns_xml::{XmlValue, parse_simplified};
use tracing::debug;

use crate::error::SnsError;

/// Decode a `PublishResponse` document.
///
/// # Errors
///
/// Returns [`SnsError::Xml`] for a malformed document and
/// [`SnsError::MalformedResponse`] if `PublishResult/MessageId` is missing.
pub fn parse_publish_response(body: &str) -> Result<PublishResponse, SnsError> {
    let tree = parse_simplified(body)?;
    let result = tree
        .path(&["PublishResponse", "PublishResult"])
        .ok_or_else(|| SnsError::MalformedResponse("PublishResponse/PublishResult".to_owned()))?;
    let message_id = text_of(result, "MessageId")
        .ok_or_else(|| SnsError::MalformedResponse("PublishResult/MessageId".to_owned()))?;

    Ok(PublishResponse {
        message_id,
        sequence_number: text_of(result, "SequenceNumber"),
    })
}

/// Decode a `PublishBatchResponse` document for one chunk.
///
/// # Errors
///
/// Returns [`SnsError::Xml`] for a malformed document and
/// [`SnsError::MalformedResponse`] if `PublishBatchResult` is missing.
pub fn parse_publish_batch_response(body: &str) -> Result<PublishBatchResponse, SnsError> {
    let tree = parse_simplified(body)?;
    let result = tree
        .path(&["PublishBatchResponse", "PublishBatchResult"])
        .ok_or_else(|| {
            SnsError::MalformedResponse("PublishBatchResponse/PublishBatchResult".to_owned())
        })?;

    let successful = normalize_members(result.get("Successful")).map(|members| {
        members
            .into_iter()
            .map(|member| PublishBatchResultEntry {
                id: text_of(member, "Id").unwrap_or_default(),
                message_id: text_of(member, "MessageId").unwrap_or_default(),
                sequence_number: text_of(member, "SequenceNumber"),
            })
            .collect()
    });
    let failed = normalize_members(result.get("Failed")).map(|members| {
        members
            .into_iter()
            .map(|member| BatchResultErrorEntry {
                id: text_of(member, "Id").unwrap_or_default(),
                code: text_of(member, "Code").unwrap_or_default(),
                message: text_of(member, "Message"),
                sender_fault: text_of(member, "SenderFault")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            })
            .collect()
    });

    Ok(PublishBatchResponse { successful, failed })
}

/// Normalize a `Successful` or `Failed` node into its members.
///
/// An absent or empty node yields `None`. A single `member` yields a
/// one-element list and repeated members are returned as they are.
#[must_use]
pub fn normalize_members(node: Option<&XmlValue>) -> Option<Vec<&XmlValue>> {
    match node?.get("member")? {
        XmlValue::List(members) => Some(members.iter().collect()),
        member => Some(vec![member]),
    }
}

/// Build the error for a non-success response.
///
/// The message is `ErrorResponse/Error/Message` when the body is such a
/// document, otherwise the body text unchanged. Parse failures are ignored.
#[must_use]
pub fn service_error(status: http::StatusCode, body: &str) -> SnsError {
    let (code, message) = match parse_simplified(body) {
        Ok(tree) => {
            let error = tree.path(&["ErrorResponse", "Error"]);
            (
                error.and_then(|e| text_of(e, "Code")),
                error.and_then(|e| text_of(e, "Message")),
            )
        }
        Err(err) => {
            debug!(error = %err, "error body is not XML, using raw text");
            (None, None)
        }
    };

    SnsError::Service {
        status,
        code,
        message: message.unwrap_or_else(|| body.to_owned()),
    }
}

/// The non-empty text of a child element.
fn text_of(value: &XmlValue, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(XmlValue::as_text)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
