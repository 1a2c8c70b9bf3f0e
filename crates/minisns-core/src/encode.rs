//! Form-urlencoded wire encoding for SNS query requests.
//!
//! A request body is an ordered list of `key=value` pairs joined by `&`.
//! Keys and values are percent-encoded with every byte outside
//! `A-Z a-z 0-9 - _ . ~` escaped to uppercase hex, so `! ' ( ) *` and the
//! space character are always escaped. `Action` and `Version` close every
//! body.
//!
//! Message attributes are flattened into indexed fields:
//!
//! ```text
//! <prefix>.entry.<n>.Name
//! <prefix>.entry.<n>.Value.DataType
//! <prefix>.entry.<n>.Value.StringValue | <prefix>.entry.<n>.Value.BinaryValue
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use minisns_model::{
    MessageAttributes, PublishBatchRequestEntry, PublishRequest, SnsAction,
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// The query API version sent with every request.
pub const API_VERSION: &str = "2010-03-31";

/// Attribute prefix for a single `Publish` call.
const MESSAGE_ATTRIBUTES: &str = "MessageAttributes";

/// Batch entry prefix; members are numbered from 1 within each chunk.
const BATCH_ENTRIES: &str = "PublishBatchRequestEntries.member";

/// Bytes left unescaped: `A-Z a-z 0-9 - _ . ~`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one key or value.
///
/// # Examples
///
/// ```
/// use minisns_core::encode::encode_component;
///
/// assert_eq!(encode_component("Hello World!"), "Hello%20World%21");
/// assert_eq!(encode_component("it's (a) *"), "it%27s%20%28a%29%20%2A");
/// ```
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FORM_ENCODE_SET).to_string()
}

/// An ordered list of form fields.
///
/// Fields are emitted in insertion order. Absent values are never pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    /// Create an empty field list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Append a field if `value` is present.
    pub fn push_opt(&mut self, name: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Flatten `attributes` under `prefix`.
    ///
    /// The entry counter starts at 1 and only advances for attributes that
    /// declare a data type; untyped attributes are skipped. A textual payload
    /// is emitted only when non-empty, a binary payload as standard base64.
    pub fn extend_attributes(&mut self, prefix: &str, attributes: &MessageAttributes) {
        let mut counter = 1_usize;
        for (name, value) in attributes.iter() {
            let Some(data_type) = value.data_type else {
                continue;
            };
            let entry = format!("{prefix}.entry.{counter}");
            self.push(format!("{entry}.Name"), name);
            self.push(format!("{entry}.Value.DataType"), data_type.as_str());
            if data_type.is_binary() {
                if let Some(bytes) = &value.binary_value {
                    self.push(format!("{entry}.Value.BinaryValue"), BASE64.encode(bytes));
                }
            } else if let Some(text) = value.string_value.as_deref().filter(|s| !s.is_empty()) {
                self.push(format!("{entry}.Value.StringValue"), text);
            }
            counter += 1;
        }
    }

    /// Iterate over `(name, value)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields, excluding `Action` and `Version`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the request body for `action`.
    ///
    /// `Action` and `Version` are appended after the pushed fields.
    #[must_use]
    pub fn encode(&self, action: SnsAction) -> String {
        let trailer = [("Action", action.as_str()), ("Version", API_VERSION)];
        self.iter()
            .chain(trailer)
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Fields of a `Publish` call.
#[must_use]
pub fn publish_fields(request: &PublishRequest) -> FormFields {
    let mut fields = FormFields::new();
    fields.push("Message", request.message.as_str());
    fields.push_opt("TopicArn", request.topic_arn.as_deref());
    fields.push_opt("TargetArn", request.target_arn.as_deref());
    fields.push_opt("PhoneNumber", request.phone_number.as_deref());
    fields.push_opt("Subject", request.subject.as_deref());
    fields.push_opt("MessageStructure", request.message_structure.as_deref());
    fields.push_opt(
        "MessageDeduplicationId",
        request.message_deduplication_id.as_deref(),
    );
    fields.push_opt("MessageGroupId", request.message_group_id.as_deref());
    if let Some(attributes) = &request.message_attributes {
        fields.extend_attributes(MESSAGE_ATTRIBUTES, attributes);
    }
    fields
}

/// Fields of one `PublishBatch` chunk.
///
/// Entries are numbered from 1; the topic is emitted once after all members.
#[must_use]
pub fn batch_fields(topic_arn: &str, entries: &[PublishBatchRequestEntry]) -> FormFields {
    let mut fields = FormFields::new();
    for (index, entry) in entries.iter().enumerate() {
        let member = format!("{BATCH_ENTRIES}.{}", index + 1);
        fields.push_opt(format!("{member}.Id"), entry.id.as_deref());
        fields.push(format!("{member}.Message"), entry.message.as_str());
        fields.push_opt(format!("{member}.Subject"), entry.subject.as_deref());
        fields.push_opt(
            format!("{member}.MessageStructure"),
            entry.message_structure.as_deref(),
        );
        fields.push_opt(
            format!("{member}.MessageDeduplicationId"),
            entry.message_deduplication_id.as_deref(),
        );
        fields.push_opt(
            format!("{member}.MessageGroupId"),
            entry.message_group_id.as_deref(),
        );
        if let Some(attributes) = &entry.message_attributes {
            fields.extend_attributes(&format!("{member}.{MESSAGE_ATTRIBUTES}"), attributes);
        }
    }
    fields.push("TopicArn", topic_arn);
    fields
}
