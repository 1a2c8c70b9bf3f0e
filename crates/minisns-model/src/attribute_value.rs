//! Message attribute values and the ordered attribute map.
//!
//! SNS message attributes are typed metadata carried next to the message
//! body. On the wire they are flattened into indexed `entry.<n>` fields, so
//! the numbering depends on iteration order. [`MessageAttributes`] is
//! therefore an ordered sequence rather than a hash map.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::error::ModelError;

/// Logical data type of a message attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeDataType {
    /// UTF-8 string.
    String,
    /// Numeric value, string-encoded.
    Number,
    /// JSON array of strings, numbers or booleans, string-encoded.
    StringArray,
    /// Raw bytes, base64-encoded on the wire.
    Binary,
}

impl AttributeDataType {
    /// Returns the wire tag used in the `Value.DataType` field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::StringArray => "String.Array",
            Self::Binary => "Binary",
        }
    }

    /// Whether values of this type carry a byte payload.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary)
    }
}

impl fmt::Display for AttributeDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeDataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "Number" => Ok(Self::Number),
            "String.Array" => Ok(Self::StringArray),
            "Binary" => Ok(Self::Binary),
            other => Err(ModelError::UnknownDataType(other.to_owned())),
        }
    }
}

/// A single typed message attribute.
///
/// `Binary` values carry `binary_value`; every other type carries
/// `string_value`. An attribute without a data type is ignored when the
/// message is encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageAttributeValue {
    /// The attribute's data type.
    pub data_type: Option<AttributeDataType>,
    /// Textual payload for `String`, `Number` and `String.Array`.
    pub string_value: Option<String>,
    /// Byte payload for `Binary`.
    pub binary_value: Option<Bytes>,
}

impl MessageAttributeValue {
    /// Create a `String` attribute.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::text(AttributeDataType::String, value)
    }

    /// Create a `Number` attribute from its textual form.
    #[must_use]
    pub fn number(value: impl Into<String>) -> Self {
        Self::text(AttributeDataType::Number, value)
    }

    /// Create a `String.Array` attribute from its JSON text.
    #[must_use]
    pub fn string_array(value: impl Into<String>) -> Self {
        Self::text(AttributeDataType::StringArray, value)
    }

    /// Create a `Binary` attribute.
    #[must_use]
    pub fn binary(value: impl Into<Bytes>) -> Self {
        Self {
            data_type: Some(AttributeDataType::Binary),
            string_value: None,
            binary_value: Some(value.into()),
        }
    }

    fn text(data_type: AttributeDataType, value: impl Into<String>) -> Self {
        Self {
            data_type: Some(data_type),
            string_value: Some(value.into()),
            binary_value: None,
        }
    }
}

/// Ordered mapping of attribute name to value.
///
/// Names are unique. Inserting an existing name replaces the value in place,
/// so the entry keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageAttributes {
    entries: Vec<(String, MessageAttributeValue)>,
}

impl MessageAttributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: MessageAttributeValue,
    ) -> Option<MessageAttributeValue> {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: MessageAttributeValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MessageAttributeValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageAttributeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, MessageAttributeValue)> for MessageAttributes {
    fn from_iter<I: IntoIterator<Item = (K, MessageAttributeValue)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}
