//! Collapse an element tree into nested plain values.
//!
//! The rules match how query-protocol responses are usually consumed:
//!
//! - an element without children becomes [`XmlValue::Text`] (possibly empty);
//! - an element with children becomes [`XmlValue::Map`] keyed by child name;
//! - a child name that occurs more than once becomes [`XmlValue::List`].
//!
//! A singleton list is therefore indistinguishable from a single child.
//! Callers that expect a collection must accept both shapes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::XmlError;
use crate::parse::{XmlElement, parse};

/// A simplified XML value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Text content of a leaf element.
    Text(String),
    /// Child values keyed by element name.
    Map(BTreeMap<String, XmlValue>),
    /// Repeated sibling elements in document order.
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Look up a child of a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a sequence of keys through nested maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use minisns_xml::parse_simplified;
    ///
    /// let value = parse_simplified("<A><B><C>x</C></B></A>").unwrap();
    /// assert_eq!(value.path(&["A", "B", "C"]).and_then(|v| v.as_text()), Some("x"));
    /// ```
    #[must_use]
    pub fn path(&self, keys: &[&str]) -> Option<&XmlValue> {
        keys.iter().try_fold(self, |value, key| value.get(key))
    }

    /// The text of a leaf value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the value carries no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Map(map) => map.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

/// Collapse an element into an [`XmlValue`].
#[must_use]
pub fn simplify(element: &XmlElement) -> XmlValue {
    if element.children.is_empty() {
        return XmlValue::Text(element.text.clone());
    }

    let mut map: BTreeMap<String, XmlValue> = BTreeMap::new();
    for child in &element.children {
        let value = simplify(child);
        match map.entry(child.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            // Element values are never lists, so a list here means a repeated name.
            Entry::Occupied(mut slot) => match slot.get_mut() {
                XmlValue::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, XmlValue::List(Vec::new()));
                    *existing = XmlValue::List(vec![first, value]);
                }
            },
        }
    }
    XmlValue::Map(map)
}

/// Parse a document and simplify it, keyed by the root element name.
///
/// `<PublishResponse>..</PublishResponse>` becomes
/// `Map { "PublishResponse": .. }`.
///
/// # Errors
///
/// Returns `XmlError` if the document cannot be parsed.
pub fn parse_simplified(xml: &str) -> Result<XmlValue, XmlError> {
    let root = parse(xml)?;
    let value = simplify(&root);
    Ok(XmlValue::Map(BTreeMap::from([(root.name, value)])))
}
