//! Streaming parse of an XML document into an element tree.

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::XmlError;

/// One element of a parsed XML document.
///
/// Only what the response decoder needs is kept: the local name, the
/// concatenated text content and the child elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local element name, without namespace prefix.
    pub name: String,
    /// Text content, unescaped and trimmed.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Find the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Parse an XML document and return its root element.
///
/// The declaration, comments and processing instructions are skipped.
/// Anything after the root element is ignored.
///
/// # Examples
///
/// ```
/// use minisns_xml::parse;
///
/// let root = parse("<a><b>1</b><b>2</b></a>").unwrap();
/// assert_eq!(root.name, "a");
/// assert_eq!(root.children.len(), 2);
/// assert_eq!(root.children[1].text, "2");
/// ```
///
/// # Errors
///
/// Returns `XmlError` if the document is malformed or has no root element.
pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlElement::new(element_name(&e)?)),
            Event::Empty(e) => {
                let element = XmlElement::new(element_name(&e)?);
                if let Some(root) = attach(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::End(_) => {
                let Some(mut element) = stack.pop() else {
                    return Err(XmlError::MissingElement("root element".to_owned()));
                };
                let trimmed = element.text.trim();
                if trimmed.len() != element.text.len() {
                    element.text = trimmed.to_owned();
                }
                if let Some(root) = attach(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let decoded = e.decode().map_err(|err| XmlError::Decode(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::Decode(err.to_string()))?;
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let decoded = e.decode().map_err(|err| XmlError::Decode(err.to_string()))?;
                    current.text.push_str(&decoded);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(current) = stack.last_mut() {
                    push_reference(&mut current.text, &e)?;
                }
            }
            Event::Eof => {
                return Err(match stack.last() {
                    Some(open) => XmlError::UnexpectedEof(open.name.clone()),
                    None => XmlError::MissingElement("root element".to_owned()),
                });
            }
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }
}

/// Attach a finished element to its parent, or hand it back if it is the root.
fn attach(stack: &mut [XmlElement], element: XmlElement) -> Option<XmlElement> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            None
        }
        None => Some(element),
    }
}

fn element_name(start: &BytesStart<'_>) -> Result<String, XmlError> {
    let local = start.local_name();
    std::str::from_utf8(local.as_ref())
        .map(ToOwned::to_owned)
        .map_err(|e| XmlError::Decode(e.to_string()))
}

/// Resolve a character or predefined entity reference into `text`.
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<(), XmlError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| XmlError::Decode(e.to_string()))?
    {
        text.push(ch);
        return Ok(());
    }
    let name = reference
        .decode()
        .map_err(|e| XmlError::Decode(e.to_string()))?;
    match quick_xml::escape::resolve_predefined_entity(&name) {
        Some(resolved) => text.push_str(resolved),
        None => {
            tracing::debug!(entity = %name, "keeping unknown XML entity verbatim");
            text.push('&');
            text.push_str(&name);
            text.push(';');
        }
    }
    Ok(())
}
