//! XML parsing error types.

/// Errors that can occur while reading an XML response body.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// The document contained no root element.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// The document ended before all open elements were closed.
    #[error("unexpected EOF inside <{0}>")]
    UnexpectedEof(String),

    /// Text or a name could not be decoded.
    #[error("failed to decode XML content: {0}")]
    Decode(String),
}
