//! XML response parsing for the minisns publish client.
//!
//! SNS answers query-protocol calls with XML documents such as
//! `<PublishResponse><PublishResult><MessageId>..</MessageId></PublishResult></PublishResponse>`.
//! This crate turns those documents into a small tree in two steps:
//!
//! - [`parse`] reads the document with `quick-xml` into an [`XmlElement`] tree
//!   (names, text and children, attributes and namespaces dropped).
//! - [`simplify`] collapses that tree into nested [`XmlValue`]s: leaf elements
//!   become text, repeated siblings become lists, everything else a map.
//!
//! [`parse_simplified`] runs both and wraps the result under the root name.

pub mod error;
pub mod parse;
pub mod simplify;

pub use error::XmlError;
pub use parse::{XmlElement, parse};
pub use simplify::{XmlValue, parse_simplified, simplify};
