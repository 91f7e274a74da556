//! XPath query directive over XML files.
//!
//! This crate contributes one directive to a Plume host: given an XPath
//! expression and an XML file, it extracts the text of every matching node
//! and feeds it back through the host's markup parser, so generated content
//! lands in the document tree at the directive's location.

pub mod directive;
pub mod document;
pub mod error;

pub use directive::{XPATH_FILE, XPathDirective, setup};
pub use document::{XmlDocument, XmlMatch};
pub use error::XPathError;
