use thiserror::Error;

/// Errors raised while loading, parsing, or querying an XML file.
///
/// Everything here belongs to the caught class: the directive reports the
/// failure through the host and yields no content instead of aborting the
/// document build.
#[derive(Error, Debug)]
pub enum XPathError {
    #[error("error reading '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("XML structure error: {0}")]
    XmlStructure(#[from] sxd_document::parser::Error),

    #[error("XPath evaluation error: {0}")]
    XPath(#[from] sxd_xpath::Error),

    #[error("XPath expression '{expression}' evaluated to a {kind}, not a node-set")]
    NotANodeSet {
        expression: String,
        kind: &'static str,
    },
}
