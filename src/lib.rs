//! # plume
//!
//! Documentation-pipeline plugin providing the `xpath` content directive:
//! query an XML file with an XPath expression and splice the matched node
//! text, re-parsed as markup, into the generated document tree.
//!
//! The crate is an integration layer over two members:
//!
//! - **`plume-directive-core`**: the contract between directives and the
//!   document-generation host (registration, invocation, configuration,
//!   nested markup parsing, dependency tracking)
//! - **`plume-xpath`**: the directive itself, delegating XML parsing and
//!   XPath evaluation to external engines
//!
//! Hosts call [`setup`] with their registry to install the directive and its
//! `xpath_file` configuration value.

// Re-export member crates
pub use plume_directive_core as directive_core;
pub use plume_xpath as xpath;

// Re-export the host-facing contract
pub use directive_core::{
    ArgumentSpec, BuildConfig, ConfigValueSpec, ContentLines, Directive, DirectiveContext,
    DirectiveError, DocumentHost, HostError, Invocation, OptionSpec, Registry, SetupInfo,
    SourceLocation, TaggedLine,
};

// Re-export the directive surface
pub use xpath::{XPATH_FILE, XPathDirective, XPathError, XmlDocument, XmlMatch, setup};
