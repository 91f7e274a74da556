//! Core abstractions for directive registration and execution
//!
//! This crate provides the foundational traits and types for content
//! directives in the Plume documentation toolkit. It defines the contract
//! between directive implementations and the document-generation host that
//! invokes them during document processing.
//!
//! ## Key Abstractions
//!
//! - **`Directive`**: Trait for directive handlers invoked inline in a document
//! - **`DocumentHost`**: Services the host pipeline supplies to a running directive
//! - **`Registry`**: Registration surface for directives and configuration values
//! - **`BuildConfig`**: Process-wide configuration values with declared defaults
//! - **`ContentLines`**: Generated markup lines tagged with synthetic source locators

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that abort a single directive instance.
///
/// These are extension-level failures: the host reports them against the
/// directive occurrence and skips its output, while the rest of the document
/// build continues.
#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid directive invocation: {0}")]
    Invocation(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Errors surfaced by the host while servicing a directive.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("markup parsing failed: {0}")]
    Markup(String),
}

/// Position of a directive occurrence (or generated line) in a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Path or synthetic name of the source document.
    pub source: String,
    /// 1-based line number within the source.
    pub line: usize,
}

impl SourceLocation {
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        SourceLocation {
            source: source.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

/// One line of generated markup together with the locator the host should
/// report against when parsing it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub text: String,
    pub source: String,
}

/// An ordered list of tagged markup lines handed to the host's nested parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentLines {
    lines: Vec<TaggedLine>,
}

impl ContentLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line with its synthetic source locator.
    pub fn push(&mut self, text: impl Into<String>, source: impl Into<String>) {
        self.lines.push(TaggedLine {
            text: text.into(),
            source: source.into(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaggedLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a ContentLines {
    type Item = &'a TaggedLine;
    type IntoIter = std::slice::Iter<'a, TaggedLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Declaration of a configuration value contributed to the host's
/// configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValueSpec {
    pub name: &'static str,
    /// Value used when the project configuration does not set one.
    pub default: String,
    /// True if documents must be rebuilt when the value changes.
    pub rebuild: bool,
}

impl ConfigValueSpec {
    pub fn new(name: &'static str, default: impl Into<String>) -> Self {
        ConfigValueSpec {
            name,
            default: default.into(),
            rebuild: false,
        }
    }
}

/// Process-wide configuration values, read by directives at execution time.
///
/// The host loads project values once at configuration time; declared
/// defaults fill in for anything the project leaves unset. Directives never
/// write to this — per-invocation overrides travel in [`Invocation::options`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    values: HashMap<String, String>,
    #[serde(skip)]
    defaults: HashMap<String, String>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the declared default for a configuration value.
    pub fn declare(&mut self, spec: &ConfigValueSpec) {
        self.defaults.insert(spec.name.to_string(), spec.default.clone());
    }

    /// Sets a project-level value, shadowing the declared default.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .or_else(|| self.defaults.get(name))
            .map(String::as_str)
    }
}

/// Services the host document pipeline supplies to a running directive.
///
/// Directives are written exclusively against this trait; the node tree
/// itself belongs to the host, so the associated `Node` type is opaque here.
pub trait DocumentHost {
    /// The host's document node type. Nodes returned from a directive are
    /// owned by the host's document tree after `run` returns.
    type Node;

    /// Parses tagged markup lines as nested content at the directive's
    /// location, returning the resulting document nodes.
    fn parse_nested(&mut self, content: &ContentLines) -> Result<Vec<Self::Node>, HostError>;

    /// Records a file consumed while building the current document, so
    /// incremental rebuilds can detect staleness.
    fn record_dependency(&mut self, path: &Path);

    /// Reports a build-time error attributed to the given location. The
    /// document build continues.
    fn report_error(&mut self, location: &SourceLocation, message: &str);
}

/// Positional argument arity declared by a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub required: usize,
    pub optional: usize,
    /// True if the directive accepts a nested content block of its own.
    pub has_content: bool,
}

/// A named option declared by a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub required: bool,
}

/// One occurrence of a directive in a source document.
///
/// Constructed by the host per occurrence and discarded after `run` returns.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub arguments: Vec<String>,
    pub options: HashMap<String, String>,
    pub location: SourceLocation,
}

impl Invocation {
    pub fn new(location: SourceLocation) -> Self {
        Invocation {
            arguments: Vec::new(),
            options: HashMap::new(),
            location,
        }
    }

    pub fn argument(mut self, value: impl Into<String>) -> Self {
        self.arguments.push(value.into());
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

/// Everything a directive may touch while it runs: the host services and the
/// process-wide configuration.
pub struct DirectiveContext<'a, H: DocumentHost> {
    pub host: &'a mut H,
    pub config: &'a BuildConfig,
}

/// A markup extension point invoked inline in a document.
///
/// Implementations are registered through [`Registry`] and dispatched by the
/// host; the trait is object-safe so hosts can hold heterogeneous directive
/// tables.
pub trait Directive<H: DocumentHost> {
    /// The name the directive is invoked by in markup.
    fn name(&self) -> &'static str;

    /// Declared positional argument arity, enforced by the host.
    fn arguments(&self) -> ArgumentSpec;

    /// Declared option schema, enforced by the host.
    fn options(&self) -> &'static [OptionSpec];

    /// Executes one occurrence, returning the document nodes to splice in at
    /// the directive's location.
    fn run(
        &self,
        invocation: &Invocation,
        ctx: &mut DirectiveContext<'_, H>,
    ) -> Result<Vec<H::Node>, DirectiveError>;
}

/// Registration surface a host exposes to plugin setup functions.
pub trait Registry<H: DocumentHost> {
    fn add_directive(&mut self, directive: Box<dyn Directive<H>>);
    fn add_config_value(&mut self, spec: ConfigValueSpec);
}

/// Metadata returned by a plugin's setup function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupInfo {
    pub version: &'static str,
    /// True if the plugin holds no mutable state and documents using it may
    /// be read in parallel processes.
    pub parallel_read_safe: bool,
}

// Test utilities - publicly available for integration testing in downstream crates
pub mod tests {
    use super::*;
    use std::path::PathBuf;

    /// A document node produced by [`MockHost`]: one node per parsed line.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MockNode {
        pub text: String,
        pub source: String,
    }

    /// In-memory host that records dependencies and reported errors, for
    /// exercising directives without a real document pipeline.
    #[derive(Debug, Default)]
    pub struct MockHost {
        pub dependencies: Vec<PathBuf>,
        pub errors: Vec<String>,
        /// When set, `parse_nested` fails, simulating markup the host rejects.
        pub fail_markup: bool,
    }

    impl MockHost {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DocumentHost for MockHost {
        type Node = MockNode;

        fn parse_nested(&mut self, content: &ContentLines) -> Result<Vec<MockNode>, HostError> {
            if self.fail_markup {
                return Err(HostError::Markup("mock markup parser failure".into()));
            }
            Ok(content
                .iter()
                .map(|line| MockNode {
                    text: line.text.clone(),
                    source: line.source.clone(),
                })
                .collect())
        }

        fn record_dependency(&mut self, path: &Path) {
            self.dependencies.push(path.to_path_buf());
        }

        fn report_error(&mut self, location: &SourceLocation, message: &str) {
            self.errors.push(format!("{}: {}", location, message));
        }
    }
}
