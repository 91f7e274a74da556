//! The `xpath` directive and its host registration.

use crate::document::{XmlDocument, XmlMatch};
use crate::error::XPathError;
use plume_directive_core::{
    ArgumentSpec, BuildConfig, ConfigValueSpec, ContentLines, Directive, DirectiveContext,
    DirectiveError, DocumentHost, Invocation, OptionSpec, Registry, SetupInfo,
};
use std::fs;
use std::path::Path;

/// Name of the configuration value holding the default XML file path.
pub const XPATH_FILE: &str = "xpath_file";

/// Per-invocation option overriding the configured file.
const FILE_OPTION: &str = "file";

/// Directive that evaluates an XPath expression over an XML file and
/// re-parses the matched node text as nested markup.
///
/// The file is parsed fresh on every invocation and recorded as a build
/// dependency. Query and parse failures are reported through the host and
/// yield empty output; only an unresolvable file configuration aborts the
/// directive.
#[derive(Debug, Default)]
pub struct XPathDirective;

impl XPathDirective {
    /// The `:file:` option wins for this invocation only; otherwise the
    /// process-wide `xpath_file` value applies. Empty strings count as unset.
    fn resolve_file<'a>(
        &self,
        invocation: &'a Invocation,
        config: &'a BuildConfig,
    ) -> Result<&'a str, DirectiveError> {
        invocation
            .options
            .get(FILE_OPTION)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .or_else(|| config.get(XPATH_FILE).filter(|value| !value.is_empty()))
            .ok_or_else(|| {
                DirectiveError::Config(format!(
                    "the :{}: option is required (or set {} in the project configuration)",
                    FILE_OPTION, XPATH_FILE
                ))
            })
    }

    fn query<H: DocumentHost>(
        &self,
        path: &str,
        expr: &str,
        host: &mut H,
    ) -> Result<Vec<XmlMatch>, XPathError> {
        let text = fs::read_to_string(path).map_err(|source| XPathError::Io {
            path: path.to_string(),
            source,
        })?;
        let document = XmlDocument::parse(&text)?;
        host.record_dependency(Path::new(path));
        document.query(expr)
    }
}

impl<H: DocumentHost> Directive<H> for XPathDirective {
    fn name(&self) -> &'static str {
        "xpath"
    }

    fn arguments(&self) -> ArgumentSpec {
        ArgumentSpec {
            required: 1,
            optional: 0,
            has_content: false,
        }
    }

    fn options(&self) -> &'static [OptionSpec] {
        &[OptionSpec {
            name: FILE_OPTION,
            required: false,
        }]
    }

    fn run(
        &self,
        invocation: &Invocation,
        ctx: &mut DirectiveContext<'_, H>,
    ) -> Result<Vec<H::Node>, DirectiveError> {
        let expr = invocation.arguments.first().ok_or_else(|| {
            DirectiveError::Invocation("an XPath expression argument is required".into())
        })?;
        let path = self.resolve_file(invocation, ctx.config)?;

        let matches = match self.query(path, expr, ctx.host) {
            Ok(matches) => matches,
            Err(err) => {
                ctx.host.report_error(
                    &invocation.location,
                    &format!("error in \"{}\" directive for '{}': {}", <Self as Directive<H>>::name(self), expr, err),
                );
                return Ok(Vec::new());
            }
        };
        log::debug!("xpath '{}' matched {} node(s) in {}", expr, matches.len(), path);

        let mut nodes = Vec::new();
        for matched in &matches {
            let mut content = ContentLines::new();
            for (offset, line) in matched.text.lines().enumerate() {
                content.push(line, format!("{}:{}:<xpath>", path, matched.line + offset));
            }
            nodes.extend(ctx.host.parse_nested(&content)?);
        }
        Ok(nodes)
    }
}

/// Registers the `xpath` directive and its configuration value with the host.
pub fn setup<H, R>(registry: &mut R) -> SetupInfo
where
    H: DocumentHost,
    R: Registry<H>,
{
    registry.add_directive(Box::new(XPathDirective));
    registry.add_config_value(ConfigValueSpec::new(XPATH_FILE, ""));
    SetupInfo {
        version: env!("CARGO_PKG_VERSION"),
        parallel_read_safe: true,
    }
}
