//! XML parse-and-query adapter.
//!
//! XPath evaluation is delegated to `sxd-xpath` over an `sxd-document` tree.
//! That tree does not retain source positions, so the same input is also
//! parsed with `roxmltree` and the two trees are aligned on pre-order element
//! position to recover the source line of every match. Element structure is
//! identical for any document both parsers accept, which makes the alignment
//! total; a node that still cannot be attributed falls back to line 0.

use crate::error::XPathError;
use sxd_document::Package;
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};
use sxd_xpath::Value;
use sxd_xpath::nodeset::Node as QueryNode;

/// A parsed XML document that answers XPath queries with source line
/// attribution for every match.
#[derive(Debug)]
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
    package: Package,
}

/// One node matched by an XPath query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlMatch {
    /// Text content of the node, per the XPath `string()` function.
    pub text: String,
    /// 1-based source line of the nearest enclosing element, 0 if the match
    /// has no enclosing element.
    pub line: usize,
}

impl<'input> XmlDocument<'input> {
    /// Parses the input once for querying and once for position lookup.
    pub fn parse(text: &'input str) -> Result<Self, XPathError> {
        let doc = roxmltree::Document::parse(text)?;
        let package = sxd_document::parser::parse(text)?;
        Ok(Self { doc, package })
    }

    /// Evaluates `expr` against the document, returning matches in document
    /// order. Expressions that evaluate to a scalar are rejected.
    pub fn query(&self, expr: &str) -> Result<Vec<XmlMatch>, XPathError> {
        let document = self.package.as_document();
        let value = sxd_xpath::evaluate_xpath(&document, expr)?;
        let nodeset = match value {
            Value::Nodeset(nodeset) => nodeset,
            scalar => {
                return Err(XPathError::NotANodeSet {
                    expression: expr.to_string(),
                    kind: scalar_kind(&scalar),
                });
            }
        };

        let elements = document_order_elements(&document);
        let lines = self.element_lines();

        Ok(nodeset
            .document_order()
            .into_iter()
            .map(|node| {
                let text = node.string_value();
                let line = nearest_element(node)
                    .and_then(|element| elements.iter().position(|e| *e == element))
                    .and_then(|index| lines.get(index).copied())
                    .unwrap_or(0);
                XmlMatch { text, line }
            })
            .collect())
    }

    /// 1-based start lines of every element, in pre-order.
    fn element_lines(&self) -> Vec<usize> {
        self.doc
            .root()
            .descendants()
            .filter(|node| node.is_element())
            .map(|node| self.doc.text_pos_at(node.range().start).row as usize)
            .collect()
    }
}

fn scalar_kind(value: &Value) -> &'static str {
    match value {
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Nodeset(_) => "node-set",
    }
}

/// Every element of the queried tree, in pre-order.
fn document_order_elements<'d>(document: &Document<'d>) -> Vec<Element<'d>> {
    fn visit<'d>(element: Element<'d>, out: &mut Vec<Element<'d>>) {
        out.push(element);
        for child in element.children() {
            if let ChildOfElement::Element(e) = child {
                visit(e, out);
            }
        }
    }

    let mut out = Vec::new();
    for child in document.root().children() {
        if let ChildOfRoot::Element(e) = child {
            visit(e, &mut out);
        }
    }
    out
}

/// The element a match is attributed to: the node itself if it is an
/// element, otherwise its nearest element ancestor.
fn nearest_element(node: QueryNode<'_>) -> Option<Element<'_>> {
    match node {
        QueryNode::Element(element) => Some(element),
        QueryNode::Root(_) => None,
        other => other.parent().and_then(nearest_element),
    }
}
