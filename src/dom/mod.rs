// SPDX-License-Identifier: PMPL-1.0-or-later
//! DOM tree utilities: XPath construction, XPath resolution, and attribute
//! patching over a parsed `scraper` document.
//!
//! The XPath builder is the devtools-style ancestor walk: each step is the
//! element's local name plus a 1-based index among similar siblings, with
//! an `//*[@id="..."]` shortcut available in optimized mode. The resolver
//! only evaluates paths this builder can emit; it is a lookup table for
//! recorded locations, not an XPath engine.

use ego_tree::{NodeId, NodeRef};
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, Namespace, QualName};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

/// One segment of an XPath under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Serialized segment, e.g. `div[2]` or `//*[@id="menu"]`
    pub value: String,
    /// An optimized step terminates the ancestor walk
    pub optimized: bool,
}

/// Native elements that are keyboard-operable without intervention.
pub fn is_native_keyboard_operable(element: &Element) -> bool {
    let name = element.name();
    name.eq_ignore_ascii_case("button") || name.eq_ignore_ascii_case("a")
}

/// Build the XPath locating `node` within its document.
///
/// With `optimized` set, an ancestor carrying an `id` attribute
/// short-circuits the walk with `//*[@id="..."]`; otherwise the path runs
/// all the way to the document root. The document node itself is `/`.
pub fn xpath_for(node: NodeRef<'_, Node>, optimized: bool) -> String {
    if matches!(node.value(), Node::Document) {
        return "/".to_string();
    }

    let mut steps = Vec::new();
    let mut context = Some(node);
    while let Some(current) = context {
        let step = xpath_step(current, optimized);
        let terminal = step.optimized;
        steps.push(step);
        if terminal {
            break;
        }
        context = current.parent();
    }

    steps.reverse();
    let joined = steps
        .iter()
        .map(|s| s.value.as_str())
        .collect::<Vec<_>>()
        .join("/");
    if steps.first().map_or(false, |s| s.optimized) {
        joined
    } else {
        format!("/{joined}")
    }
}

/// Compute the step for a single node.
fn xpath_step(node: NodeRef<'_, Node>, optimized: bool) -> Step {
    let index = sibling_index(node);

    let mut value = match node.value() {
        Node::Element(el) => {
            if optimized {
                if let Some(id) = el.attr("id") {
                    return Step {
                        value: format!("//*[@id=\"{id}\"]"),
                        optimized: true,
                    };
                }
            }
            el.name().to_string()
        }
        Node::Text(_) => "text()".to_string(),
        Node::Comment(_) => "comment()".to_string(),
        Node::ProcessingInstruction(_) => "processing-instruction()".to_string(),
        Node::Document | Node::Fragment | Node::Doctype(_) => String::new(),
    };

    if index > 0 {
        value.push_str(&format!("[{index}]"));
    }

    Step {
        value,
        optimized: matches!(node.value(), Node::Document | Node::Fragment),
    }
}

/// Index of `node` among similar siblings: 0 when no other similar sibling
/// exists (the step then omits its index), otherwise 1-based.
fn sibling_index(node: NodeRef<'_, Node>) -> usize {
    let Some(parent) = node.parent() else {
        // Root node - no siblings.
        return 0;
    };

    let has_similar = parent
        .children()
        .any(|sibling| sibling.id() != node.id() && nodes_similar(sibling.value(), node.value()));
    if !has_similar {
        return 0;
    }

    // XPath indices start with 1.
    let mut own_index = 1;
    for sibling in parent.children() {
        if nodes_similar(sibling.value(), node.value()) {
            if sibling.id() == node.id() {
                return own_index;
            }
            own_index += 1;
        }
    }
    0
}

/// Two sibling nodes count against the same XPath expression when they are
/// elements with the same local name, or non-elements of the same kind.
/// The HTML parser folds CDATA sections into text nodes, so text-vs-text
/// comparison already covers them.
fn nodes_similar(left: &Node, right: &Node) -> bool {
    match (left, right) {
        (Node::Element(l), Node::Element(r)) => l.name() == r.name(),
        (Node::Text(_), Node::Text(_)) => true,
        (Node::Comment(_), Node::Comment(_)) => true,
        (Node::ProcessingInstruction(_), Node::ProcessingInstruction(_)) => true,
        (Node::Doctype(_), Node::Doctype(_)) => true,
        (Node::Document, Node::Document) | (Node::Fragment, Node::Fragment) => true,
        _ => false,
    }
}

/// Resolve a builder-emitted XPath back to an element in `document`.
///
/// Supports absolute `/name[i]/...` element paths and the
/// `//*[@id="..."]` shortcut. Anything else resolves to `None`.
pub fn resolve_xpath<'a>(document: &'a Html, xpath: &str) -> Option<ElementRef<'a>> {
    if let Some(rest) = xpath.strip_prefix("//*[@id=\"") {
        let id = rest.strip_suffix("\"]")?;
        return document
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().attr("id") == Some(id));
    }

    let path = xpath.strip_prefix('/')?;
    let mut current = document.tree.root();
    for segment in path.split('/') {
        let (name, index) = parse_segment(segment)?;
        let mut seen = 0;
        let mut next = None;
        for child in current.children() {
            if let Node::Element(el) = child.value() {
                if el.name() == name {
                    seen += 1;
                    if seen == index {
                        next = Some(child);
                        break;
                    }
                }
            }
        }
        current = next?;
    }
    ElementRef::wrap(current)
}

/// Split a path segment into `(local name, 1-based index)`.
/// `text()` and the other non-element steps are not resolvable.
fn parse_segment(segment: &str) -> Option<(&str, usize)> {
    if segment.is_empty() || segment.ends_with(')') {
        return None;
    }
    match segment.split_once('[') {
        Some((name, rest)) => {
            let index = rest.strip_suffix(']')?.parse().ok()?;
            Some((name, index))
        }
        None => Some((segment, 1)),
    }
}

/// Set (or replace) an attribute on the element behind `id`.
pub fn set_attribute(document: &mut Html, id: NodeId, name: &str, value: &str) {
    if let Some(mut node) = document.tree.get_mut(id) {
        if let Node::Element(el) = node.value() {
            let qual = QualName::new(None, Namespace::from(""), LocalName::from(name));
            el.attrs.insert(qual, StrTendril::from(value));
        }
    }
}

/// Serialize the whole document, keeping the doctype when the source had
/// one. Mutations made through the tree are reflected in the output.
pub fn serialize_document(document: &Html) -> String {
    let mut out = String::new();
    let has_doctype = document
        .tree
        .root()
        .children()
        .any(|child| matches!(child.value(), Node::Doctype(_)));
    if has_doctype {
        out.push_str("<!DOCTYPE html>\n");
    }
    out.push_str(&document.root_element().html());
    out
}
