// SPDX-License-Identifier: PMPL-1.0-or-later
//! Fix pass: patch keyboard affordances onto non-compliant elements.
//!
//! For every selector the audit flagged, the pass resolves the live
//! element(s) - directly for ID selectors, through the recorded XPaths for
//! class and synthetic selectors - and applies the static-document
//! equivalent of the runtime fix: an `onkeydown` attribute that triggers a
//! synthetic click on Enter/Space, `tabindex="0"` for tab reachability,
//! and `role="button"` when no role is declared. Unresolvable lookups are
//! logged and skipped; one bad element never aborts the remaining fixes.

use crate::audit;
use crate::dom;
use crate::fleet::FindingSet;
use ego_tree::NodeId;
use scraper::{Html, Node, Selector};
use std::path::Path;
use tracing::{info, warn};

/// Keydown handler injected onto patched elements. Accepts Enter and
/// Space (`event.key` is `" "` for the space bar; the `"Space"` literal
/// covers non-conforming dispatchers) and forwards to the click handler.
pub const KEYDOWN_HANDLER: &str =
    "if(event.key==='Enter'||event.key===' '||event.key==='Space'){event.preventDefault();this.click();}";

/// Audit `content` and return the patched document alongside the findings,
/// with every finding that was actually remediated marked fixed.
///
/// A document with nothing to patch is returned byte-identical; the tree
/// is only re-serialized when at least one element changed.
pub fn fix_document(content: &str, path: &Path) -> (String, FindingSet) {
    let mut document = Html::parse_document(content);
    let (_, mut findings) = audit::audit_document(&document, path, content);

    let mut patched_any = false;
    for finding in &mut findings.findings {
        let Some(selector) = finding.selector.clone() else {
            continue;
        };

        let targets = resolve_targets(&document, &selector, &finding.xpaths);
        if targets.is_empty() {
            warn!(selector = %selector, "no live element resolved for selector, skipping");
            continue;
        }

        let mut fixed_here = false;
        for target in targets {
            if patch_element(&mut document, target, &selector) {
                fixed_here = true;
            }
        }
        if fixed_here {
            finding.mark_fixed();
            patched_any = true;
        }
    }

    let output = if patched_any {
        dom::serialize_document(&document)
    } else {
        content.to_string()
    };
    (output, findings)
}

/// Resolve the elements a finding refers to. ID selectors resolve directly
/// (first match, as a single-element lookup); everything else re-evaluates
/// the XPaths recorded at scan time. Native keyboard-operable elements are
/// never fix targets.
fn resolve_targets(document: &Html, selector: &str, xpaths: &[String]) -> Vec<NodeId> {
    if selector.starts_with('#') {
        let Ok(parsed) = Selector::parse(selector) else {
            return Vec::new();
        };
        return document
            .select(&parsed)
            .filter(|el| !dom::is_native_keyboard_operable(el.value()))
            .map(|el| el.id())
            .take(1)
            .collect();
    }

    xpaths
        .iter()
        .filter_map(|xpath| {
            let resolved = dom::resolve_xpath(document, xpath);
            if resolved.is_none() {
                warn!(%xpath, "recorded xpath no longer resolves");
            }
            resolved
        })
        .filter(|el| !dom::is_native_keyboard_operable(el.value()))
        .map(|el| el.id())
        .collect()
}

/// Apply the keyboard affordances to one element. An existing `role`
/// wins over the forced button role.
fn patch_element(document: &mut Html, target: NodeId, selector: &str) -> bool {
    let has_role = match document.tree.get(target) {
        Some(node) => match node.value() {
            Node::Element(el) => el.attr("role").is_some(),
            _ => return false,
        },
        None => return false,
    };

    info!(%selector, "fixing keyboard-unreachable element");
    dom::set_attribute(document, target, "onkeydown", KEYDOWN_HANDLER);
    // Make the element focusable
    dom::set_attribute(document, target, "tabindex", "0");
    if !has_role {
        dom::set_attribute(document, target, "role", "button");
    }
    true
}
