// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard-reachability audit - WCAG 2.1.1 Keyboard (Level A)
//!
//! Cross-references handler registrations recovered from inline script
//! text with elements carrying inline `onclick` attributes, groups them by
//! selector, and flags every selector whose handler set has a click-class
//! event but no keyboard-class event. Native `<button>` and `<a>` elements
//! are keyboard-operable already and never flagged.

use crate::dom;
use crate::fleet::{Finding, FindingSet, ImpactAssessment, Severity, WcagLevel};
use crate::script;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// Rule id for selectors bound to click handlers in script text
pub const RULE_CLICK_ONLY: &str = "WCAG-2.1.1-click-only-handler";
/// Rule id for elements with a bare inline onclick attribute
pub const RULE_INLINE_ONCLICK: &str = "WCAG-2.1.1-inline-onclick";

/// Click-class events: mouse activation the audit looks for
const CLICK_EVENTS: &[&str] = &["click"];
/// Keyboard-class events: any of these makes a selector compliant
const KEYBOARD_EVENTS: &[&str] = &["keydown", "keyup", "keypress"];

/// All handler activity observed for one selector, after grouping.
/// Built once per scan and discarded after the fix pass.
#[derive(Debug, Clone)]
pub struct HandlerRecord {
    /// CSS/ID selector, or a synthetic `inline{N}` tag
    pub selector: String,
    /// Event types seen for this selector
    pub events: BTreeSet<String>,
    /// Captured handler body text (reported, never interpreted)
    pub actions: String,
    /// XPath locations of matching non-native elements
    pub xpaths: Vec<String>,
    /// Tag name of the first matching element
    pub element: Option<String>,
    /// Record came from an inline onclick attribute rather than script text
    pub synthetic: bool,
    /// Selector matched elements, but all of them were native
    /// keyboard-operable ones or already carry a keyboard handler
    /// attribute; nothing to report or fix
    pub exempt: bool,
}

/// Keyboard handler attributes that make an element reachable on their own
const KEYBOARD_ATTRIBUTES: &[&str] = &["onkeydown", "onkeyup", "onkeypress"];

fn has_keyboard_attribute(element: &scraper::node::Element) -> bool {
    KEYBOARD_ATTRIBUTES.iter().any(|attr| element.attr(attr).is_some())
}

impl HandlerRecord {
    /// A record is compliant when it carries no click-class event at all,
    /// or when a keyboard-class event accompanies the click.
    pub fn is_keyboard_reachable(&self) -> bool {
        let has_click = self.events.iter().any(|e| CLICK_EVENTS.contains(&e.as_str()));
        let has_keyboard = self
            .events
            .iter()
            .any(|e| KEYBOARD_EVENTS.contains(&e.as_str()));
        !has_click || has_keyboard
    }
}

/// Concatenate the text of every inline `<script>` element.
pub fn collect_script_text(document: &Html) -> String {
    let script_sel = Selector::parse("script").expect("valid selector");
    let mut js = String::new();
    for tag in document.select(&script_sel) {
        js.push_str(&tag.text().collect::<String>());
        js.push('\n');
    }
    js
}

/// Run the full audit over a parsed document.
///
/// Returns the grouped handler records alongside the findings for every
/// selector that fails the keyboard-reachability check. `content` is the
/// raw document text, used only to attach line numbers to findings.
pub fn audit_document(document: &Html, path: &Path, content: &str) -> (Vec<HandlerRecord>, FindingSet) {
    let mut records = collect_records(document);
    let mut findings = FindingSet::new();

    for record in &mut records {
        if record.is_keyboard_reachable() || record.exempt {
            continue;
        }

        let rule_id = if record.synthetic { RULE_INLINE_ONCLICK } else { RULE_CLICK_ONLY };
        let message = if record.synthetic {
            format!(
                "<{}> has an onclick attribute but no keyboard event handler. Click-only interactions are not keyboard accessible.",
                record.element.as_deref().unwrap_or("element"),
            )
        } else {
            format!(
                "Selector '{}' is bound to {} but has no keyboard event handler. Click-only interactions are not keyboard accessible.",
                record.selector,
                record
                    .events
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };

        let mut finding = Finding::new(rule_id, Severity::Error, &message)
            .with_wcag("2.1.1", WcagLevel::A)
            .with_rule_name("Keyboard: Click-only Interaction")
            .with_file(path.to_path_buf())
            .with_selector(&record.selector)
            .with_events(record.events.iter().cloned().collect())
            .with_xpaths(record.xpaths.clone())
            .with_suggestion(
                "Add a keydown handler triggering the click action, tabindex=\"0\", and role=\"button\" (or use a native <button>)",
            )
            .as_fixable()
            .with_impact(ImpactAssessment::keyboard());

        if let Some(ref element) = record.element {
            finding = finding.with_element(element);
        }
        if let Some(line) = find_selector_line(content, &record.selector, record.synthetic) {
            finding = finding.with_line(line);
        }

        findings.add(finding);
    }

    (records, findings)
}

/// Collect and group handler records from both sources: script-text
/// registrations and inline onclick attributes.
fn collect_records(document: &Html) -> Vec<HandlerRecord> {
    let js = script::strip_comments(&collect_script_text(document));
    let handlers = script::extract_handlers(&js);

    let mut records: Vec<HandlerRecord> = Vec::new();
    let mut by_selector: HashMap<String, usize> = HashMap::new();

    for handler in handlers {
        let index = *by_selector.entry(handler.selector.clone()).or_insert_with(|| {
            records.push(HandlerRecord {
                selector: handler.selector.clone(),
                events: BTreeSet::new(),
                actions: String::new(),
                xpaths: Vec::new(),
                element: None,
                synthetic: false,
                exempt: false,
            });
            records.len() - 1
        });
        let record = &mut records[index];
        record.events.insert(handler.event);
        if record.actions.is_empty() {
            record.actions = handler.actions;
        }
    }

    // XPaths of the elements each selector currently matches, skipping
    // native keyboard-operable elements and elements that already carry a
    // keyboard handler attribute (the script scan cannot see those, but
    // they are reachable and must not be re-patched).
    for record in &mut records {
        let selector = match Selector::parse(&record.selector) {
            Ok(s) => s,
            Err(_) => {
                debug!(selector = %record.selector, "unparseable selector, skipping element lookup");
                continue;
            }
        };
        let mut matched = 0;
        for element in document.select(&selector) {
            matched += 1;
            if dom::is_native_keyboard_operable(element.value())
                || has_keyboard_attribute(element.value())
            {
                continue;
            }
            if record.element.is_none() {
                record.element = Some(element.value().name().to_string());
            }
            record.xpaths.push(dom::xpath_for(*element, false));
        }
        record.exempt = matched > 0 && record.xpaths.is_empty();
    }

    // Elements wired through onclick attributes, each under a synthetic
    // selector tag. Keyboard attributes on the same element count toward
    // compliance.
    let onclick_sel = Selector::parse("[onclick]").expect("valid selector");
    let mut inline_counter = 0;
    for element in document.select(&onclick_sel) {
        if dom::is_native_keyboard_operable(element.value()) {
            continue;
        }
        let mut events = BTreeSet::new();
        events.insert("click".to_string());
        for keyboard_attr in KEYBOARD_ATTRIBUTES {
            if element.value().attr(keyboard_attr).is_some() {
                events.insert(keyboard_attr.trim_start_matches("on").to_string());
            }
        }
        records.push(HandlerRecord {
            selector: format!("inline{inline_counter}"),
            events,
            actions: element.value().attr("onclick").unwrap_or("").to_string(),
            xpaths: vec![dom::xpath_for(*element, false)],
            element: Some(element.value().name().to_string()),
            synthetic: true,
            exempt: false,
        });
        inline_counter += 1;
    }

    records
}

/// Best-effort line lookup for a selector: finds the first source line
/// mentioning the id/class (or, for synthetic records, an onclick
/// attribute). 1-indexed.
fn find_selector_line(content: &str, selector: &str, synthetic: bool) -> Option<usize> {
    let lower_lines = content.lines().map(|l| l.to_lowercase());
    if synthetic {
        for (idx, line) in lower_lines.enumerate() {
            if line.contains("onclick") && !line.contains("<button") && !line.contains("<a ") {
                return Some(idx + 1);
            }
        }
        return None;
    }

    let needle = if let Some(id) = selector.strip_prefix('#') {
        format!("id=\"{}\"", id.to_lowercase())
    } else if let Some(class) = selector.strip_prefix('.') {
        format!("class=\"{}", class.to_lowercase())
    } else {
        return None;
    };
    for (idx, line) in lower_lines.enumerate() {
        if line.contains(&needle) {
            return Some(idx + 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit(html: &str) -> (Vec<HandlerRecord>, FindingSet) {
        let document = Html::parse_document(html);
        audit_document(&document, Path::new("test.html"), html)
    }

    #[test]
    fn test_click_only_binding_reported() {
        let html = r#"
            <html><body>
            <div id="menu">Menu</div>
            <script>
                const menu = document.getElementById("menu");
                menu.addEventListener("click", function (e) { open(); });
            </script>
            </body></html>
        "#;
        let (records, findings) = audit(html);
        let record = records.iter().find(|r| r.selector == "#menu").expect("record");
        assert!(!record.is_keyboard_reachable());
        assert_eq!(record.xpaths.len(), 1);

        let finding = findings.by_selector("#menu").expect("finding");
        assert_eq!(finding.rule_id, RULE_CLICK_ONLY);
        assert_eq!(finding.severity, Severity::Error);
        assert!(finding.fixable);
    }

    #[test]
    fn test_click_and_keydown_compliant() {
        let html = r#"
            <html><body>
            <div id="menu">Menu</div>
            <script>
                const menu = document.getElementById("menu");
                menu.addEventListener("click", function (e) { open(); });
                menu.addEventListener("keydown", function (e) { open(); });
            </script>
            </body></html>
        "#;
        let (records, findings) = audit(html);
        let record = records.iter().find(|r| r.selector == "#menu").expect("record");
        assert!(record.is_keyboard_reachable());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_keyup_counts_as_keyboard_class() {
        let html = r#"
            <html><body>
            <div id="menu">Menu</div>
            <script>
                const menu = document.getElementById("menu");
                menu.addEventListener("click", function (e) { open(); });
                menu.addEventListener("keyup", function (e) { open(); });
            </script>
            </body></html>
        "#;
        let (_, findings) = audit(html);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_native_button_never_reported() {
        let html = r#"
            <html><body>
            <button id="save">Save</button>
            <a id="home" href="/">Home</a>
            <script>
                const save = document.getElementById("save");
                save.addEventListener("click", function (e) { persist(); });
                const home = document.getElementById("home");
                home.addEventListener("click", function (e) { go(); });
            </script>
            </body></html>
        "#;
        let (records, findings) = audit(html);
        assert!(records.iter().all(|r| r.exempt));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_inline_onclick_collected() {
        let html = r#"
            <html><body>
            <div onclick="doStuff()">Click me</div>
            <button onclick="fine()">OK</button>
            </body></html>
        "#;
        let (records, findings) = audit(html);
        let synthetic: Vec<_> = records.iter().filter(|r| r.synthetic).collect();
        assert_eq!(synthetic.len(), 1);
        assert_eq!(synthetic[0].selector, "inline0");
        assert_eq!(synthetic[0].element.as_deref(), Some("div"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.findings[0].rule_id, RULE_INLINE_ONCLICK);
    }

    #[test]
    fn test_inline_onclick_with_onkeydown_compliant() {
        let html = r#"
            <html><body>
            <div onclick="doStuff()" onkeydown="doStuff()" tabindex="0">Click me</div>
            </body></html>
        "#;
        let (_, findings) = audit(html);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_script_click_with_keyboard_attribute_exempt() {
        // The script scan cannot see attributes, but an element carrying
        // its own onkeydown is reachable and must not be flagged. This is
        // also what keeps a second pass over fixed output clean.
        let html = r#"
            <html><body>
            <div id="menu" onkeydown="open(event)">Menu</div>
            <script>
                const menu = document.getElementById("menu");
                menu.addEventListener("click", function (e) { open(); });
            </script>
            </body></html>
        "#;
        let (records, findings) = audit(html);
        let record = records.iter().find(|r| r.selector == "#menu").expect("record");
        assert!(record.exempt);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_class_selector_collects_all_matches() {
        let html = r#"
            <html><body>
            <div class="card">a</div>
            <div class="card">b</div>
            <script>
                var card = document.getElementsByClassName("card");
                card.onclick = function () { flip(); };
            </script>
            </body></html>
        "#;
        let (records, findings) = audit(html);
        let record = records.iter().find(|r| r.selector == ".card").expect("record");
        assert_eq!(record.xpaths.len(), 2);
        assert_eq!(record.xpaths[0], "/html/body/div[1]");
        assert_eq!(record.xpaths[1], "/html/body/div[2]");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_unparseable_selector_degrades_silently() {
        let html = r#"
            <html><body>
            <script>
                123bad.addEventListener("click", function () { x(); });
            </script>
            </body></html>
        "#;
        // "123bad" is not a parseable selector; the lookup is skipped and
        // the dangling record is still reported with no locations.
        let (_, findings) = audit(html);
        assert_eq!(findings.len(), 1);
        assert!(findings.findings[0].xpaths.is_empty());
    }

    #[test]
    fn test_finding_carries_line_number() {
        let html = "<html><body>\n<div id=\"menu\">Menu</div>\n<script>\nconst menu = document.getElementById(\"menu\");\nmenu.onclick = function () { open(); };\n</script>\n</body></html>";
        let (_, findings) = audit(html);
        let finding = findings.by_selector("#menu").expect("finding");
        assert_eq!(finding.line, Some(2));
    }
}
