// SPDX-License-Identifier: PMPL-1.0-or-later
//! Static extraction of event-handler registrations from inline script text.
//!
//! This is deliberately regex-based pattern matching over non-canonical
//! source text, not a JavaScript parser: it recovers the common
//! `var x = document.getElementById(...)` / `x.addEventListener(...)`
//! shapes and nothing more. Nested braces, template literals, arrow
//! functions, and framework-generated code are all outside what these
//! patterns can see, and a string literal containing `//` or `/*` will
//! confuse the comment stripper.

use regex::Regex;
use std::collections::HashMap;

/// One handler registration recovered from script text.
///
/// `selector` is the receiver resolved through the binding table when the
/// declaration was seen (`#id`, `.class`), or the raw variable name when it
/// was not. `actions` is the captured handler body, carried for reporting
/// but never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerBinding {
    pub selector: String,
    pub event: String,
    pub actions: String,
}

/// Remove `//` line comments and `/* */` block comments.
///
/// Naive: unaware of string literals, so `"http://..."` loses its tail.
pub fn strip_comments(code: &str) -> String {
    let line = Regex::new(r"(?m)//.*$").expect("valid regex");
    let block = Regex::new(r"(?s)/\*.*?\*/").expect("valid regex");
    let without_line = line.replace_all(code, "");
    block.replace_all(&without_line, "").into_owned()
}

/// Build the variable → selector table from declarations of the form
/// `const|let|var x = document.getElementById("...")` (and the
/// getElementsByClassName / querySelector variants).
pub fn extract_bindings(js: &str) -> HashMap<String, String> {
    let decl = Regex::new(
        r#"(?:const|let|var)\s+(\w+)\s*=\s*document\.(getElementById|getElementsByClassName|querySelector)\(\s*["']([^"']+)["']\s*\)"#,
    )
    .expect("valid regex");

    let mut bindings = HashMap::new();
    for caps in decl.captures_iter(js) {
        let name = &caps[1];
        let selector = normalize_selector(&caps[2], &caps[3]);
        if selector != "window" {
            bindings.insert(name.to_string(), selector);
        }
    }
    bindings
}

/// Normalize a lookup-method argument into CSS selector form:
/// getElementById("x") → `#x`, getElementsByClassName("x") → `.x`,
/// querySelector keeps `.`/`#` prefixes and class-prefixes anything else.
fn normalize_selector(method: &str, arg: &str) -> String {
    match method {
        "getElementById" => format!("#{arg}"),
        "getElementsByClassName" => format!(".{arg}"),
        _ => {
            if arg.starts_with('.') || arg.starts_with('#') {
                arg.to_string()
            } else {
                format!(".{arg}")
            }
        }
    }
}

/// Extract every handler registration from (comment-stripped) script text.
///
/// Matches both `x.addEventListener("ev", function (...) {...})` and the
/// property form `x.onev = function (...) {...}`. Handler bodies are
/// captured lazily up to the first `}`; there is no brace balancing.
/// Registrations on `window` are discarded.
pub fn extract_handlers(js: &str) -> Vec<HandlerBinding> {
    let bindings = extract_bindings(js);

    let add_listener = Regex::new(
        r#"(\w+)\.addEventListener\(\s*["'](\w+)["']\s*,\s*function\s*\([^)]*\)\s*\{([\s\S]*?)\}\s*\)"#,
    )
    .expect("valid regex");
    let on_property =
        Regex::new(r"(\w+)\.on(\w+)\s*=\s*function\s*\([^)]*\)\s*\{([\s\S]*?)\}")
            .expect("valid regex");

    let mut handlers = Vec::new();
    for caps in add_listener.captures_iter(js) {
        push_handler(&mut handlers, &bindings, &caps[1], &caps[2], &caps[3]);
    }
    for caps in on_property.captures_iter(js) {
        push_handler(&mut handlers, &bindings, &caps[1], &caps[2], &caps[3]);
    }
    handlers
}

fn push_handler(
    handlers: &mut Vec<HandlerBinding>,
    bindings: &HashMap<String, String>,
    variable: &str,
    event: &str,
    actions: &str,
) {
    let selector = bindings
        .get(variable)
        .cloned()
        .unwrap_or_else(|| variable.to_string());
    if selector == "window" {
        return;
    }
    handlers.push(HandlerBinding {
        selector,
        event: event.to_ascii_lowercase(),
        actions: actions.trim().to_string(),
    });
}
