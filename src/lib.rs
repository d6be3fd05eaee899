// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyreachbot - keyboard reachability audit and remediation bot
//!
//! Part of the gitbot-fleet ecosystem. Keyreachbot is a Tier 2 (Finisher)
//! bot that finds elements wired to mouse-only interaction handlers and
//! patches keyboard support onto them (WCAG 2.1.1 Keyboard, Level A).
//!
//! ## How it works
//!
//! The audit is a single linear pass per HTML document:
//!
//! 1. concatenate the text of every inline `<script>` element;
//! 2. recover variable→selector bindings and handler registrations from
//!    that text with regular expressions (best-effort pattern matching,
//!    not a JavaScript parser);
//! 3. cross-reference elements carrying inline `onclick` attributes;
//! 4. group everything by selector and flag selectors with a click-class
//!    handler and no keyboard-class handler;
//! 5. in fix mode, patch flagged elements with an `onkeydown` handler,
//!    `tabindex="0"`, and `role="button"` (unless a role is declared),
//!    then re-serialize the document.
//!
//! Native `<button>` and `<a>` elements are keyboard-operable already and
//! are never flagged or patched.

pub mod audit;
pub mod dom;
pub mod fleet;
pub mod remediate;
pub mod report;
pub mod scanner;
pub mod script;
