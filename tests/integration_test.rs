// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for keyreachbot

use keyreachbot::report::{generate_report, OutputFormat};
use keyreachbot::scanner::{self, FixMode};
use std::path::Path;

#[test]
fn test_scan_reachable_fixture() {
    let findings = scanner::scan_file(Path::new("tests/fixtures/reachable.html"))
        .expect("scan should succeed");

    assert!(
        findings.is_empty(),
        "Reachable fixture should have no findings, got {}: {:?}",
        findings.len(),
        findings.findings.iter().map(|f| &f.rule_id).collect::<Vec<_>>()
    );
}

#[test]
fn test_scan_unreachable_fixture() {
    let findings = scanner::scan_file(Path::new("tests/fixtures/unreachable.html"))
        .expect("scan should succeed");

    // One script-bound id selector, one script-bound class selector, and
    // one bare onclick span; the button and the link are exempt.
    assert_eq!(
        findings.len(),
        3,
        "Unreachable fixture should flag three selectors, got {:?}",
        findings.findings.iter().map(|f| &f.selector).collect::<Vec<_>>()
    );
    assert!(findings.has_errors());
    assert!(findings.by_selector("#menu").is_some());
    assert!(findings.by_selector(".card").is_some());

    let card = findings.by_selector(".card").expect("card finding");
    assert_eq!(card.xpaths.len(), 2, "both cards should be located");
}

#[test]
fn test_scan_partial_fixture() {
    let findings = scanner::scan_file(Path::new("tests/fixtures/partial.html"))
        .expect("scan should succeed");

    // The tile carries its own keyboard handler; only the chip is flagged.
    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings.findings[0].element.as_deref(),
        Some("div"),
        "the flagged element is the chip div"
    );
}

#[test]
fn test_scan_fixtures_directory() {
    let findings = scanner::scan_directory(Path::new("tests/fixtures"))
        .expect("scan should succeed");

    assert_eq!(
        findings.len(),
        4,
        "Fixture directory should flag four selectors in total, got {}",
        findings.len()
    );
}

#[test]
fn test_json_report_valid() {
    let findings = scanner::scan_file(Path::new("tests/fixtures/unreachable.html"))
        .expect("scan should succeed");

    let report = generate_report(&findings, OutputFormat::Json);
    let parsed: serde_json::Value =
        serde_json::from_str(&report).expect("JSON report should be valid JSON");

    assert!(parsed["findings"].is_array());
    assert!(!parsed["findings"].as_array().unwrap().is_empty());
}

#[test]
fn test_sarif_report_valid() {
    let findings = scanner::scan_file(Path::new("tests/fixtures/unreachable.html"))
        .expect("scan should succeed");

    let report = generate_report(&findings, OutputFormat::Sarif);
    let parsed: serde_json::Value =
        serde_json::from_str(&report).expect("SARIF report should be valid JSON");

    assert_eq!(parsed["version"], "2.1.0");
    assert!(parsed["runs"].is_array());
    assert!(parsed["runs"][0]["results"].is_array());
    assert!(parsed["runs"][0]["tool"]["driver"]["name"] == "keyreachbot");
}

#[test]
fn test_text_report_format() {
    let findings = scanner::scan_file(Path::new("tests/fixtures/unreachable.html"))
        .expect("scan should succeed");

    let report = generate_report(&findings, OutputFormat::Text);

    assert!(report.contains("Keyreachbot Keyboard Reachability Report"));
    assert!(report.contains("WCAG"));
    assert!(report.contains("RELEASE BLOCKED"));
}

#[test]
fn test_fix_then_rescan_is_clean() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("unreachable.html");
    std::fs::copy(Path::new("tests/fixtures/unreachable.html"), &file)
        .expect("copy fixture");

    let findings = scanner::fix_path(&file, &FixMode::InPlace).expect("fix should succeed");
    assert_eq!(findings.fixed().len(), 3);
    assert!(!findings.blocks_release());

    let patched = std::fs::read_to_string(&file).expect("read back");
    assert!(patched.starts_with("<!DOCTYPE html>"));
    assert!(patched.contains(r#"tabindex="0""#));
    assert!(patched.contains(r#"role="button""#));
    // Native elements stay untouched.
    assert!(patched.contains(r#"<button onclick="save()">Save</button>"#));

    let rescan = scanner::scan_file(&file).expect("rescan should succeed");
    assert!(
        rescan.is_empty(),
        "fixed document should audit clean, got {:?}",
        rescan.findings.iter().map(|f| &f.selector).collect::<Vec<_>>()
    );
}

#[test]
fn test_fix_output_dir_keeps_source_pristine() {
    let out = tempfile::tempdir().expect("tempdir");
    let original = std::fs::read_to_string("tests/fixtures/partial.html").expect("read fixture");

    let findings = scanner::fix_path(
        Path::new("tests/fixtures/partial.html"),
        &FixMode::OutputDir(out.path().to_path_buf()),
    )
    .expect("fix should succeed");
    assert_eq!(findings.fixed().len(), 1);

    // Source fixture untouched, patched copy written under the output dir.
    let after = std::fs::read_to_string("tests/fixtures/partial.html").expect("read fixture");
    assert_eq!(original, after);
    let copy = std::fs::read_to_string(out.path().join("partial.html")).expect("patched copy");
    assert!(copy.contains(r#"role="button""#));
}
