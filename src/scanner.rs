// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for running the keyboard-reachability audit across a
//! project.
//!
//! Walks directory trees, identifies HTML documents, and runs the audit
//! (or the fix pass) per file.

use crate::audit;
use crate::fleet::FindingSet;
use crate::remediate;
use anyhow::Context;
use scraper::Html;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// File extensions to scan
const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "build",
    "_build", "vendor", ".next", ".nuxt", "coverage",
];

/// Where fix-mode output goes
#[derive(Debug, Clone)]
pub enum FixMode {
    /// Audit and compute patches, write nothing
    DryRun,
    /// Rewrite files in place
    InPlace,
    /// Write patched copies under this directory
    OutputDir(PathBuf),
}

/// Scan a directory for keyboard-unreachable elements
pub fn scan_directory(dir: &Path) -> anyhow::Result<FindingSet> {
    let mut all_findings = FindingSet::new();
    let mut files_scanned = 0;

    info!("Scanning directory: {}", dir.display());

    for path in html_files(dir) {
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                info!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let document = Html::parse_document(&content);
        let (_, findings) = audit::audit_document(&document, &path, &content);
        all_findings.extend(findings.findings);
        files_scanned += 1;
    }

    info!("Scanned {} files, found {} issues", files_scanned, all_findings.len());

    Ok(all_findings)
}

/// Scan a single file for keyboard-unreachable elements
pub fn scan_file(path: &Path) -> anyhow::Result<FindingSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let document = Html::parse_document(&content);
    let (_, findings) = audit::audit_document(&document, path, &content);
    Ok(findings)
}

/// Run the fix pass over a file or directory tree.
///
/// Findings for selectors that were patched come back marked fixed. In
/// `DryRun` mode nothing is written; in `OutputDir` mode the input's
/// relative layout is recreated under the output directory.
pub fn fix_path(path: &Path, mode: &FixMode) -> anyhow::Result<FindingSet> {
    let mut all_findings = FindingSet::new();

    if path.is_file() {
        let findings = fix_one(path, path.file_name().map(PathBuf::from), mode)?;
        all_findings.extend(findings.findings);
        return Ok(all_findings);
    }

    info!("Fixing directory: {}", path.display());
    for file in html_files(path) {
        let relative = file.strip_prefix(path).map(PathBuf::from).ok();
        let findings = fix_one(&file, relative, mode)?;
        all_findings.extend(findings.findings);
    }
    Ok(all_findings)
}

/// Fix a single file, writing according to `mode`. `relative` is the
/// path under the output directory when one is in use.
fn fix_one(path: &Path, relative: Option<PathBuf>, mode: &FixMode) -> anyhow::Result<FindingSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let (patched, findings) = remediate::fix_document(&content, path);

    let changed = patched != content;
    match mode {
        FixMode::DryRun => {}
        FixMode::InPlace => {
            if changed {
                std::fs::write(path, &patched)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("Rewrote {}", path.display());
            }
        }
        FixMode::OutputDir(dir) => {
            let target = dir.join(relative.unwrap_or_else(|| PathBuf::from("out.html")));
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&target, &patched)
                .with_context(|| format!("writing {}", target.display()))?;
            info!("Wrote {}", target.display());
        }
    }

    Ok(findings)
}

/// Scannable HTML files under `dir`, skipping build output and VCS
/// directories.
fn html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and excluded directories
            let name = e.file_name().to_str().unwrap_or("");
            if e.file_type().is_dir() {
                return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if SCANNABLE_EXTENSIONS.contains(&ext) {
            files.push(path.to_path_buf());
        }
    }
    files
}
