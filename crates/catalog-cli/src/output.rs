//! Result files
//!
//! Every set is written one entry per line, sorted, so runs diff cleanly.

use anyhow::{Context, Result};
use catalog_core::CatalogReport;
use catalog_model::TaxonomyViolation;
use catalog_reconcile::ReconciliationResult;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Listed paths no successful locale references
pub const GLOBAL_UNUSED_FILE: &str = "global_unused_paths.txt";

/// Full structured report
pub const REPORT_FILE: &str = "report.json";

/// Write `lines` to `path`, one per line
///
/// # Errors
/// Fails if the file cannot be written.
pub fn write_lines<I, D>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = D>,
    D: Display,
{
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.to_string());
        text.push('\n');
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Write `<stem>_common_paths.txt`, `<stem>_missing_paths.txt` and `<stem>_orphaned_paths.txt`
///
/// # Errors
/// Fails if any file cannot be written.
pub fn write_result(dir: &Path, stem: &str, result: &ReconciliationResult) -> Result<Vec<PathBuf>> {
    let sets = [
        ("common", &result.common),
        ("missing", &result.missing),
        ("orphaned", &result.orphaned),
    ];
    let mut written = Vec::with_capacity(sets.len());
    for (name, set) in sets {
        let path = dir.join(format!("{stem}_{name}_paths.txt"));
        write_lines(&path, set)?;
        written.push(path);
    }
    Ok(written)
}

/// Write `<stem>_violations.txt`
///
/// # Errors
/// Fails if the file cannot be written.
pub fn write_violations(
    dir: &Path,
    stem: &str,
    violations: &[TaxonomyViolation],
) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}_violations.txt"));
    write_lines(&path, violations)?;
    Ok(path)
}

/// Persist a whole run under `dir`, creating it if needed
///
/// # Errors
/// Fails if the directory or any file cannot be written.
pub fn write_report(dir: &Path, report: &CatalogReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for (locale, locale_report) in &report.locales {
        written.extend(write_result(dir, locale.as_str(), &locale_report.result)?);
        written.push(write_violations(dir, locale.as_str(), &locale_report.violations)?);
    }

    let unused = dir.join(GLOBAL_UNUSED_FILE);
    write_lines(&unused, &report.globally_unused)?;
    written.push(unused);

    let json = dir.join(REPORT_FILE);
    let text = report.to_json_pretty().context("failed to serialize report")?;
    fs::write(&json, text).with_context(|| format!("failed to write {}", json.display()))?;
    written.push(json);

    tracing::info!(dir = %dir.display(), files = written.len(), "wrote results");
    Ok(written)
}
