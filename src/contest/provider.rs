//! Contest-tree scanning.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::config::policy::CategoryPolicy;
use crate::config::types::{JudgeError, Result, SubmissionEntry};

/// Enumerate the entries of one category under the contest root.
///
/// Entries that cannot be normalized (unreadable directory, missing source
/// file) are reported and skipped; they never abort the scan. An absent
/// category directory yields an empty list.
pub fn scan(root: &Path, policy: &'static CategoryPolicy) -> Result<Vec<SubmissionEntry>> {
    let category_dir = root.join(policy.dir_name);
    if !category_dir.is_dir() {
        info!(
            "category directory {} not present, nothing to evaluate",
            category_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for dir_entry in fs::read_dir(&category_dir)? {
        let dir_entry = dir_entry?;
        if dir_entry.path().is_dir() {
            names.push(dir_entry.file_name().to_string_lossy().into_owned());
        }
    }
    // Deterministic scan order regardless of directory iteration order.
    names.sort();

    let mut entries = Vec::new();
    for name in names {
        match load_entry(&category_dir.join(&name), &name, policy) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("skipping entry {name}: {e}"),
        }
    }
    Ok(entries)
}

fn load_entry(
    dir: &Path,
    identifier: &str,
    policy: &'static CategoryPolicy,
) -> Result<SubmissionEntry> {
    let source_path = dir.join(policy.source_filename(identifier));
    if !source_path.is_file() {
        return Err(JudgeError::StructuralViolation(format!(
            "missing source file {}",
            source_path.display()
        )));
    }
    let source = fs::read(&source_path)?;
    Ok(SubmissionEntry {
        identifier: identifier.to_string(),
        dir: dir.to_path_buf(),
        source_path,
        source,
        category: policy.category,
    })
}
