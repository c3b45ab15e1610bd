//! Category rule validation.
//!
//! Checks run in a fixed order and the first failing check decides the
//! outcome, so a rejected entry never reaches the compiler. The extra-file
//! check is the one stage that can report several violations at once.

use std::fs;
use std::sync::OnceLock;

use log::debug;
use regex::bytes::Regex;

use crate::config::policy::{CategoryPolicy, LexicalPolicy, INFO_FILE, PACKAGES_FILE};
use crate::config::types::{JudgeError, SubmissionEntry, ValidationOutcome};
use crate::contest::metadata;
use crate::contest::packages::PackageOracle;

type Check = std::result::Result<(), JudgeError>;

/// Recognizer for an include directive, applied per source line.
fn include_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*#\s*include\s*[<"]([^>"]*)[>"]"#).expect("include pattern is valid")
    })
}

/// Validate one entry against its category policy.
pub fn validate(
    entry: &SubmissionEntry,
    policy: &CategoryPolicy,
    oracle: &dyn PackageOracle,
) -> ValidationOutcome {
    let mut warnings = Vec::new();

    if let Err(v) = check_identifier(entry) {
        return fail(v);
    }
    match check_size(entry, policy) {
        Ok(note) => warnings.extend(note),
        Err(v) => return fail(v),
    }
    if let Err(v) = check_lexical(entry, policy) {
        return fail(v);
    }
    let extra = check_extra_files(entry, policy);
    if !extra.is_empty() {
        return ValidationOutcome::Fail { violations: extra };
    }
    if let Err(v) = check_metadata(entry) {
        return fail(v);
    }
    if let Err(v) = check_dependencies(entry, policy, oracle) {
        return fail(v);
    }

    debug!("entry {} passed validation", entry.identifier);
    ValidationOutcome::Pass { warnings }
}

fn fail(violation: JudgeError) -> ValidationOutcome {
    ValidationOutcome::Fail {
        violations: vec![violation],
    }
}

/// Identifiers are lowercase alphanumeric tokens.
fn check_identifier(entry: &SubmissionEntry) -> Check {
    let ok = !entry.identifier.is_empty()
        && entry
            .identifier
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !ok {
        return Err(JudgeError::StructuralViolation(format!(
            "identifier {:?} is not lowercase alphanumeric",
            entry.identifier
        )));
    }
    Ok(())
}

/// Enforce or flag the category byte ceiling.
fn check_size(
    entry: &SubmissionEntry,
    policy: &CategoryPolicy,
) -> std::result::Result<Option<String>, JudgeError> {
    let len = entry.source.len();
    if len <= policy.size_ceiling {
        return Ok(None);
    }
    let message = format!(
        "source is {len} bytes, ceiling is {} bytes",
        policy.size_ceiling
    );
    if policy.oversize_rejects {
        return Err(JudgeError::ContentPolicy(message));
    }
    Ok(Some(message))
}

/// Line-by-line lexical policy.
fn check_lexical(entry: &SubmissionEntry, policy: &CategoryPolicy) -> Check {
    let permitted = match policy.lexical {
        LexicalPolicy::Unrestricted => return Ok(()),
        LexicalPolicy::NoPreprocessor => None,
        LexicalPolicy::RestrictedIncludes(set) => Some(set),
    };

    for (index, line) in entry.source.split(|&b| b == b'\n').enumerate() {
        let lineno = index + 1;
        if let Some(set) = permitted {
            if let Some(caps) = include_pattern().captures(line) {
                let header = caps.get(1).map(|m| m.as_bytes()).unwrap_or(b"");
                if set.iter().any(|h| h.as_bytes() == header) {
                    continue;
                }
                return Err(JudgeError::ContentPolicy(format!(
                    "include <{}> not permitted (line {lineno})",
                    String::from_utf8_lossy(header)
                )));
            }
        }
        if let Some(marker) = banned_marker(line) {
            return Err(JudgeError::ContentPolicy(format!(
                "{marker} on line {lineno}"
            )));
        }
    }
    Ok(())
}

/// Banned constructs: the preprocessor marker, its trigraph form, and a
/// line continuation that could splice one across the line-based scan.
fn banned_marker(line: &[u8]) -> Option<&'static str> {
    if line.contains(&b'#') {
        return Some("preprocessor marker");
    }
    if line.windows(3).any(|w| w == b"??=") {
        return Some("trigraph preprocessor marker");
    }
    let last = line.iter().rev().find(|b| !b.is_ascii_whitespace());
    if last == Some(&b'\\') {
        return Some("line continuation");
    }
    None
}

/// Every file in the entry directory must be in the allowed set.
fn check_extra_files(entry: &SubmissionEntry, policy: &CategoryPolicy) -> Vec<JudgeError> {
    let allowed = policy.allowed_files(&entry.identifier);
    let listing = match fs::read_dir(&entry.dir) {
        Ok(listing) => listing,
        Err(e) => {
            return vec![JudgeError::StructuralViolation(format!(
                "unreadable entry directory {}: {e}",
                entry.dir.display()
            ))]
        }
    };

    let mut violations = Vec::new();
    for dir_entry in listing.flatten() {
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if !allowed.iter().any(|a| a == &name) {
            violations.push(JudgeError::StructuralViolation(format!(
                "unexpected file {name:?} in entry directory"
            )));
        }
    }
    violations
}

/// The metadata file must parse into its three fields.
fn check_metadata(entry: &SubmissionEntry) -> Check {
    let record = metadata::parse(&entry.dir.join(INFO_FILE))?;
    debug!(
        "entry {}: {:?} by {:?}",
        entry.identifier, record.title, record.author
    );
    Ok(())
}

/// Every declared package must resolve to installed.
fn check_dependencies(
    entry: &SubmissionEntry,
    policy: &CategoryPolicy,
    oracle: &dyn PackageOracle,
) -> Check {
    if !policy.requires_packages {
        return Ok(());
    }
    let list = entry.dir.join(PACKAGES_FILE);
    if !list.is_file() {
        return Err(JudgeError::StructuralViolation(format!(
            "missing package list {}",
            list.display()
        )));
    }
    let text = fs::read_to_string(&list)
        .map_err(|e| JudgeError::StructuralViolation(format!("unreadable package list: {e}")))?;

    for name in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !oracle.installed(name)? {
            return Err(JudgeError::Dependency(format!(
                "package {name} is not installed"
            )));
        }
    }
    Ok(())
}
