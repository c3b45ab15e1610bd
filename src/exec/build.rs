//! Sandboxed compilation of validated submissions.
//!
//! The compiler runs in compile-only mode with the object output discarded;
//! the harness captures the diagnostic stream as raw bytes and counts them
//! itself. A non-zero compiler exit is the expected case in this contest,
//! so only signals and an empty diagnostic stream are treated as failures.

use std::fs;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Stdio};

use log::debug;

use crate::config::policy::{CategoryPolicy, INCLUDES_FILE};
use crate::config::types::{BuildResult, JudgeError, Result, SubmissionEntry};
use crate::exec::limits;

/// Compiler binary used for every category.
pub const COMPILER: &str = "/usr/bin/g++";

/// Flags common to every submission build.
const COMMON_FLAGS: &[&str] = &["-std=c++11", "-c", "-o", "/dev/null"];

/// Compile one validated entry and capture its diagnostics.
pub fn compile(entry: &SubmissionEntry, policy: &CategoryPolicy) -> Result<BuildResult> {
    let mut cmd = Command::new(COMPILER);
    cmd.arg(&entry.source_path);
    cmd.args(COMMON_FLAGS);
    cmd.args(policy.extra_build_flags);
    for path in include_paths(entry, policy)? {
        cmd.arg(format!("-I{path}"));
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    policy.ceilings.install(&mut cmd);

    debug!("compiling {}: {:?}", entry.identifier, cmd);
    let output = cmd.output()?;

    if let Some(signal) = output.status.signal() {
        if limits::is_limit_signal(signal) {
            return Err(JudgeError::ResourceLimit(format!(
                "compiler killed by signal {signal}"
            )));
        }
        return Err(JudgeError::BuildAnomaly(format!(
            "compiler terminated by signal {signal}"
        )));
    }

    let diagnostic_bytes = output.stderr.len() as u64;
    if diagnostic_bytes == 0 {
        // The contest premise is that submissions provoke diagnostics; a
        // silent build points at the tooling, not at a clean compile.
        return Err(JudgeError::BuildAnomaly(
            "compiler produced no diagnostics".to_string(),
        ));
    }

    debug!(
        "compiled {}: exit {:?}, {} diagnostic bytes",
        entry.identifier,
        output.status.code(),
        diagnostic_bytes
    );

    Ok(BuildResult {
        exit_code: output.status.code(),
        diagnostic_bytes,
        source_bytes: entry.source.len() as u64,
    })
}

/// Include search paths for categories that allow them. A single path with a
/// character outside the allow-list invalidates the whole entry.
fn include_paths(entry: &SubmissionEntry, policy: &CategoryPolicy) -> Result<Vec<String>> {
    if !policy.allows_include_paths {
        return Ok(Vec::new());
    }
    let list = entry.dir.join(INCLUDES_FILE);
    if !list.is_file() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&list)
        .map_err(|e| JudgeError::StructuralViolation(format!("unreadable include list: {e}")))?;

    let mut paths = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !is_safe_path(line) {
            return Err(JudgeError::ContentPolicy(format!(
                "unsafe include path {line:?}"
            )));
        }
        paths.push(line.to_string());
    }
    Ok(paths)
}

/// Filesystem-safe path charset: alphanumerics, slash, dash, underscore, dot.
fn is_safe_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'-' | b'_' | b'.'))
}
