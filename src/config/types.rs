//! Shared types and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::policy::Category;

/// One candidate entry as supplied by the provider.
///
/// Downstream stages treat the record as read-only; auxiliary files are
/// resolved lazily from `dir` using the category policy's filenames.
#[derive(Clone, Debug)]
pub struct SubmissionEntry {
    /// Lowercase alphanumeric identifier, also the entry directory name.
    pub identifier: String,
    /// Directory holding the source and auxiliary files.
    pub dir: PathBuf,
    /// Canonical source file path (`<identifier>.cpp`).
    pub source_path: PathBuf,
    /// Raw source bytes.
    pub source: Vec<u8>,
    /// Category the entry was submitted under.
    pub category: Category,
}

/// Outcome of validating one entry against its category policy.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// The entry may proceed to the build stage. Warnings are advisory,
    /// such as an oversize source in a category that does not hard-reject.
    Pass { warnings: Vec<String> },
    /// The entry is rejected; at least one violation is always present.
    Fail { violations: Vec<JudgeError> },
}

/// What the build executor observed for one validated entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildResult {
    /// Compiler exit code, when it exited normally.
    pub exit_code: Option<i32>,
    /// Exact byte length of the captured diagnostic stream.
    pub diagnostic_bytes: u64,
    /// Exact byte length of the submission source.
    pub source_bytes: u64,
}

/// Error taxonomy. Every failure is scoped to a single entry: the harness
/// reports it and moves on to the next entry.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("structural violation: {0}")]
    StructuralViolation(String),

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("dependency error: {0}")]
    Dependency(String),

    #[error("content policy error: {0}")]
    ContentPolicy(String),

    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    #[error("build anomaly: {0}")]
    BuildAnomaly(String),

    #[error("behavioral mismatch: {0}")]
    BehavioralMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, JudgeError>;
