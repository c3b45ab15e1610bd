//! Metadata record parsing.
//!
//! Every entry ships a three-line metadata file: an email line, a title line
//! and an author line, each introduced by its keyword.

use std::fs;
use std::path::Path;

use crate::config::types::{JudgeError, Result};

/// Parsed contents of an entry's metadata file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRecord {
    pub email: String,
    pub title: String,
    pub author: String,
}

/// Parse the metadata file at `path`.
pub fn parse(path: &Path) -> Result<MetadataRecord> {
    if !path.is_file() {
        return Err(JudgeError::StructuralViolation(format!(
            "missing metadata file {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)
        .map_err(|e| JudgeError::Metadata(format!("unreadable metadata file: {e}")))?;

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() != 3 {
        return Err(JudgeError::Metadata(format!(
            "expected 3 metadata lines, found {}",
            lines.len()
        )));
    }

    let email = single_token_field(lines[0], "email")?;
    if !email.contains('@') {
        return Err(JudgeError::Metadata(format!("malformed email {email:?}")));
    }
    let title = remainder_field(lines[1], "title")?;
    let author = remainder_field(lines[2], "author")?;

    Ok(MetadataRecord {
        email,
        title,
        author,
    })
}

/// A line of exactly two tokens, the first being `keyword`.
fn single_token_field(line: &str, keyword: &str) -> Result<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 || tokens[0] != keyword {
        return Err(JudgeError::Metadata(format!("malformed {keyword} line")));
    }
    Ok(tokens[1].to_string())
}

/// A line of the keyword followed by at least one more token; the remainder
/// is the field value.
fn remainder_field(line: &str, keyword: &str) -> Result<String> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some(keyword) {
        return Err(JudgeError::Metadata(format!("malformed {keyword} line")));
    }
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() {
        return Err(JudgeError::Metadata(format!("malformed {keyword} line")));
    }
    Ok(rest.join(" "))
}
