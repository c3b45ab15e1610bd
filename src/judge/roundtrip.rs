//! Round-trip behavioral verification.
//!
//! A round-trip entry ships a reference program that must reverse a byte
//! stream from an input path to an output path. The reference gates the
//! entry: only when it differs from the submission by exactly one edit,
//! builds warning-clean, and reverses a fresh test vector does the
//! submission proceed to the ordinary build and scoring stages.
//!
//! Verification walks four stages in order: edit check, reference build,
//! execution, output check. Scratch artifacts are removed before returning,
//! whichever stage decided the outcome.

use std::fs;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::config::policy::{CategoryPolicy, REFERENCE_FILE};
use crate::config::types::{JudgeError, Result, SubmissionEntry};
use crate::exec::build::COMPILER;
use crate::exec::limits;
use crate::judge::{distance, testvec};

/// Warning flags for the reference build. The reference must compile in
/// silence even under elevated strictness to count as a trustworthy oracle.
const REFERENCE_FLAGS: &[&str] = &["-std=c++11", "-Wall", "-Wextra"];

/// Scratch root scoped by effective UID so different users never collide on
/// the shared temp directory.
pub fn scratch_root() -> PathBuf {
    let euid = unsafe { libc::geteuid() };
    std::env::temp_dir().join(format!("errblast-uid-{euid}"))
}

/// Fixed-name scratch files reused across entries. The harness is strictly
/// sequential, so reuse cannot race.
struct Scratch {
    binary: PathBuf,
    input: PathBuf,
    output: PathBuf,
}

impl Scratch {
    fn in_dir(root: &Path) -> Self {
        Scratch {
            binary: root.join("reference-bin"),
            input: root.join("roundtrip.in"),
            output: root.join("roundtrip.out"),
        }
    }

    /// Remove every scratch artifact. Idempotent: absent files are fine;
    /// anything else is logged without masking the verification outcome.
    fn remove_all(&self) {
        for path in [&self.binary, &self.input, &self.output] {
            match fs::remove_file(path) {
                Ok(()) => debug!("removed scratch file {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("failed to remove scratch file {}: {e}", path.display()),
            }
        }
    }
}

/// Verify one round-trip entry. Scratch files are removed before returning,
/// whatever the outcome.
pub fn verify(
    entry: &SubmissionEntry,
    policy: &CategoryPolicy,
    rng: &mut fastrand::Rng,
) -> Result<()> {
    let root = scratch_root();
    fs::create_dir_all(&root)?;
    let scratch = Scratch::in_dir(&root);
    let outcome = run_stages(entry, policy, rng, &scratch);
    scratch.remove_all();
    outcome
}

fn run_stages(
    entry: &SubmissionEntry,
    policy: &CategoryPolicy,
    rng: &mut fastrand::Rng,
    scratch: &Scratch,
) -> Result<()> {
    check_edit_distance(entry)?;
    build_reference(entry, policy, scratch)?;
    let vector = execute_reference(policy, rng, scratch)?;
    check_output(&vector, scratch)?;
    debug!("entry {} accepted by round-trip verification", entry.identifier);
    Ok(())
}

/// The reference must differ from the submission by exactly one byte edit.
fn check_edit_distance(entry: &SubmissionEntry) -> Result<()> {
    let reference_path = entry.dir.join(REFERENCE_FILE);
    if !reference_path.is_file() {
        return Err(JudgeError::StructuralViolation(format!(
            "missing reference source {}",
            reference_path.display()
        )));
    }
    let reference = fs::read(&reference_path)?;
    let d = distance::levenshtein(&entry.source, &reference);
    if d != 1 {
        return Err(JudgeError::BehavioralMismatch(format!(
            "edit distance to reference is {d}, expected exactly 1"
        )));
    }
    Ok(())
}

/// Compile the reference with warnings enabled. Any exit failure or any
/// output at all rejects the entry.
fn build_reference(
    entry: &SubmissionEntry,
    policy: &CategoryPolicy,
    scratch: &Scratch,
) -> Result<()> {
    let mut cmd = Command::new(COMPILER);
    cmd.arg(entry.dir.join(REFERENCE_FILE));
    cmd.args(REFERENCE_FLAGS);
    cmd.arg("-o").arg(&scratch.binary);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    policy.ceilings.install(&mut cmd);

    let output = cmd.output()?;
    if let Some(signal) = output.status.signal() {
        if limits::is_limit_signal(signal) {
            return Err(JudgeError::ResourceLimit(format!(
                "reference compile killed by signal {signal}"
            )));
        }
    }
    if !output.status.success() {
        return Err(JudgeError::BehavioralMismatch(format!(
            "reference failed to compile (exit {:?})",
            output.status.code()
        )));
    }
    if !output.stdout.is_empty() || !output.stderr.is_empty() {
        return Err(JudgeError::BehavioralMismatch(
            "reference compile was not silent".to_string(),
        ));
    }
    Ok(())
}

/// Run the reference binary over a fresh test vector.
fn execute_reference(
    policy: &CategoryPolicy,
    rng: &mut fastrand::Rng,
    scratch: &Scratch,
) -> Result<Vec<u8>> {
    let vector = testvec::generate(rng);
    fs::write(&scratch.input, &vector)?;

    let mut cmd = Command::new(&scratch.binary);
    cmd.arg(&scratch.input).arg(&scratch.output);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    policy.ceilings.install(&mut cmd);

    let status = cmd.status()?;
    if let Some(signal) = status.signal() {
        if limits::is_limit_signal(signal) {
            return Err(JudgeError::ResourceLimit(format!(
                "reference run killed by signal {signal}"
            )));
        }
    }
    if !status.success() {
        return Err(JudgeError::BehavioralMismatch(format!(
            "reference run failed (exit {:?})",
            status.code()
        )));
    }
    if !scratch.output.is_file() {
        return Err(JudgeError::BehavioralMismatch(
            "reference produced no output file".to_string(),
        ));
    }
    Ok(vector)
}

/// The produced output must be the byte-reverse of the test vector.
fn check_output(vector: &[u8], scratch: &Scratch) -> Result<()> {
    let produced = fs::read(&scratch.output)?;
    let mut expected = vector.to_vec();
    expected.reverse();
    if produced != expected {
        return Err(JudgeError::BehavioralMismatch(
            "reference output is not the reversed input".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::policy::Category;

    fn roundtrip_entry(root: &tempfile::TempDir, source: &[u8]) -> SubmissionEntry {
        let dir = root.path().join("echo1");
        fs::create_dir_all(&dir).unwrap();
        let source_path = dir.join("echo1.cpp");
        fs::write(&source_path, source).unwrap();
        SubmissionEntry {
            identifier: "echo1".to_string(),
            dir,
            source_path,
            source: source.to_vec(),
            category: Category::Roundtrip,
        }
    }

    #[test]
    fn test_missing_reference_is_structural() {
        let root = tempfile::tempdir().unwrap();
        let entry = roundtrip_entry(&root, b"int main(){}");
        let err = check_edit_distance(&entry).unwrap_err();
        assert!(matches!(err, JudgeError::StructuralViolation(_)));
    }

    #[test]
    fn test_single_edit_reference_passes_the_edit_check() {
        let root = tempfile::tempdir().unwrap();
        let entry = roundtrip_entry(&root, b"int main(){return 1;}");
        fs::write(entry.dir.join(REFERENCE_FILE), b"int main(){return 0;}").unwrap();
        assert!(check_edit_distance(&entry).is_ok());
    }

    #[test]
    fn test_two_edit_reference_is_a_behavioral_mismatch() {
        let root = tempfile::tempdir().unwrap();
        let entry = roundtrip_entry(&root, b"int main(){return 1;}");
        fs::write(entry.dir.join(REFERENCE_FILE), b"int main(){return 22;}").unwrap();
        let err = check_edit_distance(&entry).unwrap_err();
        assert!(matches!(err, JudgeError::BehavioralMismatch(_)));
    }

    #[test]
    fn test_output_check_wants_the_exact_reverse() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = Scratch::in_dir(dir.path());

        fs::write(&scratch.output, b"cba").unwrap();
        assert!(check_output(b"abc", &scratch).is_ok());

        fs::write(&scratch.output, b"abc").unwrap();
        let err = check_output(b"abc", &scratch).unwrap_err();
        assert!(matches!(err, JudgeError::BehavioralMismatch(_)));
    }

    #[test]
    fn test_scratch_removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = Scratch::in_dir(dir.path());
        fs::write(&scratch.binary, b"x").unwrap();
        fs::write(&scratch.input, b"y").unwrap();

        scratch.remove_all();
        assert!(!scratch.binary.exists());
        assert!(!scratch.input.exists());
        assert!(!scratch.output.exists());

        // A second pass over already-absent files must not fail.
        scratch.remove_all();
    }

    #[test]
    fn test_verify_cleans_up_after_an_early_reject() {
        let root = tempfile::tempdir().unwrap();
        let entry = roundtrip_entry(&root, b"int main(){return 1;}");
        fs::write(entry.dir.join(REFERENCE_FILE), b"int main(){return 22;}").unwrap();

        let mut rng = fastrand::Rng::with_seed(1);
        let err = verify(&entry, Category::Roundtrip.policy(), &mut rng).unwrap_err();
        assert!(matches!(err, JudgeError::BehavioralMismatch(_)));

        let scratch = Scratch::in_dir(&scratch_root());
        assert!(!scratch.binary.exists());
        assert!(!scratch.input.exists());
        assert!(!scratch.output.exists());
    }
}
