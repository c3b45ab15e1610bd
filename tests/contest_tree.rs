//! End-to-end checks over a synthetic contest tree.
//!
//! These tests exercise scanning, validation, the round-trip gate and
//! ranking without spawning the compiler: every fixture entry is resolved
//! before the build stage would run.

use std::fs;
use std::path::{Path, PathBuf};

use errblast::config::policy::Category;
use errblast::config::types::{BuildResult, JudgeError, ValidationOutcome};
use errblast::contest::packages::testing::FixedOracle;
use errblast::contest::provider;
use errblast::judge::{roundtrip, validator};
use errblast::scoring::{rank, ScoreRecord};

fn write_entry(root: &Path, category: &str, id: &str, source: &[u8]) -> PathBuf {
    let dir = root.join(category).join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{id}.cpp")), source).unwrap();
    fs::write(
        dir.join("info.txt"),
        "email jury@example.org\ntitle Fixture Entry\nauthor Test Jury\n",
    )
    .unwrap();
    dir
}

#[test]
fn plain_tree_filters_down_to_the_valid_entries() {
    let root = tempfile::tempdir().unwrap();
    write_entry(root.path(), "plain", "good", b"#include <vector>\nbroken\n");
    write_entry(root.path(), "plain", "sneaky", b"#include <cstdio>\n");
    let extra = write_entry(root.path(), "plain", "messy", b"int x;\n");
    fs::write(extra.join("notes.txt"), b"scratch").unwrap();

    let policy = Category::Plain.policy();
    let entries = provider::scan(root.path(), policy).unwrap();
    assert_eq!(entries.len(), 3);

    let oracle = FixedOracle(Vec::new());
    let survivors: Vec<&str> = entries
        .iter()
        .filter(|e| matches!(validator::validate(e, policy, &oracle), ValidationOutcome::Pass { .. }))
        .map(|e| e.identifier.as_str())
        .collect();
    assert_eq!(survivors, vec!["good"]);
}

#[test]
fn anything_tree_consults_the_package_oracle() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_entry(root.path(), "anything", "needy", b"int x;\n");
    fs::write(dir.join("packages.txt"), b"libboost-dev\n").unwrap();

    let policy = Category::Anything.policy();
    let entries = provider::scan(root.path(), policy).unwrap();
    assert_eq!(entries.len(), 1);

    let with_package = FixedOracle(vec!["libboost-dev".to_string()]);
    assert!(matches!(
        validator::validate(&entries[0], policy, &with_package),
        ValidationOutcome::Pass { .. }
    ));

    let without = FixedOracle(Vec::new());
    match validator::validate(&entries[0], policy, &without) {
        ValidationOutcome::Fail { violations } => {
            assert!(matches!(violations[0], JudgeError::Dependency(_)))
        }
        ValidationOutcome::Pass { .. } => panic!("missing package was accepted"),
    }
}

#[test]
fn roundtrip_reject_leaves_no_scratch_artifacts() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_entry(root.path(), "roundtrip", "echo2", b"int main(){return 1;}\n");
    // Two edits away from the submission, so the verifier rejects at the
    // first stage without ever invoking the compiler.
    fs::write(dir.join("reference.cpp"), b"int main(){return 23;}\n").unwrap();

    let policy = Category::Roundtrip.policy();
    let entries = provider::scan(root.path(), policy).unwrap();
    assert_eq!(entries.len(), 1);

    let mut rng = fastrand::Rng::with_seed(99);
    let err = roundtrip::verify(&entries[0], policy, &mut rng).unwrap_err();
    assert!(matches!(err, JudgeError::BehavioralMismatch(_)));

    let scratch_root = roundtrip::scratch_root();
    for name in ["reference-bin", "roundtrip.in", "roundtrip.out"] {
        assert!(
            !scratch_root.join(name).exists(),
            "scratch file {name} survived verification"
        );
    }
}

#[test]
fn ranking_matches_the_published_tie_break() {
    let alpha = ScoreRecord::new(
        "alpha",
        &BuildResult {
            exit_code: Some(1),
            diagnostic_bytes: 250,
            source_bytes: 100,
        },
    );
    let beta = ScoreRecord::new(
        "beta",
        &BuildResult {
            exit_code: Some(1),
            diagnostic_bytes: 250,
            source_bytes: 100,
        },
    );
    let ranked = rank(vec![alpha, beta]);
    let ids: Vec<&str> = ranked.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(ids, vec!["beta", "alpha"]);
    assert_eq!(ranked[0].display_line(), "2.50 100 250 beta");
}
