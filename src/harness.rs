//! Batch evaluation over all categories.
//!
//! One run walks the categories in their fixed order and evaluates every
//! entry exactly once, strictly sequentially. Errors are entry-scoped: a
//! rejected entry is reported and dropped from its category's table, and
//! evaluation of the remaining entries and categories continues.

use std::io;
use std::path::Path;

use log::{info, warn};

use crate::config::policy::{Category, CategoryPolicy};
use crate::config::types::{JudgeError, Result, SubmissionEntry, ValidationOutcome};
use crate::contest::packages::PackageOracle;
use crate::contest::provider;
use crate::exec::build;
use crate::judge::{roundtrip, validator};
use crate::scoring::{self, ScoreRecord};

/// One run over a contest tree.
pub struct Harness<'a> {
    root: &'a Path,
    oracle: &'a dyn PackageOracle,
    emit_json: bool,
    rng: fastrand::Rng,
}

impl<'a> Harness<'a> {
    pub fn new(root: &'a Path, oracle: &'a dyn PackageOracle, emit_json: bool) -> Self {
        Harness {
            root,
            oracle,
            emit_json,
            rng: fastrand::Rng::new(),
        }
    }

    /// Evaluate every category in the fixed order, printing one ranked
    /// table per category.
    pub fn run(&mut self) -> Result<()> {
        for category in Category::ALL {
            println!("Starting measurements for category {}.", category.name());
            let records = self.evaluate_category(category.policy())?;
            self.print_table(category, &records)?;
        }
        Ok(())
    }

    /// Evaluate one category and return its ranked records.
    pub fn evaluate_category(
        &mut self,
        policy: &'static CategoryPolicy,
    ) -> Result<Vec<ScoreRecord>> {
        let entries = provider::scan(self.root, policy)?;
        info!(
            "category {}: {} candidate entries",
            policy.dir_name,
            entries.len()
        );

        let mut records = Vec::new();
        for entry in &entries {
            match self.evaluate_entry(entry, policy) {
                Ok(record) => records.push(record),
                Err(e) => warn!("entry {} rejected: {e}", entry.identifier),
            }
        }
        Ok(scoring::rank(records))
    }

    /// Full pipeline for one entry. Any error removes exactly this entry.
    fn evaluate_entry(
        &mut self,
        entry: &SubmissionEntry,
        policy: &'static CategoryPolicy,
    ) -> Result<ScoreRecord> {
        match validator::validate(entry, policy, self.oracle) {
            ValidationOutcome::Pass { warnings } => {
                for warning in warnings {
                    warn!("entry {}: {warning}", entry.identifier);
                }
            }
            ValidationOutcome::Fail { violations } => {
                let mut violations = violations.into_iter();
                let first = violations.next().unwrap_or_else(|| {
                    JudgeError::StructuralViolation("validation failed".to_string())
                });
                for also in violations {
                    warn!("entry {} also: {also}", entry.identifier);
                }
                return Err(first);
            }
        }

        if policy.requires_reference {
            roundtrip::verify(entry, policy, &mut self.rng)?;
        }

        let result = build::compile(entry, policy)?;
        Ok(ScoreRecord::new(&entry.identifier, &result))
    }

    fn print_table(&self, category: Category, records: &[ScoreRecord]) -> Result<()> {
        println!("Table for category {}:", category.name());
        println!();
        for record in records {
            println!("{}", record.display_line());
        }
        println!();

        if self.emit_json {
            let doc = serde_json::json!({
                "category": category.name(),
                "records": records,
            });
            let rendered = serde_json::to_string_pretty(&doc)
                .map_err(|e| JudgeError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
            println!("{rendered}");
        }
        Ok(())
    }
}
