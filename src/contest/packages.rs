//! Package-state oracle.
//!
//! The unrestricted category lets a submission declare system packages it
//! needs; the validator asks the oracle whether each one is installed. The
//! trait seam exists so tests can substitute a canned oracle.

use std::process::{Command, Stdio};

use log::debug;

use crate::config::types::{JudgeError, Result};

/// Answers whether a named system package is installed.
pub trait PackageOracle {
    fn installed(&self, name: &str) -> Result<bool>;
}

/// Oracle backed by the system package manager.
pub struct AptitudeOracle;

impl PackageOracle for AptitudeOracle {
    fn installed(&self, name: &str) -> Result<bool> {
        let output = Command::new("aptitude")
            .arg("show")
            .arg(name)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                JudgeError::StructuralViolation(format!("package oracle failed for {name}: {e}"))
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let installed = stdout.contains("State: installed");
        debug!("package {name}: installed={installed}");
        Ok(installed)
    }
}

/// Test doubles for the oracle seam, kept available to integration tests.
pub mod testing {
    use super::*;

    /// Canned oracle: installed when the name appears in the list.
    pub struct FixedOracle(pub Vec<String>);

    impl PackageOracle for FixedOracle {
        fn installed(&self, name: &str) -> Result<bool> {
            Ok(self.0.iter().any(|p| p == name))
        }
    }

    /// Oracle whose backend is unreachable.
    pub struct BrokenOracle;

    impl PackageOracle for BrokenOracle {
        fn installed(&self, name: &str) -> Result<bool> {
            Err(JudgeError::StructuralViolation(format!(
                "package oracle failed for {name}: unreachable"
            )))
        }
    }
}
