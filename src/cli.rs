//! Command-line surface.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use crate::contest::packages::AptitudeOracle;
use crate::exec::build::COMPILER;
use crate::harness::Harness;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every category under the contest root
    Run {
        /// Contest root directory holding the category subdirectories
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Also emit each ranked table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the compiler toolchain is available
    CheckDeps {
        /// Show the resolved compiler version line
        #[arg(long)]
        verbose: bool,
    },
}

pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { root, json } => {
            debug!("evaluating contest tree at {}", root.display());
            let oracle = AptitudeOracle;
            let mut harness = Harness::new(&root, &oracle, json);
            harness.run()?;
            Ok(())
        }
        Commands::CheckDeps { verbose } => check_deps(verbose),
    }
}

/// Preflight for the compiler the build stages depend on.
fn check_deps(verbose: bool) -> Result<()> {
    let probe = Command::new(COMPILER)
        .arg("--version")
        .stdin(Stdio::null())
        .output();

    match probe {
        Ok(output) if output.status.success() => {
            println!("{COMPILER} - OK");
            if verbose {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if let Some(line) = stdout.lines().next() {
                    println!("  {}", line.trim());
                }
            }
            Ok(())
        }
        _ => {
            eprintln!("{COMPILER} - MISSING");
            eprintln!("Install the C++ toolchain before running measurements.");
            std::process::exit(1);
        }
    }
}
